use super::Converter;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// `String` fields stored as text.
///
/// Reading accepts any non-null scalar and uses its text form, so a numeric
/// column can be mapped to a `String` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter<String> for StringConverter {
    fn to_storage(&self, value: &String) -> OrmResult<Value> {
        Ok(Value::Text(value.clone()))
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<String> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Null => Err(OrmError::decode(column, "unexpected null")),
            Value::Bytes(_) | Value::Json(_) => Err(OrmError::decode(
                column,
                format!("cannot read {} as text", value.kind()),
            )),
            other => Ok(other.to_string()),
        }
    }
}

/// Read a nullable text column; used by converters that store a flattened form.
pub(crate) fn text_or_null<'a>(value: &'a Value, column: &str) -> OrmResult<Option<&'a str>> {
    match value {
        Value::Null => Ok(None),
        Value::Text(s) => Ok(Some(s)),
        other => Err(OrmError::decode(
            column,
            format!("expected text, got {}", other.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_text_and_scalars() {
        let conv = StringConverter;
        assert_eq!(conv.to_storage(&"Bob".to_string()).unwrap(), Value::from("Bob"));
        assert_eq!(conv.from_value(&Value::from("Bob"), "name").unwrap(), "Bob");
        assert_eq!(conv.from_value(&Value::Int(42), "code").unwrap(), "42");
        assert!(conv.from_value(&Value::Null, "name").is_err());
    }
}
