use super::Converter;
use super::flattener::StringListFlattener;
use super::string::text_or_null;
use crate::error::OrmResult;
use crate::value::Value;

/// `Vec<String>` stored as one flattened text column. Null reads as an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringListConverter {
    flattener: StringListFlattener,
}

impl StringListConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flattener(flattener: StringListFlattener) -> Self {
        Self { flattener }
    }
}

impl Converter<Vec<String>> for StringListConverter {
    fn to_storage(&self, value: &Vec<String>) -> OrmResult<Value> {
        Ok(Value::Text(self.flattener.join_strings(value)))
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<Vec<String>> {
        Ok(self.flattener.split_strings(text_or_null(value, column)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", &[])]
    #[case("foo", &["foo"])]
    #[case("foo,bar", &["foo", "bar"])]
    #[case("foo,bar,b\\\\a\\,z", &["foo", "bar", "b\\a,z"])]
    fn converts_both_ways(#[case] stored: &str, #[case] list: &[&str]) {
        let conv = StringListConverter::new();
        let list: Vec<String> = list.iter().map(|s| s.to_string()).collect();
        assert_eq!(conv.from_value(&Value::from(stored), "tags").unwrap(), list);
        assert_eq!(conv.to_storage(&list).unwrap(), Value::from(stored));
    }

    #[test]
    fn null_results_in_empty_list() {
        let conv = StringListConverter::new();
        assert!(conv.from_value(&Value::Null, "tags").unwrap().is_empty());
    }
}
