use super::Converter;
use super::string::text_or_null;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Enums stored by name: `Display` on write, `FromStr` on read.
pub struct EnumStringConverter<E>(PhantomData<fn() -> E>);

impl<E> EnumStringConverter<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EnumStringConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EnumStringConverter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnumStringConverter")
    }
}

impl<E> Converter<E> for EnumStringConverter<E>
where
    E: fmt::Display + FromStr,
{
    fn to_storage(&self, value: &E) -> OrmResult<Value> {
        Ok(Value::Text(value.to_string()))
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<E> {
        let s = text_or_null(value, column)?
            .ok_or_else(|| OrmError::decode(column, "unexpected null"))?;
        s.parse().map_err(|_| {
            OrmError::conversion(format!(
                "'{s}' is not a valid {} (column {column})",
                std::any::type_name::<E>()
            ))
        })
    }
}
