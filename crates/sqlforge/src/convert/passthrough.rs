use super::Converter;
use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};
use std::fmt;
use std::marker::PhantomData;

/// Hands the field value to the driver unchanged.
pub struct PassthroughConverter<F>(PhantomData<fn() -> F>);

impl<F> PassthroughConverter<F> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<F> Default for PassthroughConverter<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for PassthroughConverter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PassthroughConverter")
    }
}

impl<F> Converter<F> for PassthroughConverter<F>
where
    F: Clone + Into<Value> + FromValue,
{
    fn to_storage(&self, value: &F) -> OrmResult<Value> {
        Ok(value.clone().into())
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<F> {
        F::from_value(value).map_err(|message| OrmError::decode(column, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_pass_through() {
        let conv = PassthroughConverter::<i32>::new();
        assert_eq!(conv.to_storage(&42).unwrap(), Value::Int(42));
        assert_eq!(conv.from_value(&Value::Int(42), "n").unwrap(), 42);

        let conv = PassthroughConverter::<bool>::new();
        assert!(conv.from_value(&Value::Bool(true), "b").unwrap());
        assert!(conv.from_value(&Value::Int(1), "b").is_err());
    }
}
