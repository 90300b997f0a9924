//! Field ⇄ column value conversion.
//!
//! A [`Converter`] marshals one Rust field type to a storage [`Value`] and back.
//! Every mapped column carries one; when a column does not name a converter
//! explicitly, the field type's [`FieldType::default_converter`] is used:
//!
//! | field type | converter | storage |
//! |---|---|---|
//! | `String` | [`StringConverter`] | text |
//! | integers, floats, `bool`, `Vec<u8>`, `Uuid`, `serde_json::Value` | [`PassthroughConverter`] | as-is |
//! | `DateTime<Utc>`, `NaiveDateTime` | [`TimestampConverter`] | timestamp (UTC) |
//! | `NaiveDate` | [`DateConverter`] | date |
//! | `Vec<String>` | [`StringListConverter`] | flattened text |
//! | `HashMap`/`BTreeMap<String, String>` | [`StringMapConverter`] | flattened `k=v` text |
//! | [`Locale`] | [`LocaleConverter`] | `lang_COUNTRY_variant` |
//! | [`TypeRef`] | [`TypeRefConverter`] | registered type name |
//! | `Option<F>` | [`OptionConverter`] | null ⇄ `None` |
//!
//! Enums stored by name use [`EnumStringConverter`]; the
//! [`string_enum_field!`](crate::string_enum_field) macro makes it their default.

mod enum_string;
mod flattener;
mod locale;
mod passthrough;
mod string;
mod string_list;
mod string_map;
mod temporal;
mod type_ref;

pub use enum_string::EnumStringConverter;
pub use flattener::StringListFlattener;
pub use locale::{Locale, LocaleConverter};
pub use passthrough::PassthroughConverter;
pub use string::StringConverter;
pub use string_list::StringListConverter;
pub use string_map::StringMapConverter;
pub use temporal::{DateConverter, TimestampConverter};
pub use type_ref::{TypeRef, TypeRefConverter, TypeRegistry};

use crate::error::OrmResult;
use crate::row::Row;
use crate::value::Value;
use std::sync::Arc;

/// Bidirectional conversion between a field of type `F` and a column value.
pub trait Converter<F>: Send + Sync {
    /// Convert a field value to the value written to the column.
    fn to_storage(&self, value: &F) -> OrmResult<Value>;

    /// Convert a column value read back from the database. `column` names the
    /// source column in error messages.
    fn from_value(&self, value: &Value, column: &str) -> OrmResult<F>;

    /// Read and convert the column labelled `label`.
    fn from_row(&self, row: &Row, label: &str) -> OrmResult<F> {
        self.from_value(row.require(label)?, label)
    }
}

/// Types with a default converter.
pub trait FieldType: Sized + Send + Sync + 'static {
    fn default_converter() -> Arc<dyn Converter<Self>>;
}

/// Wraps a converter for `F` so that null maps to `None`.
pub struct OptionConverter<F> {
    inner: Arc<dyn Converter<F>>,
}

impl<F> OptionConverter<F> {
    pub fn new(inner: Arc<dyn Converter<F>>) -> Self {
        Self { inner }
    }
}

impl<F: Send + Sync> Converter<Option<F>> for OptionConverter<F> {
    fn to_storage(&self, value: &Option<F>) -> OrmResult<Value> {
        match value {
            Some(v) => self.inner.to_storage(v),
            None => Ok(Value::Null),
        }
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<Option<F>> {
        match value {
            Value::Null => Ok(None),
            other => self.inner.from_value(other, column).map(Some),
        }
    }
}

impl<F: FieldType> FieldType for Option<F> {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(OptionConverter::new(F::default_converter()))
    }
}

macro_rules! passthrough_field {
    ($($t:ty),* $(,)?) => {
        $(
            impl FieldType for $t {
                fn default_converter() -> Arc<dyn Converter<Self>> {
                    Arc::new(PassthroughConverter::<$t>::new())
                }
            }
        )*
    };
}

passthrough_field!(
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    Vec<u8>,
    uuid::Uuid,
    serde_json::Value,
    Value,
);

impl FieldType for String {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(StringConverter)
    }
}

impl FieldType for chrono::DateTime<chrono::Utc> {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(TimestampConverter)
    }
}

impl FieldType for chrono::NaiveDateTime {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(TimestampConverter)
    }
}

impl FieldType for chrono::NaiveDate {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(DateConverter)
    }
}

impl FieldType for Vec<String> {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(StringListConverter::new())
    }
}

impl FieldType for std::collections::HashMap<String, String> {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(StringMapConverter::new())
    }
}

impl FieldType for std::collections::BTreeMap<String, String> {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(StringMapConverter::new())
    }
}

impl FieldType for Locale {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(LocaleConverter)
    }
}

impl FieldType for TypeRef {
    fn default_converter() -> Arc<dyn Converter<Self>> {
        Arc::new(TypeRefConverter::new(TypeRegistry::global()))
    }
}

/// Make [`EnumStringConverter`] the default converter for enums that
/// implement `Display` and `FromStr`.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Status { Active, Retired }
/// // Display / FromStr impls ...
/// sqlforge::string_enum_field!(Status);
/// ```
#[macro_export]
macro_rules! string_enum_field {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::convert::FieldType for $t {
                fn default_converter()
                    -> ::std::sync::Arc<dyn $crate::convert::Converter<Self>>
                {
                    ::std::sync::Arc::new($crate::convert::EnumStringConverter::<$t>::new())
                }
            }
        )*
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrmError;

    #[test]
    fn option_wraps_null() {
        let conv = Option::<String>::default_converter();
        assert_eq!(conv.to_storage(&None).unwrap(), Value::Null);
        assert_eq!(conv.from_value(&Value::Null, "c").unwrap(), None);
        assert_eq!(
            conv.to_storage(&Some("x".to_string())).unwrap(),
            Value::from("x")
        );
        assert_eq!(
            conv.from_value(&Value::from("x"), "c").unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn from_row_reads_by_label() {
        let row = Row::from_pairs([("age", Value::Int(37))]);
        let conv = i32::default_converter();
        assert_eq!(conv.from_row(&row, "AGE").unwrap(), 37);
        assert!(matches!(
            conv.from_row(&row, "missing"),
            Err(OrmError::Decode { .. })
        ));
    }

    #[test]
    fn null_into_non_optional_field_is_decode_error() {
        let conv = i64::default_converter();
        let err = conv.from_value(&Value::Null, "id").unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "id"));
    }
}
