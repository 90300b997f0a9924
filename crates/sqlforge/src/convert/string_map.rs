use super::Converter;
use super::flattener::StringListFlattener;
use super::string::text_or_null;
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};

const KEY_VALUE_SEPARATOR: char = '=';

/// String maps stored as flattened `key=value` items. Keys must not contain
/// `=`; values may. Null reads as an empty map.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringMapConverter {
    flattener: StringListFlattener,
}

impl StringMapConverter {
    pub fn new() -> Self {
        Self::default()
    }

    fn flatten<'a>(&self, entries: impl Iterator<Item = (&'a String, &'a String)>) -> OrmResult<Value> {
        let mut items = Vec::new();
        for (key, value) in entries {
            if key.contains(KEY_VALUE_SEPARATOR) {
                return Err(OrmError::conversion(format!(
                    "Illegal key '{key}', must not contain '{KEY_VALUE_SEPARATOR}'"
                )));
            }
            items.push(format!("{key}{KEY_VALUE_SEPARATOR}{value}"));
        }
        Ok(Value::Text(self.flattener.join_strings(&items)))
    }

    fn pairs(&self, value: &Value, column: &str) -> OrmResult<Vec<(String, String)>> {
        let items = self.flattener.split_strings(text_or_null(value, column)?);
        items
            .into_iter()
            .map(|item| match item.split_once(KEY_VALUE_SEPARATOR) {
                Some((k, v)) => Ok((k.to_string(), v.to_string())),
                None => Err(OrmError::conversion(format!(
                    "Invalid key value pair: '{item}'"
                ))),
            })
            .collect()
    }
}

impl Converter<BTreeMap<String, String>> for StringMapConverter {
    fn to_storage(&self, value: &BTreeMap<String, String>) -> OrmResult<Value> {
        self.flatten(value.iter())
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<BTreeMap<String, String>> {
        Ok(self.pairs(value, column)?.into_iter().collect())
    }
}

impl Converter<HashMap<String, String>> for StringMapConverter {
    fn to_storage(&self, value: &HashMap<String, String>) -> OrmResult<Value> {
        self.flatten(value.iter())
    }

    fn from_value(&self, value: &Value, column: &str) -> OrmResult<HashMap<String, String>> {
        Ok(self.pairs(value, column)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[rstest]
    #[case("", &[])]
    #[case("foo=bar", &[("foo", "bar")])]
    #[case("b\\\\a\\,z=q\\\\uu\\,x,foo=bar", &[("foo", "bar"), ("b\\a,z", "q\\uu,x")])]
    #[case("url=a=b", &[("url", "a=b")])]
    fn converts_both_ways(#[case] stored: &str, #[case] entries: &[(&str, &str)]) {
        let conv = StringMapConverter::new();
        let expected = map(entries);
        let read: BTreeMap<String, String> = conv.from_value(&Value::from(stored), "attrs").unwrap();
        assert_eq!(read, expected);
        assert_eq!(conv.to_storage(&expected).unwrap(), Value::from(stored));
    }

    #[test]
    fn null_results_in_empty_map() {
        let conv = StringMapConverter::new();
        let read: HashMap<String, String> = conv.from_value(&Value::Null, "attrs").unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn key_with_separator_is_rejected() {
        let conv = StringMapConverter::new();
        let err = conv.to_storage(&map(&[("a=b", "c")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conversion error: Illegal key 'a=b', must not contain '='"
        );
    }

    #[test]
    fn item_without_separator_is_rejected() {
        let conv = StringMapConverter::new();
        let err = Converter::<HashMap<String, String>>::from_value(&conv, &Value::from("foo"), "attrs")
            .unwrap_err();
        assert!(matches!(err, OrmError::Conversion(_)));
    }
}
