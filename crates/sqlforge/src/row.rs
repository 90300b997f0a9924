//! Result rows and row mapping traits

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};

/// One result row: ordered `(label, value)` pairs.
///
/// Labels are looked up case-insensitively, since PostgreSQL folds unquoted
/// identifiers to lower case while mappings are usually written in camel case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from explicit pairs.
    pub fn from_pairs<L, V>(pairs: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<Value>,
    {
        Self {
            columns: pairs
                .into_iter()
                .map(|(label, value)| (label.into(), value.into()))
                .collect(),
        }
    }

    /// Decode every column of a driver row into [`Value`]s.
    pub fn from_pg(row: &tokio_postgres::Row) -> OrmResult<Self> {
        let mut columns = Vec::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            let value: Value = row
                .try_get(idx)
                .map_err(|e| OrmError::decode(column.name(), e.to_string()))?;
            columns.push((column.name().to_string(), value));
        }
        Ok(Self { columns })
    }

    /// Append a column.
    pub fn push(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((label.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(label, _)| label.as_str())
    }

    /// Value under `label`, if present.
    pub fn value(&self, label: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, v)| v)
    }

    /// Value at a zero-based position.
    pub fn value_at(&self, idx: usize) -> Option<&Value> {
        self.columns.get(idx).map(|(_, v)| v)
    }

    /// Value under `label`, failing with a decode error when the label is absent.
    pub fn require(&self, label: &str) -> OrmResult<&Value> {
        self.value(label)
            .ok_or_else(|| OrmError::decode(label, "column not present in result"))
    }

    /// Typed access by label.
    pub fn get<T: FromValue>(&self, label: &str) -> OrmResult<T> {
        let value = self.require(label)?;
        T::from_value(value).map_err(|message| OrmError::decode(label, message))
    }

    /// Typed access by position.
    pub fn get_at<T: FromValue>(&self, idx: usize) -> OrmResult<T> {
        let value = self
            .value_at(idx)
            .ok_or_else(|| OrmError::decode(idx.to_string(), "column index out of range"))?;
        T::from_value(value).map_err(|message| OrmError::decode(idx.to_string(), message))
    }
}

impl TryFrom<&tokio_postgres::Row> for Row {
    type Error = OrmError;

    fn try_from(row: &tokio_postgres::Row) -> OrmResult<Self> {
        Row::from_pg(row)
    }
}

/// Trait for types that can be built from a result [`Row`].
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let row = Row::from_pairs([("firstName", Value::from("Ada")), ("id", Value::from(7))]);
        assert_eq!(row.get::<String>("firstname").unwrap(), "Ada");
        assert_eq!(row.get::<i64>("ID").unwrap(), 7);
    }

    #[test]
    fn missing_label_is_decode_error() {
        let row = Row::from_pairs([("id", 1)]);
        let err = row.get::<i64>("version").unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "version"));
    }

    #[test]
    fn positional_access() {
        let mut row = Row::new();
        row.push("count", 3_i64);
        assert_eq!(row.get_at::<i64>(0).unwrap(), 3);
        assert!(row.get_at::<i64>(1).is_err());
    }
}
