//! Named parameter storage shared by a statement and its predicates.

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub(crate) fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("invalid built-in parameter name regex")
    })
}

/// Whether `name` can be referenced as `:name` in a template.
pub fn is_valid_name(name: &str) -> bool {
    name_regex().is_match(name)
}

/// Name → value map plus a counter for automatically allocated names.
///
/// Auto names are `param0`, `param1`, … in allocation order. Registering a
/// name twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterContext {
    next_index: usize,
    values: BTreeMap<String, Value>,
}

impl ParameterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next auto name without binding a value.
    pub fn allocate(&mut self) -> String {
        let name = format!("param{}", self.next_index);
        self.next_index += 1;
        name
    }

    /// Reserve the next auto name and bind `value` to it.
    pub fn allocate_value(&mut self, value: impl Into<Value>) -> String {
        let name = self.allocate();
        self.values.insert(name.clone(), value.into());
        name
    }

    /// Bind a value under an explicit name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> OrmResult<()> {
        if !is_valid_name(name) {
            return Err(OrmError::InvalidParameterName(name.to_string()));
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of auto names handed out so far.
    pub fn allocated(&self) -> usize {
        self.next_index
    }
}
