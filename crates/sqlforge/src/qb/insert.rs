//! INSERT statement with bound parameters.

use super::traits::Statement;
use crate::binder::PlaceholderStyle;
use crate::builder::{InsertBuilder, SqlBuilder};
use crate::config::OrmConfig;
use crate::error::OrmResult;
use crate::param::ParameterContext;
use crate::value::Value;

/// An [`InsertBuilder`] whose values are bound parameters.
#[derive(Debug, Clone, Default)]
pub struct InsertStatement {
    builder: InsertBuilder,
    params: ParameterContext,
    style: PlaceholderStyle,
}

impl InsertStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            builder: InsertBuilder::new(table),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: &OrmConfig) -> Self {
        self.style = config.placeholder_style;
        self
    }

    pub fn with_style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    /// Insert raw SQL text for `column`, e.g. `now()` or `:name`.
    pub fn set_raw(mut self, column: impl Into<String>, sql: impl Into<String>) -> Self {
        self.builder = self.builder.set(column, sql);
        self
    }

    /// Insert `value` for `column` through a freshly allocated parameter.
    pub fn set_value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = self.params.allocate_value(value);
        self.builder = self.builder.set(column, format!(":{name}"));
        self
    }

    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> OrmResult<Self> {
        self.params.set(name, value)?;
        Ok(self)
    }

    pub fn builder(&self) -> &InsertBuilder {
        &self.builder
    }
}

impl Statement for InsertStatement {
    fn template(&self) -> String {
        self.builder.to_sql()
    }

    fn parameters(&self) -> &ParameterContext {
        &self.params
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        self.style
    }
}
