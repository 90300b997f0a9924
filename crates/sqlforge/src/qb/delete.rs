//! DELETE statement with bound parameters.

use super::traits::Statement;
use crate::binder::PlaceholderStyle;
use crate::builder::{DeleteBuilder, SqlBuilder};
use crate::config::OrmConfig;
use crate::error::OrmResult;
use crate::param::ParameterContext;
use crate::predicate::Predicate;
use crate::value::Value;

/// A [`DeleteBuilder`] paired with the parameters its conditions reference.
#[derive(Debug, Clone, Default)]
pub struct DeleteStatement {
    builder: DeleteBuilder,
    params: ParameterContext,
    style: PlaceholderStyle,
}

impl DeleteStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            builder: DeleteBuilder::new(table),
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

    pub fn where_(mut self, expr: impl Into<String>) -> Self {
        self.builder = self.builder.where_(expr);
        self
    }

    pub fn where_pred(mut self, predicate: impl Into<Predicate>) -> Self {
        let mut predicate = predicate.into();
        predicate.initialize(&mut self.params);
        self.builder.push_where(predicate.render());
        self
    }

    pub fn where_eq(self, expr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_pred(Predicate::eq(expr, value))
    }

    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> OrmResult<Self> {
        self.params.set(name, value)?;
        Ok(self)
    }

    pub fn builder(&self) -> &DeleteBuilder {
        &self.builder
    }
}

impl Statement for DeleteStatement {
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
