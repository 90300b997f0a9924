//! Named-parameter compilation.
//!
//! Templates reference values as `:name`. [`compile`] rewrites each reference
//! into a positional marker and collects the values in encounter order.
//!
//! The scanner is not quote-aware: a `:word` sequence inside a string literal
//! is treated as a placeholder like any other. A doubled colon (`::`, the
//! PostgreSQL cast operator) is never a placeholder and is copied verbatim.
//! A `:?` marks a predicate that was never initialized and is rejected.

use crate::error::{OrmError, OrmResult};
use crate::param::ParameterContext;
use crate::value::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PARAM_RE: OnceLock<Regex> = OnceLock::new();
    PARAM_RE.get_or_init(|| {
        Regex::new(r"::|:\?|:([A-Za-z][A-Za-z0-9_]*)").expect("invalid built-in placeholder regex")
    })
}

/// Positional marker emitted for each placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, … (native for tokio-postgres)
    #[default]
    Dollar,
    /// `?` for every value
    Question,
}

/// Positional SQL plus its ordered values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledStatement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl CompiledStatement {
    pub fn new(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }
}

/// Compile `template` against the values in `params`.
///
/// Fails with [`OrmError::UnknownParameter`] on the first placeholder whose
/// name is not registered, or on an uninitialized `:?`; the offset is the
/// character position of its `:`.
pub fn compile(
    template: &str,
    params: &ParameterContext,
    style: PlaceholderStyle,
) -> OrmResult<CompiledStatement> {
    tracing::debug!(
        target: "sqlforge.sql",
        sql = template,
        params = ?params.names().collect::<Vec<_>>(),
        "compiling statement"
    );

    let mut sql = String::with_capacity(template.len());
    let mut values = Vec::new();
    let mut index = 0;

    for caps in placeholder_regex().captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        sql.push_str(&template[index..whole.start()]);
        index = whole.end();

        let offset = || template[..whole.start()].chars().count();
        let name = match caps.get(1) {
            Some(name) => name.as_str(),
            None if whole.as_str() == "::" => {
                sql.push_str(whole.as_str());
                continue;
            }
            None => {
                return Err(OrmError::UnknownParameter {
                    name: "?".to_string(),
                    offset: offset(),
                });
            }
        };

        let value = params.get(name).ok_or_else(|| OrmError::UnknownParameter {
            name: name.to_string(),
            offset: offset(),
        })?;
        values.push(value.clone());
        match style {
            PlaceholderStyle::Dollar => {
                sql.push('$');
                sql.push_str(&values.len().to_string());
            }
            PlaceholderStyle::Question => sql.push('?'),
        }
    }
    sql.push_str(&template[index..]);

    Ok(CompiledStatement { sql, values })
}

/// A template and its parameters, compiled on demand.
///
/// ```ignore
/// let stmt = ParameterBinder::new("select * from Employee where name = :name")
///     .set_parameter("name", "Joe")?
///     .compile()?;
/// assert_eq!(stmt.sql, "select * from Employee where name = $1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterBinder {
    sql: String,
    params: ParameterContext,
    style: PlaceholderStyle,
}

impl ParameterBinder {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: PlaceholderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn set_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = sql.into();
        self
    }

    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> OrmResult<Self> {
        self.params.set(name, value)?;
        Ok(self)
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &ParameterContext {
        &self.params
    }

    pub fn compile(&self) -> OrmResult<CompiledStatement> {
        compile(&self.sql, &self.params, self.style)
    }
}
