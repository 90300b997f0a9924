use super::{SqlBuilder, append_list};
use std::fmt;

/// UPDATE statement builder: `update T set a = 1, b = 2 where x and y`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuilder {
    table: String,
    sets: Vec<String>,
    wheres: Vec<String>,
}

impl UpdateBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Add an assignment expression, e.g. `name = 'Bobo'`.
    pub fn set(mut self, expr: impl Into<String>) -> Self {
        self.sets.push(expr.into());
        self
    }

    pub fn where_(mut self, expr: impl Into<String>) -> Self {
        self.wheres.push(expr.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub(crate) fn push_where(&mut self, expr: String) {
        self.wheres.push(expr);
    }
}

impl SqlBuilder for UpdateBuilder {
    fn to_sql(&self) -> String {
        let mut sql = format!("update {}", self.table);
        append_list(&mut sql, &self.sets, " set ", ", ");
        append_list(&mut sql, &self.wheres, " where ", " and ");
        sql
    }
}

impl fmt::Display for UpdateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
