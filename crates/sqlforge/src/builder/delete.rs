use super::{SqlBuilder, append_list};
use std::fmt;

/// DELETE statement builder: `delete from T where x and y`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteBuilder {
    table: String,
    wheres: Vec<String>,
}

impl DeleteBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            wheres: Vec::new(),
        }
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

impl SqlBuilder for DeleteBuilder {
    fn to_sql(&self) -> String {
        let mut sql = format!("delete from {}", self.table);
        append_list(&mut sql, &self.wheres, " where ", " and ");
        sql
    }
}

impl fmt::Display for DeleteBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
