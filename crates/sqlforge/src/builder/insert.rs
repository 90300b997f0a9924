use super::{SqlBuilder, append_list};
use std::fmt;

/// INSERT statement builder: `insert into T (c1, c2) values (v1, v2)`.
///
/// Values are SQL text (literals, expressions or `:name` placeholders).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<String>,
    values: Vec<String>,
}

impl InsertBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl SqlBuilder for InsertBuilder {
    fn to_sql(&self) -> String {
        let mut sql = format!("insert into {} (", self.table);
        append_list(&mut sql, &self.columns, "", ", ");
        sql.push_str(") values (");
        append_list(&mut sql, &self.values, "", ", ");
        sql.push(')');
        sql
    }
}

impl fmt::Display for InsertBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
