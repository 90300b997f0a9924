//! Database dialects.

/// Statement rewrites that differ between databases.
pub trait Dialect: Send + Sync {
    /// Wrap a select so it returns only the number of rows it would produce.
    fn wrap_for_count(&self, sql: &str) -> String;

    /// Restrict a select to `limit` rows starting at row `offset`.
    fn wrap_for_page(&self, sql: &str, limit: u64, offset: u64) -> String;

    /// A select returning the next value of the named sequence.
    fn sequence_sql(&self, name: &str) -> String;
}

/// PostgreSQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn wrap_for_count(&self, sql: &str) -> String {
        format!("select count(*) from ({sql}) a")
    }

    fn wrap_for_page(&self, sql: &str, limit: u64, offset: u64) -> String {
        format!("{sql} limit {limit} offset {offset}")
    }

    fn sequence_sql(&self, name: &str) -> String {
        format!("select nextval('{}')", name.replace('\'', "''"))
    }
}
