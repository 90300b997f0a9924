//! Ad-hoc queries and deletes against a mapped table.

use super::Mapping;
use crate::client::Executor;
use crate::error::OrmResult;
use crate::predicate::Predicate;
use crate::qb::{DeleteStatement, SelectStatement, Statement, at_most_one, exactly_one};
use crate::value::Value;

/// A select over every mapped column of `T`, narrowed by predicates.
///
/// Created by [`Mapping::find_where`].
pub struct MappingQuery<'m, T> {
    mapping: &'m Mapping<T>,
    select: SelectStatement,
}

impl<'m, T: Default + 'static> MappingQuery<'m, T> {
    pub(crate) fn new(mapping: &'m Mapping<T>, select: SelectStatement) -> Self {
        Self { mapping, select }
    }

    pub fn and(mut self, predicate: impl Into<Predicate>) -> Self {
        self.select = self.select.where_pred(predicate);
        self
    }

    /// Add a literal condition; any `:name` it references must be bound with
    /// [`MappingQuery::set_parameter`].
    pub fn and_sql(mut self, expr: impl Into<String>) -> Self {
        self.select = self.select.where_(expr);
        self
    }

    pub fn where_eq(mut self, expr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.select = self.select.where_eq(expr, value);
        self
    }

    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.select = self.select.join(join);
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.select = self.select.order_by(expr);
        self
    }

    pub fn order_by_dir(mut self, expr: impl Into<String>, ascending: bool) -> Self {
        self.select = self.select.order_by_dir(expr, ascending);
        self
    }

    pub fn for_update(mut self) -> Self {
        self.select = self.select.for_update();
        self
    }

    pub fn no_wait(mut self) -> OrmResult<Self> {
        self.select = self.select.no_wait()?;
        Ok(self)
    }

    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> OrmResult<Self> {
        self.select = self.select.set_parameter(name, value)?;
        Ok(self)
    }

    /// The underlying statement.
    pub fn statement(&self) -> &SelectStatement {
        &self.select
    }

    /// Load every matching entity.
    pub async fn fetch_all(&self, conn: &impl Executor) -> OrmResult<Vec<T>> {
        let rows = self.select.fetch_all(conn).await?;
        rows.iter().map(|row| self.mapping.load(row)).collect()
    }

    /// Load exactly one entity.
    ///
    /// - 0 rows: [`OrmError::NotFoundQuery`](crate::OrmError::NotFoundQuery)
    /// - more than one: [`OrmError::TooManyRows`](crate::OrmError::TooManyRows)
    pub async fn fetch_one(&self, conn: &impl Executor) -> OrmResult<T> {
        let stmt = self.select.compile()?;
        let rows = conn.query_compiled(&stmt).await?;
        let row = exactly_one(rows, &stmt.sql)?;
        self.mapping.load(&row)
    }

    /// Load at most one entity; more than one row is an error.
    pub async fn fetch_opt(&self, conn: &impl Executor) -> OrmResult<Option<T>> {
        let rows = self.select.fetch_all(conn).await?;
        match at_most_one(rows)? {
            Some(row) => self.mapping.load(&row).map(Some),
            None => Ok(None),
        }
    }
}

/// A delete from a mapped table, narrowed by conditions.
///
/// Created by [`Mapping::begin_delete`]. Conditions are joined with `and`.
pub struct MappingDelete {
    delete: DeleteStatement,
}

impl MappingDelete {
    pub(crate) fn new(delete: DeleteStatement) -> Self {
        Self { delete }
    }

    pub fn where_(mut self, predicate: impl Into<Predicate>) -> Self {
        self.delete = self.delete.where_pred(predicate);
        self
    }

    pub fn and(self, predicate: impl Into<Predicate>) -> Self {
        self.where_(predicate)
    }

    pub fn where_sql(mut self, expr: impl Into<String>) -> Self {
        self.delete = self.delete.where_(expr);
        self
    }

    pub fn where_eq(mut self, expr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.delete = self.delete.where_eq(expr, value);
        self
    }

    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> OrmResult<Self> {
        self.delete = self.delete.set_parameter(name, value)?;
        Ok(self)
    }

    pub fn statement(&self) -> &DeleteStatement {
        &self.delete
    }

    /// Run the delete and return the number of rows removed.
    pub async fn execute(&self, conn: &impl Executor) -> OrmResult<u64> {
        self.delete.execute(conn).await
    }
}
