//! SELECT statement with bound parameters.

use super::traits::Statement;
use crate::binder::{self, CompiledStatement, PlaceholderStyle};
use crate::builder::{SelectBuilder, SqlBuilder, SubSelectBuilder};
use crate::client::Executor;
use crate::config::OrmConfig;
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::param::ParameterContext;
use crate::predicate::Predicate;
use crate::value::Value;

/// A [`SelectBuilder`] paired with the parameters its conditions reference.
///
/// ```ignore
/// let stmt = qb::select("Employee e")
///     .column("e.name")
///     .where_eq("e.dept", "Sales")
///     .and("e.salary > :limit")
///     .set_parameter("limit", 100_000)?;
/// let rows = stmt.fetch_all(&client).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectStatement {
    builder: SelectBuilder,
    params: ParameterContext,
    style: PlaceholderStyle,
}

impl SelectStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            builder: SelectBuilder::from_table(table),
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

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.builder = self.builder.column(name);
        self
    }

    pub fn column_grouped(mut self, name: impl Into<String>) -> Self {
        self.builder = self.builder.column_grouped(name);
        self
    }

    pub fn sub_select(mut self, sub: SubSelectBuilder) -> Self {
        self.builder = self.builder.sub_select(sub);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.builder = self.builder.distinct();
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.builder = self.builder.from(table);
        self
    }

    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.builder = self.builder.join(join);
        self
    }

    pub fn left_join(mut self, join: impl Into<String>) -> Self {
        self.builder = self.builder.left_join(join);
        self
    }

    /// Add a literal condition; it may reference parameters set with
    /// [`SelectStatement::set_parameter`].
    pub fn where_(mut self, expr: impl Into<String>) -> Self {
        self.builder = self.builder.where_(expr);
        self
    }

    pub fn and(self, expr: impl Into<String>) -> Self {
        self.where_(expr)
    }

    /// Initialize `predicate` against this statement and add it as a condition.
    pub fn where_pred(mut self, predicate: impl Into<Predicate>) -> Self {
        let mut predicate = predicate.into();
        predicate.initialize(&mut self.params);
        self.builder.push_where(predicate.render());
        self
    }

    pub fn and_pred(self, predicate: impl Into<Predicate>) -> Self {
        self.where_pred(predicate)
    }

    /// `expr = :paramN` with a freshly allocated parameter.
    pub fn where_eq(self, expr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_pred(Predicate::eq(expr, value))
    }

    /// `expr in (:paramN, ...)`, one parameter per value.
    pub fn where_in<V: Into<Value>>(
        self,
        expr: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.where_pred(Predicate::in_list(expr, values))
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.builder = self.builder.group_by(expr);
        self
    }

    pub fn having(mut self, expr: impl Into<String>) -> Self {
        self.builder = self.builder.having(expr);
        self
    }

    /// Add a union member built against this statement's parameters.
    pub fn union(mut self, f: impl FnOnce(UnionSelect<'_>) -> UnionSelect<'_>) -> Self {
        let scope = f(UnionSelect {
            builder: SelectBuilder::new(),
            params: &mut self.params,
        });
        let member = scope.builder;
        self.builder = self.builder.union(member);
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.builder = self.builder.order_by(expr);
        self
    }

    pub fn order_by_dir(mut self, expr: impl Into<String>, ascending: bool) -> Self {
        self.builder = self.builder.order_by_dir(expr, ascending);
        self
    }

    pub fn for_update(mut self) -> Self {
        self.builder = self.builder.for_update();
        self
    }

    /// Fails with [`OrmError::InvalidState`] unless `for_update` was called.
    pub fn no_wait(mut self) -> OrmResult<Self> {
        self.builder = self.builder.no_wait()?;
        Ok(self)
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.builder = self.builder.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.builder = self.builder.offset(offset);
        self
    }

    /// Bind a value for a `:name` used in a literal condition.
    pub fn set_parameter(mut self, name: &str, value: impl Into<Value>) -> OrmResult<Self> {
        self.params.set(name, value)?;
        Ok(self)
    }

    pub fn builder(&self) -> &SelectBuilder {
        &self.builder
    }

    /// Compile a statement counting the rows this select would return.
    pub fn count(&self, dialect: &impl Dialect) -> OrmResult<CompiledStatement> {
        binder::compile(
            &dialect.wrap_for_count(&self.template()),
            &self.params,
            self.style,
        )
    }

    /// Compile a statement returning one page of this select's rows.
    pub fn page(
        &self,
        dialect: &impl Dialect,
        limit: u64,
        offset: u64,
    ) -> OrmResult<CompiledStatement> {
        binder::compile(
            &dialect.wrap_for_page(&self.template(), limit, offset),
            &self.params,
            self.style,
        )
    }

    /// Run the count statement and return the number.
    pub async fn fetch_count(&self, conn: &impl Executor, dialect: &impl Dialect) -> OrmResult<i64> {
        let stmt = self.count(dialect)?;
        let rows = conn.query_compiled(&stmt).await?;
        let row = rows
            .first()
            .ok_or_else(|| OrmError::NotFoundQuery(stmt.sql.clone()))?;
        row.get_at(0)
    }
}

impl Statement for SelectStatement {
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

/// A union member under construction.
///
/// Allocates parameters from the owning statement so names stay unique
/// across the whole union.
pub struct UnionSelect<'a> {
    builder: SelectBuilder,
    params: &'a mut ParameterContext,
}

impl UnionSelect<'_> {
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.builder = self.builder.column(name);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.builder = self.builder.distinct();
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.builder = self.builder.from(table);
        self
    }

    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.builder = self.builder.join(join);
        self
    }

    pub fn left_join(mut self, join: impl Into<String>) -> Self {
        self.builder = self.builder.left_join(join);
        self
    }

    pub fn where_(mut self, expr: impl Into<String>) -> Self {
        self.builder = self.builder.where_(expr);
        self
    }

    pub fn and(self, expr: impl Into<String>) -> Self {
        self.where_(expr)
    }

    pub fn where_pred(mut self, predicate: impl Into<Predicate>) -> Self {
        let mut predicate = predicate.into();
        predicate.initialize(self.params);
        self.builder.push_where(predicate.render());
        self
    }

    pub fn where_eq(self, expr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.where_pred(Predicate::eq(expr, value))
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.builder = self.builder.group_by(expr);
        self
    }

    pub fn having(mut self, expr: impl Into<String>) -> Self {
        self.builder = self.builder.having(expr);
        self
    }
}
