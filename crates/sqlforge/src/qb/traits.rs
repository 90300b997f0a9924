//! Trait definitions for parameterized statements.

use crate::binder::{self, CompiledStatement, PlaceholderStyle};
use crate::client::Executor;
use crate::error::{OrmError, OrmResult};
use crate::param::ParameterContext;
use crate::row::{FromRow, Row};

/// A SQL template plus the values its `:name` placeholders refer to.
///
/// Provides compilation and execution; implementors only supply the template
/// text and parameter context.
pub trait Statement: Sync {
    /// Named-parameter SQL text.
    fn template(&self) -> String;

    /// Values bound so far.
    fn parameters(&self) -> &ParameterContext;

    /// Positional marker style used by [`Statement::compile`].
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Dollar
    }

    /// Compile to positional SQL and ordered values.
    fn compile(&self) -> OrmResult<CompiledStatement> {
        binder::compile(&self.template(), self.parameters(), self.placeholder_style())
    }

    /// Execute query and return all rows.
    fn fetch_all(
        &self,
        conn: &impl Executor,
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        async move {
            let stmt = self.compile()?;
            conn.query_compiled(&stmt).await
        }
    }

    /// Execute query and map all rows to `T`.
    fn fetch_all_as<T: FromRow>(
        &self,
        conn: &impl Executor,
    ) -> impl std::future::Future<Output = OrmResult<Vec<T>>> + Send {
        async move {
            let rows = self.fetch_all(conn).await?;
            rows.iter().map(T::from_row).collect()
        }
    }

    /// Execute query and require exactly one row.
    ///
    /// - 0 rows: [`OrmError::NotFoundQuery`]
    /// - more than one: [`OrmError::TooManyRows`]
    fn fetch_one(
        &self,
        conn: &impl Executor,
    ) -> impl std::future::Future<Output = OrmResult<Row>> + Send {
        async move {
            let stmt = self.compile()?;
            let rows = conn.query_compiled(&stmt).await?;
            exactly_one(rows, &stmt.sql)
        }
    }

    /// Execute query and return at most one row; more than one is an error.
    fn fetch_opt(
        &self,
        conn: &impl Executor,
    ) -> impl std::future::Future<Output = OrmResult<Option<Row>>> + Send {
        async move {
            let rows = self.fetch_all(conn).await?;
            at_most_one(rows)
        }
    }

    /// Execute statement and return the affected row count.
    fn execute(
        &self,
        conn: &impl Executor,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        async move {
            let stmt = self.compile()?;
            conn.execute_compiled(&stmt).await
        }
    }
}

pub(crate) fn exactly_one(rows: Vec<Row>, sql: &str) -> OrmResult<Row> {
    let got = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), got) {
        (Some(row), 1) => Ok(row),
        (None, _) => Err(OrmError::NotFoundQuery(sql.to_string())),
        (Some(_), got) => Err(OrmError::too_many_rows(1, got)),
    }
}

pub(crate) fn at_most_one(rows: Vec<Row>) -> OrmResult<Option<Row>> {
    let got = rows.len();
    if got > 1 {
        return Err(OrmError::too_many_rows(1, got));
    }
    Ok(rows.into_iter().next())
}
