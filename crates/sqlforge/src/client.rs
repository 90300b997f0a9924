//! Executor trait for unified database access.

use crate::binder::CompiledStatement;
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// Anything that can run positional SQL with [`Value`] parameters.
///
/// Implemented for clients, transactions and pooled connections, so mapper
/// operations take either and the caller decides the transaction boundary.
pub trait Executor: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Run a compiled statement as a query.
    fn query_compiled(
        &self,
        stmt: &CompiledStatement,
    ) -> impl std::future::Future<Output = OrmResult<Vec<Row>>> + Send {
        self.query(&stmt.sql, &stmt.values)
    }

    /// Run a compiled statement and return the affected row count.
    fn execute_compiled(
        &self,
        stmt: &CompiledStatement,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        self.execute(&stmt.sql, &stmt.values)
    }
}

fn as_params(values: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

fn decode_rows(rows: Vec<tokio_postgres::Row>) -> OrmResult<Vec<Row>> {
    rows.iter().map(Row::from_pg).collect()
}

impl Executor for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        let rows = tokio_postgres::Client::query(self, sql, &as_params(params))
            .await
            .map_err(OrmError::from_db_error)?;
        decode_rows(rows)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        tokio_postgres::Client::execute(self, sql, &as_params(params))
            .await
            .map_err(OrmError::from_db_error)
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        let rows = tokio_postgres::Transaction::query(self, sql, &as_params(params))
            .await
            .map_err(OrmError::from_db_error)?;
        decode_rows(rows)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, &as_params(params))
            .await
            .map_err(OrmError::from_db_error)
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Object {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        let client: &tokio_postgres::Client = self;
        Executor::query(client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        let client: &tokio_postgres::Client = self;
        Executor::execute(client, sql, params).await
    }
}

impl<E: Executor> Executor for &E {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        (**self).query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        (**self).execute(sql, params).await
    }
}
