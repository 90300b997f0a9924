//! Entity mapping with optimistic locking.
//!
//! A [`Mapping`] ties an entity type to a table: one id column, an optional
//! integer version column, and any number of data columns. Each column pairs
//! field accessors with a [`Converter`](crate::convert::Converter).
//!
//! # Usage
//!
//! ```ignore
//! use sqlforge::{Column, Mapping};
//!
//! #[derive(Default)]
//! struct Employee {
//!     id: i32,
//!     version: i32,
//!     name: String,
//! }
//!
//! let mapping = Mapping::<Employee>::new("Employee")
//!     .id(Column::field("id", |e: &Employee| &e.id, |e| &mut e.id))
//!     .version(Column::field("version", |e: &Employee| &e.version, |e| &mut e.version))
//!     .column(Column::field("name", |e: &Employee| &e.name, |e| &mut e.name));
//!
//! let mut emp = Employee { id: 1, name: "Bobo".into(), ..Default::default() };
//! mapping.insert(&client, &mut emp).await?;
//!
//! emp.name = "Bezu".into();
//! mapping.update(&client, &mut emp).await?; // version 0 -> 1
//!
//! let emp = mapping.find_by_id(&client, 1).await?;
//! ```
//!
//! Updates bump the version column and require the stored version to match
//! the entity's; a mismatch surfaces as [`OrmError::OptimisticLock`].

mod column;
mod query;


pub use column::{Column, ColumnDef};
pub use query::{MappingDelete, MappingQuery};

use crate::binder::PlaceholderStyle;
use crate::client::Executor;
use crate::config::OrmConfig;
use crate::error::{OrmError, OrmResult};
use crate::id_source::IdSource;
use crate::predicate::Predicate;
use crate::qb::{DeleteStatement, InsertStatement, SelectStatement, Statement, UpdateStatement};
use crate::row::Row;
use crate::value::Value;

/// Maps entities of type `T` to rows of one table.
///
/// Built once per entity type and shared; every operation takes the executor
/// to run on, so the caller owns the transaction boundary.
pub struct Mapping<T> {
    table: String,
    alias: String,
    style: PlaceholderStyle,
    id_column: Option<Column<T>>,
    version_column: Option<Column<T>>,
    columns: Vec<Column<T>>,
}

impl<T> Clone for Mapping<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            alias: self.alias.clone(),
            style: self.style,
            id_column: self.id_column.clone(),
            version_column: self.version_column.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Mapping<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapping")
            .field("table", &self.table)
            .field("alias", &self.alias)
            .field("id_column", &self.id_column)
            .field("version_column", &self.version_column)
            .field("columns", &self.columns)
            .finish()
    }
}

impl<T: Default + 'static> Mapping<T> {
    pub fn new(table: impl Into<String>) -> Self {
        Self::with_config(table, &OrmConfig::default())
    }

    pub fn with_config(table: impl Into<String>, config: &OrmConfig) -> Self {
        Self {
            table: table.into(),
            alias: config.default_alias.clone(),
            style: config.placeholder_style,
            id_column: None,
            version_column: None,
            columns: Vec::new(),
        }
    }

    /// Table alias used by queries (default `_t0`).
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Set the primary key column.
    pub fn id(mut self, column: impl Into<Column<T>>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    /// Set the integer version column used for optimistic locking.
    pub fn version(mut self, column: impl Into<Column<T>>) -> Self {
        self.version_column = Some(column.into());
        self
    }

    /// Add a data column.
    pub fn column(mut self, column: impl Into<Column<T>>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn version_column(&self) -> Option<&Column<T>> {
        self.version_column.as_ref()
    }

    pub fn id_column(&self) -> OrmResult<&Column<T>> {
        self.id_column.as_ref().ok_or_else(|| {
            OrmError::MappingConfiguration(format!("no id column mapped for table {}", self.table))
        })
    }

    /// The entity's primary key in storage form.
    pub fn primary_key(&self, entity: &T) -> OrmResult<Value> {
        self.id_column()?.read(entity)
    }

    fn has_primary_key(&self, entity: &T) -> OrmResult<bool> {
        Ok(!self.primary_key(entity)?.is_null_or_zero())
    }

    fn current_version(&self, column: &Column<T>, entity: &T) -> OrmResult<i64> {
        column.read(entity)?.as_i64().ok_or_else(|| {
            OrmError::MappingConfiguration(format!(
                "version column {} of table {} is not an integer",
                column.column_name(),
                self.table
            ))
        })
    }

    /// Build an entity from a row holding every mapped column.
    pub fn load(&self, row: &Row) -> OrmResult<T> {
        let mut entity = T::default();
        let id = self.id_column()?;
        for column in std::iter::once(id)
            .chain(self.version_column.as_ref())
            .chain(self.columns.iter())
        {
            column.write(&mut entity, row.require(column.column_name())?)?;
        }
        Ok(entity)
    }

    fn base_select(&self) -> OrmResult<SelectStatement> {
        let id = self.id_column()?;
        let mut select = SelectStatement::from_table(format!("{} {}", self.table, self.alias))
            .with_style(self.style)
            .column(id.projection(&self.alias));
        if let Some(version) = &self.version_column {
            select = select.column(version.projection(&self.alias));
        }
        for column in &self.columns {
            select = select.column(column.projection(&self.alias));
        }
        Ok(select)
    }

    /// Start a query over entities matching `predicate`.
    pub fn find_where(&self, predicate: impl Into<Predicate>) -> OrmResult<MappingQuery<'_, T>> {
        Ok(MappingQuery::new(self, self.base_select()?.where_pred(predicate)))
    }

    fn by_id(&self, id: Value) -> OrmResult<MappingQuery<'_, T>> {
        let expr = format!("{}.{}", self.alias, self.id_column()?.column_name());
        self.find_where(Predicate::eq(expr, id))
    }

    /// Load the entity with the given id.
    ///
    /// - 0 rows: [`OrmError::NotFound`]
    /// - more than one: [`OrmError::TooManyRows`]
    pub async fn find_by_id(&self, conn: &impl Executor, id: impl Into<Value>) -> OrmResult<T> {
        let id = id.into();
        self.by_id(id.clone())?
            .fetch_opt(conn)
            .await?
            .ok_or_else(|| OrmError::not_found(&self.table, id))
    }

    /// Load the entity with the given id, or `None` if there is none.
    pub async fn find_by_id_opt(
        &self,
        conn: &impl Executor,
        id: impl Into<Value>,
    ) -> OrmResult<Option<T>> {
        self.by_id(id.into())?.fetch_opt(conn).await
    }

    /// Insert a new row. The id must already be set; the version, if mapped,
    /// is written as 0.
    pub async fn insert(&self, conn: &impl Executor, entity: &mut T) -> OrmResult<()> {
        let id_column = self.id_column()?;
        let id = id_column.read(entity)?;
        if id.is_null_or_zero() {
            return Err(OrmError::MissingPrimaryKey {
                table: self.table.clone(),
            });
        }

        let mut insert = InsertStatement::new(self.table.as_str())
            .with_style(self.style)
            .set_value(id_column.column_name(), id.clone());
        if let Some(version) = &self.version_column {
            insert = insert.set_value(version.column_name(), 0i64);
        }
        for column in self.columns.iter().filter(|c| !c.is_read_only()) {
            insert = insert.set_value(column.column_name(), column.read(entity)?);
        }

        insert.execute(conn).await?;
        tracing::debug!(target: "sqlforge.mapping", table = %self.table, id = %id, "inserted");

        if let Some(version) = &self.version_column {
            version.write(entity, &Value::Int(0))?;
        }
        Ok(())
    }

    /// Write the entity's columns back to its row.
    ///
    /// With a version column, the row is only updated if its version still
    /// matches the entity's; on success both are incremented.
    ///
    /// - row missing: [`OrmError::NotFound`]
    /// - version mismatch: [`OrmError::OptimisticLock`]
    /// - more than one row updated: [`OrmError::MappingConfiguration`]
    pub async fn update(&self, conn: &impl Executor, entity: &mut T) -> OrmResult<()> {
        let id_column = self.id_column()?;
        let id = id_column.read(entity)?;
        if id.is_null_or_zero() {
            return Err(OrmError::MissingPrimaryKey {
                table: self.table.clone(),
            });
        }

        let mut update = UpdateStatement::new(self.table.as_str())
            .with_style(self.style)
            .where_eq(id_column.column_name(), id.clone());
        let mut version = None;
        if let Some(column) = &self.version_column {
            let current = self.current_version(column, entity)?;
            let name = column.column_name();
            update = update
                .set(format!("{name} = {name} + 1"))
                .where_eq(name, current);
            version = Some((column, current));
        }
        for column in self.columns.iter().filter(|c| !c.is_read_only()) {
            update = update.set_value(column.column_name(), column.read(entity)?);
        }

        match update.execute(conn).await? {
            1 => {
                if let Some((column, current)) = version {
                    column.write(entity, &Value::Int(current + 1))?;
                }
                tracing::debug!(target: "sqlforge.mapping", table = %self.table, id = %id, "updated");
                Ok(())
            }
            0 => {
                let count: i64 = SelectStatement::from_table(self.table.as_str())
                    .with_style(self.style)
                    .column("count(*)")
                    .where_eq(id_column.column_name(), id.clone())
                    .fetch_one(conn)
                    .await?
                    .get_at(0)?;
                if count == 0 {
                    Err(OrmError::not_found(&self.table, id))
                } else {
                    tracing::warn!(
                        target: "sqlforge.mapping",
                        table = %self.table,
                        id = %id,
                        "optimistic lock conflict"
                    );
                    Err(OrmError::optimistic_lock(&self.table, id))
                }
            }
            rows => {
                tracing::error!(
                    target: "sqlforge.mapping",
                    table = %self.table,
                    id = %id,
                    rows,
                    "update touched more than one row"
                );
                Err(OrmError::MappingConfiguration(format!(
                    "Updating table {} with id {id} updated {rows} rows. Is column {} really the primary key?",
                    self.table,
                    id_column.column_name()
                )))
            }
        }
    }

    /// Delete the row with the given id; [`OrmError::NotFound`] if there is none.
    pub async fn delete_by_id(&self, conn: &impl Executor, id: impl Into<Value>) -> OrmResult<()> {
        let id = id.into();
        let deleted = self
            .begin_delete()
            .where_eq(self.id_column()?.column_name(), id.clone())
            .execute(conn)
            .await?;
        if deleted == 0 {
            return Err(OrmError::not_found(&self.table, id));
        }
        tracing::debug!(target: "sqlforge.mapping", table = %self.table, id = %id, "deleted");
        Ok(())
    }

    /// Start a delete from this mapping's table.
    pub fn begin_delete(&self) -> MappingDelete {
        MappingDelete::new(DeleteStatement::new(self.table.as_str()).with_style(self.style))
    }

    /// Fill an unset primary key from `source`. A populated id is left alone.
    pub async fn assign_id(
        &self,
        conn: &impl Executor,
        entity: &mut T,
        source: &impl IdSource,
    ) -> OrmResult<()> {
        if self.has_primary_key(entity)? {
            return Ok(());
        }
        let id = source.next_id(conn).await?;
        self.id_column()?.write(entity, &id)
    }
}
