//! # sqlforge
//!
//! Fluent SQL statement builders, named-parameter binding and a thin entity
//! mapper with optimistic locking, for PostgreSQL.
//!
//! ## Features
//!
//! - **Plain-text builders**: `select`/`insert`/`update`/`delete` rendered from ordered clause lists
//! - **Named parameters**: write `:name` in SQL; the binder rewrites it to `$1` (or `?`) and orders the values
//! - **Composable predicates**: `eq`, `in_list`, `exists`, `and`/`or`/`not`, bitmasks; parameter names never collide
//! - **Entity mapping**: find/insert/update/delete by id with a version column guarding concurrent updates
//! - **Pluggable conversion**: per-column converters for lists, maps, enums, locales, timestamps
//! - **Transaction-friendly**: every operation takes an [`Executor`]; pass a client, transaction or pooled connection
//!
//! ## Statements (qb)
//!
//! ```ignore
//! use sqlforge::{qb, Predicate, Statement};
//!
//! let rows = qb::select("Employee e")
//!     .column("e.name")
//!     .where_pred(Predicate::or(vec![
//!         Predicate::eq("e.dept", "Sales"),
//!         Predicate::gt("e.salary", 100_000),
//!     ]))
//!     .order_by("e.name")
//!     .fetch_all(&client)
//!     .await?;
//! ```
//!
//! ## Mapping
//!
//! ```ignore
//! use sqlforge::{Column, Mapping};
//!
//! let mapping = Mapping::<Employee>::new("Employee")
//!     .id(Column::field("id", |e: &Employee| &e.id, |e| &mut e.id))
//!     .version(Column::field("version", |e: &Employee| &e.version, |e| &mut e.version))
//!     .column(Column::field("name", |e: &Employee| &e.name, |e| &mut e.name));
//!
//! let mut emp = mapping.find_by_id(&client, 1).await?;
//! emp.name = "Bezu".into();
//! match mapping.update(&client, &mut emp).await {
//!     Err(e) if e.is_optimistic_lock() => { /* reload and retry */ }
//!     other => other?,
//! }
//! ```

pub mod binder;
pub mod builder;
pub mod client;
pub mod config;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod id_source;
pub mod mapping;
pub mod param;
pub mod predicate;
pub mod qb;
pub mod row;
pub mod value;

pub use binder::{CompiledStatement, ParameterBinder, PlaceholderStyle, compile};
pub use builder::{
    DeleteBuilder, InsertBuilder, SelectBuilder, SelectColumn, SqlBuilder, SubSelectBuilder,
    UpdateBuilder,
};
pub use client::Executor;
pub use config::OrmConfig;
pub use convert::{
    Converter, DateConverter, EnumStringConverter, FieldType, Locale, LocaleConverter,
    OptionConverter, PassthroughConverter, StringConverter, StringListConverter,
    StringListFlattener, StringMapConverter, TimestampConverter, TypeRef, TypeRefConverter,
    TypeRegistry,
};
pub use dialect::{Dialect, PostgresDialect};
pub use error::{OrmError, OrmResult};
pub use id_source::{IdSource, SequenceIdSource, UniqueStringGenerator};
pub use mapping::{Column, ColumnDef, Mapping, MappingDelete, MappingQuery};
pub use param::ParameterContext;
pub use predicate::{Exists, Predicate};
pub use qb::{
    DeleteStatement, InsertStatement, SelectStatement, Statement, UnionSelect, UpdateStatement,
};
pub use row::{FromRow, Row};
pub use value::{FromValue, Value};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_builder, create_pool_with_config};
