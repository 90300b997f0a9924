//! Parameterized statements.
//!
//! Each statement owns a plain-text builder from [`crate::builder`] and a
//! [`ParameterContext`](crate::ParameterContext). Predicates added to a
//! statement allocate their parameter names from that context, so names never
//! collide within one statement, including across unions and `exists`
//! sub-queries.
//!
//! # Usage
//!
//! ```ignore
//! use sqlforge::{qb, Predicate, Statement};
//!
//! let rows = qb::select("Emp")
//!     .where_pred(Predicate::in_list("name", ["Larry", "Curly", "Moe"]))
//!     .fetch_all(&client)
//!     .await?;
//!
//! qb::update("Emp")
//!     .set_value("status", "inactive")
//!     .where_eq("id", emp_id)
//!     .execute(&client)
//!     .await?;
//! ```

mod delete;
mod insert;
mod select;
mod traits;
mod update;

pub use delete::DeleteStatement;
pub use insert::InsertStatement;
pub use select::{SelectStatement, UnionSelect};
pub use traits::Statement;
pub(crate) use traits::{at_most_one, exactly_one};
pub use update::UpdateStatement;

/// Create a SELECT statement over the given table expression.
pub fn select(table: &str) -> SelectStatement {
    SelectStatement::from_table(table)
}

/// Create an INSERT statement for the given table.
pub fn insert(table: &str) -> InsertStatement {
    InsertStatement::new(table)
}

/// Create an UPDATE statement for the given table.
pub fn update(table: &str) -> UpdateStatement {
    UpdateStatement::new(table)
}

/// Create a DELETE statement for the given table.
pub fn delete(table: &str) -> DeleteStatement {
    DeleteStatement::new(table)
}
