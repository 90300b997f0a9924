//! Plain-text SQL statement builders.
//!
//! Each builder keeps one ordered list of fragments per clause and renders
//! them in a fixed clause order. Fragments are copied verbatim; nothing here
//! validates SQL or knows about parameters. See [`crate::qb`] for statements
//! that carry bound values.
//!
//! ```ignore
//! let sql = SelectBuilder::from_table("Employee e")
//!     .column("e.name")
//!     .join("Department d on e.dept_id = d.id")
//!     .where_("d.name = 'Sales'")
//!     .order_by("e.name")
//!     .to_sql();
//! ```

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::{SelectBuilder, SelectColumn, SubSelectBuilder};
pub use update::UpdateBuilder;

/// Base trait for SQL text builders.
pub trait SqlBuilder {
    /// Render the statement text.
    fn to_sql(&self) -> String;
}

/// Append `items` to `sql`: `init` before the first, `sep` between the rest.
pub(crate) fn append_list<T: std::fmt::Display>(sql: &mut String, items: &[T], init: &str, sep: &str) {
    use std::fmt::Write;

    for (i, item) in items.iter().enumerate() {
        sql.push_str(if i == 0 { init } else { sep });
        let _ = write!(sql, "{item}");
    }
}
