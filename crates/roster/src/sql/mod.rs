//! Dynamic SQL builder.
//!
//! `Sql` lets callers compose a statement without tracking placeholder
//! indices by hand. Placeholders are rendered on demand, either as `?` (the
//! portable, human-facing form) or as `$1, $2, ...` (what Postgres executes).
//!
//! # Example
//!
//! ```ignore
//! use roster::sql;
//!
//! let mut q = sql("SELECT id, name FROM students WHERE 1=1");
//! if let Some(min_age) = min_age {
//!     q.push(" AND age >= ").push_bind(min_age);
//! }
//! q.push(" ORDER BY id");
//!
//! let students: Vec<Student> = q.fetch_all_as(&client).await?;
//! ```

mod builder;


pub use builder::{PlaceholderStyle, Sql};

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SqlPart {
    Raw(String),
    Param,
}
