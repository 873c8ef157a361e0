//! Row mapping traits and utilities

use crate::error::{RosterError, RosterResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct.
///
/// # Example
///
/// ```ignore
/// use roster::{FromRow, RosterResult, RowExt};
///
/// struct Count(i64);
///
/// impl FromRow for Count {
///     fn from_row(row: &tokio_postgres::Row) -> RosterResult<Self> {
///         Ok(Count(row.try_get_column("count")?))
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> RosterResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning RosterError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> RosterResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> RosterResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| RosterError::decode(column, e.to_string()))
    }
}
