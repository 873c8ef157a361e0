use super::SqlPart;
use crate::client::GenericClient;
use crate::error::{RosterError, RosterResult};
use crate::row::FromRow;
use crate::value::Value;
use std::fmt::Write as _;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// How placeholders are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` for every parameter.
    Question,
    /// `$1, $2, ...` (Postgres).
    Numbered,
}

/// A parameter-safe dynamic SQL builder.
///
/// `Sql` stores SQL pieces and parameters separately and generates
/// placeholders in the final SQL string, so the placeholder count always
/// tracks the parameter list.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Sql {
    parts: Vec<SqlPart>,
    pub(super) params: Vec<Value>,
    tag: Option<String>,
}

impl Sql {
    /// Create a new builder with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            parts: vec![SqlPart::Raw(initial_sql.into())],
            params: Vec::new(),
            tag: None,
        }
    }

    /// Associate a tag for logging.
    ///
    /// # Example
    /// ```ignore
    /// let n = roster::sql("DELETE FROM students WHERE id = ")
    ///     .tagged("students.delete")
    ///     .bind(7)
    ///     .execute(&client)
    ///     .await?;
    /// ```
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The tag, if one was set.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.params.push(value.into());
        self
    }

    /// Bind a parameter and return `self` (consuming version of [`Sql::push_bind`]).
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.push_bind(value);
        self
    }

    /// Render the statement with the given placeholder style.
    pub fn render(&self, style: PlaceholderStyle) -> String {
        let mut out = String::new();
        let mut idx = 0usize;
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param => {
                    idx += 1;
                    match style {
                        PlaceholderStyle::Question => out.push('?'),
                        PlaceholderStyle::Numbered => {
                            let _ = write!(out, "${idx}");
                        }
                    }
                }
            }
        }
        out
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        self.render(PlaceholderStyle::Numbered)
    }

    /// Bound parameters, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    /// Number of placeholders in the rendered statement.
    pub fn placeholder_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, SqlPart::Param))
            .count()
    }

    pub(super) fn validate(&self) -> RosterResult<()> {
        let placeholder_count = self.placeholder_count();
        if placeholder_count != self.params.len() {
            let params_len = self.params.len();
            return Err(RosterError::Validation(format!(
                "Sql: placeholders({placeholder_count}) != params({params_len})"
            )));
        }
        Ok(())
    }

    fn prepare(&self) -> RosterResult<String> {
        self.validate()?;
        let sql = self.to_sql();
        tracing::debug!(
            target: "roster.sql",
            tag = self.tag.as_deref().unwrap_or("-"),
            param_count = self.params.len(),
            sql = %sql,
        );
        Ok(sql)
    }

    // ==================== Execution ====================

    /// Execute the statement and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> RosterResult<Vec<Row>> {
        let sql = self.prepare()?;
        conn.query(&sql, &self.params_ref()).await
    }

    /// Execute the statement and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> RosterResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the statement and return the **first** row mapped to `T`.
    ///
    /// Returns [`RosterError::NotFound`] when the statement yields no rows.
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> RosterResult<T> {
        let sql = self.prepare()?;
        let row = conn.query_one(&sql, &self.params_ref()).await?;
        T::from_row(&row)
    }

    /// Execute the statement and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> RosterResult<Option<Row>> {
        let sql = self.prepare()?;
        conn.query_opt(&sql, &self.params_ref()).await
    }

    /// Execute the statement and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> RosterResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the statement and return affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> RosterResult<u64> {
        let sql = self.prepare()?;
        conn.execute(&sql, &self.params_ref()).await
    }
}
