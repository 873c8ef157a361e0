//! CRUD over the `students` table.
//!
//! Every function takes `conn: &impl GenericClient`, so callers decide
//! whether it runs on a plain connection or inside a transaction.

use crate::client::GenericClient;
use crate::error::RosterResult;
use crate::model::{NewStudent, Student};
use crate::patch::{StudentPatch, UpdatePlan, build_update};
use crate::sql::sql;

const COLUMNS: &str = "id, name, age, marks";

/// Result of [`update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No field qualified; no statement was sent.
    NoOp,
    /// Rows affected by the statement.
    Updated(u64),
}

/// Create the table if it does not exist yet.
pub async fn create_table(conn: &impl GenericClient) -> RosterResult<()> {
    sql("CREATE TABLE IF NOT EXISTS students (\
            id SERIAL PRIMARY KEY, \
            name VARCHAR(100) NOT NULL, \
            age INTEGER NOT NULL, \
            marks REAL NOT NULL\
        )")
    .tagged("students.create_table")
    .execute(conn)
    .await?;
    Ok(())
}

/// Insert a record and return it with its assigned id.
pub async fn insert(conn: &impl GenericClient, new: &NewStudent) -> RosterResult<Student> {
    let mut q = sql("INSERT INTO students (name, age, marks) VALUES (");
    q.push_bind(new.name())
        .push(", ")
        .push_bind(new.age())
        .push(", ")
        .push_bind(new.marks())
        .push(&format!(") RETURNING {COLUMNS}"));
    q.tagged("students.insert").fetch_one_as(conn).await
}

/// All records, ordered by id.
pub async fn list_all(conn: &impl GenericClient) -> RosterResult<Vec<Student>> {
    sql(format!("SELECT {COLUMNS} FROM students ORDER BY id"))
        .tagged("students.list_all")
        .fetch_all_as(conn)
        .await
}

pub async fn find(conn: &impl GenericClient, id: i32) -> RosterResult<Option<Student>> {
    sql(format!("SELECT {COLUMNS} FROM students WHERE id = "))
        .bind(id)
        .tagged("students.find")
        .fetch_opt_as(conn)
        .await
}

/// Whether a record with `id` exists.
pub async fn exists(conn: &impl GenericClient, id: i32) -> RosterResult<bool> {
    let row = sql("SELECT id FROM students WHERE id = ")
        .bind(id)
        .tagged("students.exists")
        .fetch_opt(conn)
        .await?;
    Ok(row.is_some())
}

/// Apply `patch` to record `id`.
///
/// Returns [`UpdateOutcome::NoOp`] without touching the database when no
/// field of the patch qualifies.
pub async fn update(
    conn: &impl GenericClient,
    id: i32,
    patch: &StudentPatch,
) -> RosterResult<UpdateOutcome> {
    match build_update(id, patch) {
        UpdatePlan::NoOp => Ok(UpdateOutcome::NoOp),
        UpdatePlan::Apply(q) => Ok(UpdateOutcome::Updated(q.execute(conn).await?)),
    }
}

/// Delete record `id`, returning the number of rows removed.
pub async fn delete(conn: &impl GenericClient, id: i32) -> RosterResult<u64> {
    sql("DELETE FROM students WHERE id = ")
        .bind(id)
        .tagged("students.delete")
        .execute(conn)
        .await
}
