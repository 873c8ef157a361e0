//! Partial updates.
//!
//! A [`StudentPatch`] names the fields a caller wants to change;
//! [`build_update`] turns it into a single parameterized `UPDATE` touching only
//! those fields, or reports [`UpdatePlan::NoOp`] when nothing qualifies.
//!
//! ```ignore
//! let patch = StudentPatch::new().age(25).marks(88.5);
//! match build_update(7, &patch) {
//!     UpdatePlan::Apply(sql) => {
//!         // UPDATE students SET age = $1, marks = $2 WHERE id = $3
//!         sql.execute(&client).await?;
//!     }
//!     UpdatePlan::NoOp => println!("No updates provided!"),
//! }
//! ```

use crate::changeset::ValidationErrors;
use crate::model::{
    AGE_RANGE, MARKS_RANGE, NAME_MAX_LEN, TABLE, validate_age, validate_marks, validate_name,
};
use crate::sql::Sql;
use crate::value::Value;

/// Requested changes to one record. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub marks: Option<f64>,
}

impl StudentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn marks(mut self, marks: f64) -> Self {
        self.marks = Some(marks);
        self
    }

    /// Adapter for the "keep current" sentinel encoding: an empty name,
    /// age `0` and marks `-1` mean "unchanged".
    pub fn from_sentinels(name: &str, age: i32, marks: f64) -> Self {
        Self {
            name: (!name.is_empty()).then(|| name.to_string()),
            age: (age != 0).then_some(age),
            marks: (marks != -1.0).then_some(marks),
        }
    }

    /// `true` when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.marks.is_none()
    }

    /// Check every supplied field against the record rules.
    ///
    /// Unlike [`build_update`], which drops out-of-range values, this rejects
    /// them. Interactive callers run it first so a typo never silently turns
    /// into "unchanged".
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::default();
        if let Some(Err(e)) = self.name.as_deref().map(validate_name) {
            errs.push(e);
        }
        if let Some(Err(e)) = self.age.map(validate_age) {
            errs.push(e);
        }
        if let Some(Err(e)) = self.marks.map(validate_marks) {
            errs.push(e);
        }
        errs.into_result()
    }

    /// The fields that qualify for the update, in column order.
    fn assignments(&self) -> Vec<(&'static str, Value)> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty() && n.chars().count() <= NAME_MAX_LEN);
        let age = self.age.filter(|a| AGE_RANGE.contains(a));
        let marks = self.marks.filter(|m| MARKS_RANGE.contains(m));

        let mut out = Vec::with_capacity(3);
        if let Some(name) = name {
            out.push(("name", Value::from(name)));
        }
        if let Some(age) = age {
            out.push(("age", Value::Int(age)));
        }
        if let Some(marks) = marks {
            out.push(("marks", Value::Float(marks)));
        }
        out
    }
}

/// Outcome of [`build_update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePlan {
    /// Statement to run; its parameters end with the record id.
    Apply(Sql),
    /// No field qualified. Nothing should be executed.
    NoOp,
}

impl UpdatePlan {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    pub fn into_sql(self) -> Option<Sql> {
        match self {
            Self::Apply(sql) => Some(sql),
            Self::NoOp => None,
        }
    }
}

/// Build the `UPDATE` for `id` from the qualifying fields of `patch`.
///
/// Fields are visited in the fixed order name, age, marks. A supplied value
/// outside its range counts as absent. Pure: the same inputs always give the
/// same statement and parameter order.
pub fn build_update(id: i32, patch: &StudentPatch) -> UpdatePlan {
    let assignments = patch.assignments();
    if assignments.is_empty() {
        return UpdatePlan::NoOp;
    }

    let mut sql = Sql::new(format!("UPDATE {TABLE} SET "));
    for (i, (column, value)) in assignments.into_iter().enumerate() {
        if i > 0 {
            sql.push(", ");
        }
        sql.push(column).push(" = ").push_bind(value);
    }
    sql.push(" WHERE id = ").push_bind(id);
    UpdatePlan::Apply(sql.tagged("students.update"))
}
