//! The student record and its field rules.

use crate::changeset::{ValidationCode, ValidationError, ValidationErrors};
use crate::error::RosterResult;
use crate::row::{FromRow, RowExt};
use std::ops::RangeInclusive;
use tokio_postgres::Row;

/// Table holding the records.
pub const TABLE: &str = "students";

/// Maximum name length, in characters.
pub const NAME_MAX_LEN: usize = 100;

/// Accepted ages.
pub const AGE_RANGE: RangeInclusive<i32> = 1..=120;

/// Accepted marks.
pub const MARKS_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// A stored student. `id` is assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub marks: f64,
}

impl FromRow for Student {
    fn from_row(row: &Row) -> RosterResult<Self> {
        // `marks` is REAL (float4).
        let marks: f32 = row.try_get_column("marks")?;
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            age: row.try_get_column("age")?,
            marks: f64::from(marks),
        })
    }
}

/// Validated input for a new record.
///
/// The only way to obtain one is [`NewStudent::new`], so every instance
/// satisfies the field rules.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    name: String,
    age: i32,
    marks: f64,
}

impl NewStudent {
    /// Validate all three fields, collecting every failure.
    pub fn new(name: &str, age: i32, marks: f64) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        for res in [validate_name(name), validate_age(age), validate_marks(marks)] {
            if let Err(e) = res {
                errs.push(e);
            }
        }
        errs.into_result()?;

        Ok(Self {
            name: name.trim().to_string(),
            age,
            marks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn marks(&self) -> f64 {
        self.marks
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new(
            "name",
            ValidationCode::Required,
            "Name cannot be empty!",
        ));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::new(
            "name",
            ValidationCode::Len,
            format!("Name too long (max {NAME_MAX_LEN} characters)!"),
        )
        .with_metadata("max", NAME_MAX_LEN));
    }
    Ok(())
}

pub fn validate_age(age: i32) -> Result<(), ValidationError> {
    if AGE_RANGE.contains(&age) {
        return Ok(());
    }
    Err(ValidationError::new(
        "age",
        ValidationCode::Range,
        format!(
            "Age must be between {} and {}!",
            AGE_RANGE.start(),
            AGE_RANGE.end()
        ),
    )
    .with_metadata("min", *AGE_RANGE.start())
    .with_metadata("max", *AGE_RANGE.end()))
}

/// NaN is out of range.
pub fn validate_marks(marks: f64) -> Result<(), ValidationError> {
    if MARKS_RANGE.contains(&marks) {
        return Ok(());
    }
    Err(ValidationError::new(
        "marks",
        ValidationCode::Range,
        format!(
            "Marks must be between {} and {}!",
            MARKS_RANGE.start(),
            MARKS_RANGE.end()
        ),
    )
    .with_metadata("min", *MARKS_RANGE.start())
    .with_metadata("max", *MARKS_RANGE.end()))
}
