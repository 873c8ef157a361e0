//! # roster
//!
//! Student records (id, name, age, marks) kept in one PostgreSQL table.
//!
//! - **Validated input**: [`NewStudent`] can only be built from values that pass
//!   the field rules; failures come back as [`ValidationErrors`]
//! - **Partial updates**: [`build_update`] turns a [`StudentPatch`] into one
//!   parameterized `UPDATE` touching only the supplied fields, or
//!   [`UpdatePlan::NoOp`]
//! - **SQL explicit**: statements are composed with [`Sql`], which keeps text and
//!   parameters apart and numbers placeholders itself
//! - **Transaction-friendly**: [`repo`] functions accept anything implementing
//!   [`GenericClient`]
//!
//! ```ignore
//! use roster::{ConnectOptions, NewStudent, StudentPatch, repo};
//!
//! let client = roster::connect(&ConnectOptions::new(url)).await?;
//! let alice = repo::insert(&client, &NewStudent::new("Alice", 20, 91.0)?).await?;
//! repo::update(&client, alice.id, &StudentPatch::new().marks(93.5)).await?;
//! ```

pub mod changeset;
pub mod client;
pub mod connect;
pub mod error;
pub mod model;
pub mod patch;
pub mod repo;
pub mod row;
pub mod sql;
pub mod value;

pub use changeset::{ValidationCode, ValidationError, ValidationErrors};
pub use client::GenericClient;
pub use connect::{ConnectOptions, connect};
pub use error::{RosterError, RosterResult};
pub use model::{
    AGE_RANGE, MARKS_RANGE, NAME_MAX_LEN, NewStudent, Student, validate_age, validate_marks,
    validate_name,
};
pub use patch::{StudentPatch, UpdatePlan, build_update};
pub use repo::UpdateOutcome;
pub use row::{FromRow, RowExt};
pub use sql::{PlaceholderStyle, Sql, sql};
pub use value::Value;
