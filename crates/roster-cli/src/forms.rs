//! Interactive input for each menu action.
//!
//! Forms only read and validate; they never touch the database. A rejected
//! form carries the message to show the user.

use crate::console::Console;
use roster::{NewStudent, StudentPatch, validate_age, validate_marks, validate_name};
use std::io::{self, BufRead, Write};

const BAD_AGE: &str = "Error: Please enter a valid integer for age!";
const BAD_MARKS: &str = "Error: Please enter a valid number for marks!";

/// Outcome of reading a form.
#[derive(Debug, Clone, PartialEq)]
pub enum Form<T> {
    Submitted(T),
    /// Input was invalid; the operation is abandoned.
    Rejected(String),
    /// Input ended before the form was complete.
    Closed,
}

/// Read the next line or return [`Form::Closed`] from the enclosing function.
macro_rules! next_line {
    ($console:expr, $label:expr) => {
        match $console.prompt($label)? {
            Some(line) => line,
            None => return Ok(Form::Closed),
        }
    };
}

/// Evaluate a `Result<T, String>` or return [`Form::Rejected`].
macro_rules! accept {
    ($res:expr) => {
        match $res {
            Ok(v) => v,
            Err(msg) => return Ok(Form::Rejected(msg)),
        }
    };
}

pub fn read_new_student<R: BufRead, W: Write, E: Write>(
    console: &mut Console<R, W, E>,
) -> io::Result<Form<NewStudent>> {
    let name = next_line!(console, "Enter Name: ");
    accept!(validate_name(&name).map_err(|e| format!("Error: {}", e.message)));

    let age = next_line!(console, "Enter Age: ");
    let age = accept!(parse_age(&age));
    accept!(validate_age(age).map_err(|e| format!("Error: {}", e.message)));

    let marks = next_line!(console, "Enter Marks: ");
    let marks = accept!(parse_marks(&marks));
    accept!(validate_marks(marks).map_err(|e| format!("Error: {}", e.message)));

    let student = accept!(NewStudent::new(&name, age, marks).map_err(|e| format!("Error: {e}")));
    Ok(Form::Submitted(student))
}

pub fn read_id<R: BufRead, W: Write, E: Write>(
    console: &mut Console<R, W, E>,
    label: &str,
) -> io::Result<Form<i32>> {
    let line = next_line!(console, label);
    let id = accept!(line.trim().parse::<i32>().map_err(|_| "Invalid ID!".to_string()));
    Ok(Form::Submitted(id))
}

/// Read the fields to change. An empty line keeps the current value; a
/// supplied value must satisfy the same rules as on creation.
pub fn read_patch<R: BufRead, W: Write, E: Write>(
    console: &mut Console<R, W, E>,
) -> io::Result<Form<StudentPatch>> {
    let name = next_line!(console, "Enter new Name (or press Enter to keep current): ");
    let age = next_line!(console, "Enter new Age (or press Enter to keep current): ");
    let marks = next_line!(console, "Enter new Marks (or press Enter to keep current): ");

    let patch = StudentPatch {
        name: Some(name.trim().to_string()).filter(|n| !n.is_empty()),
        age: accept!(blank_or(&age, parse_age)),
        marks: accept!(blank_or(&marks, parse_marks)),
    };

    if let Err(errs) = patch.validate() {
        let msg = errs
            .iter()
            .map(|e| format!("Error: {}", e.message))
            .collect::<Vec<_>>()
            .join("\n");
        return Ok(Form::Rejected(msg));
    }
    Ok(Form::Submitted(patch))
}

pub fn read_confirmation<R: BufRead, W: Write, E: Write>(
    console: &mut Console<R, W, E>,
    label: &str,
) -> io::Result<Form<bool>> {
    let answer = next_line!(console, label);
    Ok(Form::Submitted(answer.trim().eq_ignore_ascii_case("y")))
}

fn parse_age(s: &str) -> Result<i32, String> {
    s.trim().parse().map_err(|_| BAD_AGE.to_string())
}

fn parse_marks(s: &str) -> Result<f64, String> {
    s.trim().parse().map_err(|_| BAD_MARKS.to_string())
}

fn blank_or<T>(s: &str, parse: fn(&str) -> Result<T, String>) -> Result<Option<T>, String> {
    if s.trim().is_empty() {
        Ok(None)
    } else {
        parse(s).map(Some)
    }
}
