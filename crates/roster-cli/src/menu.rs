//! The interactive menu and its four handlers.

use crate::console::Console;
use crate::forms::{self, Form};
use crate::table::students_table;
use roster::repo::{self, UpdateOutcome};
use roster::{GenericClient, RosterError};
use std::io::{self, BufRead, Write};

const MENU: &str = "\
=== Student Management System ===
1. Add Student
2. View All Students
3. Update Student
4. Delete Student
5. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    View,
    Update,
    Delete,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    OutOfRange,
}

impl MenuChoice {
    pub fn parse(line: &str) -> Result<Self, ChoiceError> {
        let n: i64 = line.trim().parse().map_err(|_| ChoiceError::NotANumber)?;
        match n {
            1 => Ok(Self::Add),
            2 => Ok(Self::View),
            3 => Ok(Self::Update),
            4 => Ok(Self::Delete),
            5 => Ok(Self::Exit),
            _ => Err(ChoiceError::OutOfRange),
        }
    }
}

/// Whether the loop should keep going after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Closed,
}

/// Unwrap a submitted form, or report/stop and return from the handler.
macro_rules! submitted {
    ($console:expr, $form:expr) => {
        match $form {
            Form::Submitted(v) => v,
            Form::Rejected(msg) => {
                $console.say(msg)?;
                return Ok(Flow::Continue);
            }
            Form::Closed => return Ok(Flow::Closed),
        }
    };
}

/// Run a whole session on an owned connection, closing it at the end.
pub async fn serve<C, R, W, E>(conn: C, console: &mut Console<R, W, E>) -> io::Result<()>
where
    C: GenericClient,
    R: BufRead,
    W: Write,
    E: Write,
{
    run(&conn, console).await?;
    drop(conn);
    console.say("Database connection closed.")
}

/// Run the menu until the user exits or input ends.
///
/// Storage errors are reported on the error stream and never end the loop;
/// only I/O errors on the console itself do.
pub async fn run<C, R, W, E>(conn: &C, console: &mut Console<R, W, E>) -> io::Result<()>
where
    C: GenericClient,
    R: BufRead,
    W: Write,
    E: Write,
{
    loop {
        console.say("")?;
        console.say(MENU)?;
        let Some(line) = console.prompt("Enter your choice: ")? else {
            break;
        };

        let flow = match MenuChoice::parse(&line) {
            Err(ChoiceError::NotANumber) => {
                console.say("Invalid input! Please enter a number.")?;
                Flow::Continue
            }
            Err(ChoiceError::OutOfRange) => {
                console.say("Invalid choice! Please try again.")?;
                Flow::Continue
            }
            Ok(MenuChoice::Exit) => break,
            Ok(MenuChoice::Add) => add_student(conn, console).await?,
            Ok(MenuChoice::View) => view_students(conn, console).await?,
            Ok(MenuChoice::Update) => update_student(conn, console).await?,
            Ok(MenuChoice::Delete) => delete_student(conn, console).await?,
        };
        if flow == Flow::Closed {
            break;
        }
    }

    console.say("Exiting...")
}

fn report<R: BufRead, W: Write, E: Write>(
    console: &mut Console<R, W, E>,
    action: &str,
    err: &RosterError,
) -> io::Result<()> {
    tracing::warn!(action, error = %err, "operation failed");
    console.complain(format!("Error {action}: {err}"))
}

/// Check that `id` exists, reporting either a storage error or the miss.
async fn require_existing<C, R, W, E>(
    conn: &C,
    console: &mut Console<R, W, E>,
    id: i32,
) -> io::Result<bool>
where
    C: GenericClient,
    R: BufRead,
    W: Write,
    E: Write,
{
    match repo::exists(conn, id).await {
        Ok(true) => Ok(true),
        Ok(false) => {
            console.say(format!("Student with ID {id} not found!"))?;
            Ok(false)
        }
        Err(e) => {
            report(console, "checking student existence", &e)?;
            Ok(false)
        }
    }
}

async fn add_student<C, R, W, E>(
    conn: &C,
    console: &mut Console<R, W, E>,
) -> io::Result<Flow>
where
    C: GenericClient,
    R: BufRead,
    W: Write,
    E: Write,
{
    let new = submitted!(console, forms::read_new_student(console)?);

    match repo::insert(conn, &new).await {
        Ok(student) => {
            console.say(format!("Student added successfully! (ID {})", student.id))?
        }
        Err(e) => report(console, "adding student", &e)?,
    }
    Ok(Flow::Continue)
}

async fn view_students<C, R, W, E>(
    conn: &C,
    console: &mut Console<R, W, E>,
) -> io::Result<Flow>
where
    C: GenericClient,
    R: BufRead,
    W: Write,
    E: Write,
{
    match repo::list_all(conn).await {
        Ok(students) if students.is_empty() => console.say("No students found.")?,
        Ok(students) => {
            console.say("")?;
            console.say("=== Student List ===")?;
            console.say(students_table(&students))?;
        }
        Err(e) => report(console, "viewing students", &e)?,
    }
    Ok(Flow::Continue)
}

async fn update_student<C, R, W, E>(
    conn: &C,
    console: &mut Console<R, W, E>,
) -> io::Result<Flow>
where
    C: GenericClient,
    R: BufRead,
    W: Write,
    E: Write,
{
    let id = submitted!(console, forms::read_id(console, "Enter Student ID to update: ")?);
    if !require_existing(conn, console, id).await? {
        return Ok(Flow::Continue);
    }

    let patch = submitted!(console, forms::read_patch(console)?);

    match repo::update(conn, id, &patch).await {
        Ok(UpdateOutcome::NoOp) => console.say("No updates provided!")?,
        Ok(UpdateOutcome::Updated(0)) => console.say("Failed to update student.")?,
        Ok(UpdateOutcome::Updated(_)) => console.say("Student updated successfully!")?,
        Err(e) => report(console, "updating student", &e)?,
    }
    Ok(Flow::Continue)
}

async fn delete_student<C, R, W, E>(
    conn: &C,
    console: &mut Console<R, W, E>,
) -> io::Result<Flow>
where
    C: GenericClient,
    R: BufRead,
    W: Write,
    E: Write,
{
    let id = submitted!(console, forms::read_id(console, "Enter Student ID to delete: ")?);
    if !require_existing(conn, console, id).await? {
        return Ok(Flow::Continue);
    }

    let confirmed = submitted!(
        console,
        forms::read_confirmation(
            console,
            "Are you sure you want to delete this student? (Y/N): "
        )?
    );
    if !confirmed {
        console.say("Deletion cancelled.")?;
        return Ok(Flow::Continue);
    }

    match repo::delete(conn, id).await {
        Ok(0) => console.say("Failed to delete student.")?,
        Ok(_) => console.say("Student deleted successfully!")?,
        Err(e) => report(console, "deleting student", &e)?,
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster::{NewStudent, RosterResult};
    use std::io::Cursor;
    use tokio_postgres::types::ToSql;
    use tokio_postgres::{Client, NoTls, Row, Transaction};

    /// A client whose every call fails, standing in for a broken connection.
    struct FailingClient;

    impl GenericClient for FailingClient {
        async fn query(
            &self,
            _sql: &str,
            _params: &[&(dyn ToSql + Sync)],
        ) -> RosterResult<Vec<Row>> {
            Err(RosterError::Connection("connection reset".to_string()))
        }

        async fn execute(
            &self,
            _sql: &str,
            _params: &[&(dyn ToSql + Sync)],
        ) -> RosterResult<u64> {
            Err(RosterError::Connection("connection reset".to_string()))
        }
    }

    /// A client over an empty table: queries return no rows, writes touch
    /// nothing.
    struct EmptyClient;

    impl GenericClient for EmptyClient {
        async fn query(
            &self,
            _sql: &str,
            _params: &[&(dyn ToSql + Sync)],
        ) -> RosterResult<Vec<Row>> {
            Ok(Vec::new())
        }

        async fn execute(
            &self,
            _sql: &str,
            _params: &[&(dyn ToSql + Sync)],
        ) -> RosterResult<u64> {
            Ok(0)
        }
    }

    /// Reads go to the transaction; writes report zero affected rows, as if
    /// the record vanished between the existence check and the write.
    struct VanishingWrites<'a, 'c>(&'a Transaction<'c>);

    impl GenericClient for VanishingWrites<'_, '_> {
        async fn query(
            &self,
            sql: &str,
            params: &[&(dyn ToSql + Sync)],
        ) -> RosterResult<Vec<Row>> {
            GenericClient::query(self.0, sql, params).await
        }

        async fn execute(
            &self,
            _sql: &str,
            _params: &[&(dyn ToSql + Sync)],
        ) -> RosterResult<u64> {
            Ok(0)
        }
    }

    type TestConsole = Console<Cursor<String>, Vec<u8>, Vec<u8>>;

    fn console(input: &str) -> TestConsole {
        Console::new(Cursor::new(input.to_string()), Vec::new(), Vec::new())
    }

    /// Returns (stdout, stderr).
    fn transcript(console: TestConsole) -> (String, String) {
        let (out, err) = console.into_parts();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    async fn session(conn: &impl GenericClient, input: &str) -> (String, String) {
        let mut console = console(input);
        run(conn, &mut console).await.unwrap();
        transcript(console)
    }

    #[test]
    fn parses_menu_choices() {
        assert_eq!(MenuChoice::parse(" 1 "), Ok(MenuChoice::Add));
        assert_eq!(MenuChoice::parse("5"), Ok(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("6"), Err(ChoiceError::OutOfRange));
        assert_eq!(MenuChoice::parse("0"), Err(ChoiceError::OutOfRange));
        assert_eq!(MenuChoice::parse("add"), Err(ChoiceError::NotANumber));
        assert_eq!(MenuChoice::parse(""), Err(ChoiceError::NotANumber));
    }

    #[tokio::test]
    async fn exit_choice_ends_session() {
        let (out, _) = session(&FailingClient, "5\n").await;
        assert!(out.contains("=== Student Management System ==="));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[tokio::test]
    async fn end_of_input_ends_session() {
        let (out, _) = session(&FailingClient, "").await;
        assert!(out.ends_with("Exiting...\n"));
    }

    #[tokio::test]
    async fn serve_reports_closed_connection_after_exit() {
        let mut console = console("5\n");
        serve(EmptyClient, &mut console).await.unwrap();
        let (out, _) = transcript(console);
        assert!(out.ends_with("Exiting...\nDatabase connection closed.\n"));
    }

    #[tokio::test]
    async fn invalid_choices_keep_looping() {
        let (out, _) = session(&FailingClient, "abc\n9\n5\n").await;
        assert!(out.contains("Invalid input! Please enter a number."));
        assert!(out.contains("Invalid choice! Please try again."));
        assert_eq!(out.matches("Enter your choice: ").count(), 3);
    }

    #[tokio::test]
    async fn storage_errors_go_to_the_error_stream() {
        let (out, err) = session(&FailingClient, "2\n1\nAlice\n20\n90\n5\n").await;
        assert_eq!(
            err,
            "Error viewing students: Connection error: connection reset\n\
             Error adding student: Connection error: connection reset\n"
        );
        assert!(!out.contains("Error viewing students"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[tokio::test]
    async fn validation_error_skips_the_database() {
        let (out, err) = session(&FailingClient, "1\n\n5\n").await;
        assert!(out.contains("Error: Name cannot be empty!"));
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn existence_check_failure_aborts_update() {
        let (out, err) = session(&FailingClient, "3\n7\n5\n").await;
        assert!(err.contains("Error checking student existence"));
        assert!(!out.contains("Enter new Name"));
    }

    #[tokio::test]
    async fn unknown_ids_and_empty_table_are_reported() {
        let (out, err) = session(&EmptyClient, "3\n7\n4\n8\n2\n5\n").await;
        assert!(out.contains("Student with ID 7 not found!"));
        assert!(out.contains("Student with ID 8 not found!"));
        assert!(out.contains("No students found."));
        assert!(!out.contains("Enter new Name"));
        assert!(!out.contains("Are you sure"));
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn invalid_id_aborts_delete() {
        let (out, _) = session(&FailingClient, "4\nx\n5\n").await;
        assert!(out.contains("Invalid ID!"));
    }

    #[tokio::test]
    async fn input_ending_mid_form_ends_session() {
        let (out, _) = session(&FailingClient, "1\nAlice\n").await;
        assert!(out.ends_with("Exiting...\n"));
    }

    // Sessions against a live database. Set `DATABASE_URL` to run them;
    // each works on a temporary table inside a rolled-back transaction.

    async fn try_connect() -> Option<Client> {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL").ok()?;
        let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
            .await
            .expect("Failed to connect to DATABASE_URL with NoTls");
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                eprintln!("tokio-postgres connection error: {e}");
            }
        });
        Some(client)
    }

    async fn temp_table(tx: &Transaction<'_>) {
        tx.batch_execute(
            "CREATE TEMP TABLE students (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                age INTEGER NOT NULL,
                marks REAL NOT NULL
            ) ON COMMIT DROP",
        )
        .await
        .unwrap();
    }

    async fn seed(tx: &Transaction<'_>, name: &str) -> i32 {
        repo::insert(tx, &NewStudent::new(name, 20, 70.0).unwrap())
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn add_then_view_lists_the_new_student() {
        let Some(mut client) = try_connect().await else {
            return;
        };
        let tx = client.transaction().await.unwrap();
        temp_table(&tx).await;

        let (out, err) = session(&tx, "2\n1\nAlice\n20\n91.5\n2\n5\n").await;
        assert!(out.contains("No students found."));
        assert!(out.contains("Student added successfully! (ID "));
        assert!(out.contains("=== Student List ==="));
        assert!(out.contains("91.50"));
        assert!(err.is_empty());

        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn blank_update_is_a_noop() {
        let Some(mut client) = try_connect().await else {
            return;
        };
        let tx = client.transaction().await.unwrap();
        temp_table(&tx).await;
        let id = seed(&tx, "Dana").await;

        let (out, _) = session(&tx, &format!("3\n{id}\n\n\n\n5\n")).await;
        assert!(out.contains("No updates provided!"));
        assert_eq!(repo::find(&tx, id).await.unwrap().unwrap().name, "Dana");

        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn update_changes_supplied_fields() {
        let Some(mut client) = try_connect().await else {
            return;
        };
        let tx = client.transaction().await.unwrap();
        temp_table(&tx).await;
        let id = seed(&tx, "Dana").await;

        let (out, _) = session(&tx, &format!("3\n{id}\nZoe\n\n77\n5\n")).await;
        assert!(out.contains("Student updated successfully!"));
        let s = repo::find(&tx, id).await.unwrap().unwrap();
        assert_eq!((s.name.as_str(), s.age, s.marks), ("Zoe", 20, 77.0));

        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn out_of_range_update_is_rejected() {
        let Some(mut client) = try_connect().await else {
            return;
        };
        let tx = client.transaction().await.unwrap();
        temp_table(&tx).await;
        let id = seed(&tx, "Dana").await;

        let (out, _) = session(&tx, &format!("3\n{id}\n\n150\n\n5\n")).await;
        assert!(out.contains("Error: Age must be between 1 and 120!"));
        assert!(!out.contains("No updates provided!"));
        assert_eq!(repo::find(&tx, id).await.unwrap().unwrap().age, 20);

        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn delete_needs_confirmation() {
        let Some(mut client) = try_connect().await else {
            return;
        };
        let tx = client.transaction().await.unwrap();
        temp_table(&tx).await;
        let id = seed(&tx, "Eve").await;

        let (out, _) = session(&tx, &format!("4\n{id}\nn\n5\n")).await;
        assert!(out.contains("Deletion cancelled."));
        assert!(repo::exists(&tx, id).await.unwrap());

        let (out, _) = session(&tx, &format!("4\n{id}\nY\n5\n")).await;
        assert!(out.contains("Student deleted successfully!"));
        assert!(!repo::exists(&tx, id).await.unwrap());

        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn writes_affecting_no_rows_are_reported_as_failures() {
        let Some(mut client) = try_connect().await else {
            return;
        };
        let tx = client.transaction().await.unwrap();
        temp_table(&tx).await;
        let id = seed(&tx, "Finn").await;

        let conn = VanishingWrites(&tx);
        let (out, _) = session(&conn, &format!("3\n{id}\n\n30\n\n4\n{id}\ny\n5\n")).await;
        assert!(out.contains("Failed to update student."));
        assert!(out.contains("Failed to delete student."));

        tx.rollback().await.unwrap();
    }
}
