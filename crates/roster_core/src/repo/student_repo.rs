//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `students` table.
//! - Own the cascade that removes membership rows of a deleted student.
//!
//! # Invariants
//! - `students.id` and `students.email` uniqueness violations surface as
//!   `StudentIdTaken` / `EmailTaken`, never as raw SQLite errors.
//! - Listing order is insertion order (`rowid ASC`).

use super::{ensure_schema_ready, unique_violation_target, ListQuery, RepoError, RepoResult};
use crate::model::student::Student;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    information
FROM students";

/// Repository interface for student CRUD operations.
pub trait StudentRepository {
    fn create_student(&self, student: &Student) -> RepoResult<()>;
    fn get_student(&self, id: &str) -> RepoResult<Option<Student>>;
    fn list_students(&self, query: &ListQuery) -> RepoResult<Vec<Student>>;
    /// Deletes one student with all of its memberships and returns it.
    fn delete_student(&self, id: &str) -> RepoResult<Student>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "students", &["id", "name", "email", "information"])?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(&self, student: &Student) -> RepoResult<()> {
        student.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO students (
                id,
                name,
                email,
                information
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                student.id.as_str(),
                student.name.as_str(),
                student.email.as_str(),
                student.information.as_deref(),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(err) => Err(match unique_violation_target(&err) {
                Some("students.id") => RepoError::StudentIdTaken(student.id.clone()),
                Some("students.email") => RepoError::EmailTaken(student.email.clone()),
                _ => err.into(),
            }),
        }
    }

    fn get_student(&self, id: &str) -> RepoResult<Option<Student>> {
        load_student(self.conn, id)
    }

    fn list_students(&self, query: &ListQuery) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             ORDER BY rowid ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![query.limit, query.skip])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn delete_student(&self, id: &str) -> RepoResult<Student> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let student =
            load_student(&tx, id)?.ok_or_else(|| RepoError::StudentNotFound(id.to_string()))?;

        tx.execute("DELETE FROM group_members WHERE student_id = ?1;", [id])?;
        tx.execute("DELETE FROM students WHERE id = ?1;", [id])?;

        tx.commit()?;
        Ok(student)
    }
}

pub(crate) fn load_student(conn: &Connection, id: &str) -> RepoResult<Option<Student>> {
    let mut stmt = conn.prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_student_row(row)?));
    }
    Ok(None)
}

pub(crate) fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let student = Student {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        information: row.get("information")?,
    };
    student
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("students row `{}`: {err}", student.id)))?;
    Ok(student)
}
