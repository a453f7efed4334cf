//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide upsert-style persistence over the `students` table.
//!
//! # Invariants
//! - `student_id` is caller-supplied and never regenerated.
//! - Save is a single atomic `INSERT .. ON CONFLICT DO UPDATE`; there is no
//!   read-then-write probe deciding between insert and update.

use crate::model::student::Student;
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConstraintKind, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const STUDENT_SELECT_SQL: &str = "SELECT student_id, first_name, last_name FROM students";
const STUDENT_COLUMNS: &[&str] = &["student_id", "first_name", "last_name"];

/// Repository interface for student records.
pub trait StudentRepository {
    /// Upserts by `student_id`: inserts a new row or updates the existing
    /// one in place. Returns the record unchanged.
    fn save(&self, student: &Student) -> RepoResult<Student>;
    /// Removes the row with that identity; missing rows are a no-op.
    fn delete(&self, student_id: &str) -> RepoResult<()>;
    fn get_by_id(&self, student_id: &str) -> RepoResult<Option<Student>>;
    fn get_all(&self) -> RepoResult<Vec<Student>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "students", STUDENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn save(&self, student: &Student) -> RepoResult<Student> {
        self.conn
            .execute(
                "INSERT INTO students (student_id, first_name, last_name)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(student_id) DO UPDATE SET
                    first_name = excluded.first_name,
                    last_name = excluded.last_name;",
                params![
                    student.student_id.as_str(),
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                ],
            )
            .map_err(|err| match classify_constraint(&err) {
                Some((_, detail)) => RepoError::Integrity(format!(
                    "could not save student `{}`: {detail}",
                    student.student_id
                )),
                None => err.into(),
            })?;

        Ok(student.clone())
    }

    fn delete(&self, student_id: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "DELETE FROM students WHERE student_id = ?1;",
                params![student_id],
            )
            .map_err(|err| match classify_constraint(&err) {
                Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(
                    format!("cannot delete student `{student_id}`: enrollments still reference it"),
                ),
                _ => err.into(),
            })?;
        Ok(())
    }

    fn get_by_id(&self, student_id: &str) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE student_id = ?1;"))?;
        let mut rows = stmt.query(params![student_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!("{STUDENT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    Ok(Student {
        student_id: row.get("student_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    })
}
