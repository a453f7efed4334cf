//! Grade repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered listings over the `grades` table: one score
//!   per saved row, tied to an enrollment and a subject.
//! - Surface dangling enrollment/subject references as integrity errors.

use crate::model::grade::Grade;
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConstraintKind, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const GRADE_SELECT_SQL: &str = "SELECT grade_id, enrollment_id, subject_id, grade FROM grades";
const GRADE_COLUMNS: &[&str] = &["grade_id", "enrollment_id", "subject_id", "grade"];

/// Repository interface for grade records.
pub trait GradeRepository {
    /// Inserts when identity is unassigned, else updates by identity.
    /// Returns the record with `grade_id` populated.
    fn save(&self, grade: &Grade) -> RepoResult<Grade>;
    /// Removes the row with that identity; missing rows are a no-op.
    fn delete(&self, grade_id: i64) -> RepoResult<()>;
    fn get_by_id(&self, grade_id: i64) -> RepoResult<Option<Grade>>;
    fn get_all(&self) -> RepoResult<Vec<Grade>>;
    /// Lists all grades recorded for one enrollment.
    fn get_by_enrollment(&self, enrollment_id: i64) -> RepoResult<Vec<Grade>>;
    /// Lists all grades recorded for one subject.
    fn get_by_subject(&self, subject_id: i64) -> RepoResult<Vec<Grade>>;
}

/// SQLite-backed grade repository.
pub struct SqliteGradeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGradeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "grades", GRADE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl GradeRepository for SqliteGradeRepository<'_> {
    fn save(&self, grade: &Grade) -> RepoResult<Grade> {
        let grade_id = match grade.grade_id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO grades (enrollment_id, subject_id, grade)
                         VALUES (?1, ?2, ?3);",
                        params![grade.enrollment_id, grade.subject_id, grade.grade],
                    )
                    .map_err(|err| save_error(grade, err))?;
                self.conn.last_insert_rowid()
            }
            Some(grade_id) => {
                self.conn
                    .execute(
                        "UPDATE grades
                         SET enrollment_id = ?1, subject_id = ?2, grade = ?3
                         WHERE grade_id = ?4;",
                        params![grade.enrollment_id, grade.subject_id, grade.grade, grade_id],
                    )
                    .map_err(|err| save_error(grade, err))?;
                grade_id
            }
        };

        Ok(Grade {
            grade_id: Some(grade_id),
            ..grade.clone()
        })
    }

    fn delete(&self, grade_id: i64) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM grades WHERE grade_id = ?1;",
            params![grade_id],
        )?;
        Ok(())
    }

    fn get_by_id(&self, grade_id: i64) -> RepoResult<Option<Grade>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GRADE_SELECT_SQL} WHERE grade_id = ?1;"))?;
        let mut rows = stmt.query(params![grade_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_grade_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Grade>> {
        let mut stmt = self.conn.prepare(&format!("{GRADE_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut grades = Vec::new();
        while let Some(row) = rows.next()? {
            grades.push(parse_grade_row(row)?);
        }
        Ok(grades)
    }

    fn get_by_enrollment(&self, enrollment_id: i64) -> RepoResult<Vec<Grade>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GRADE_SELECT_SQL} WHERE enrollment_id = ?1;"))?;
        let mut rows = stmt.query(params![enrollment_id])?;
        let mut grades = Vec::new();
        while let Some(row) = rows.next()? {
            grades.push(parse_grade_row(row)?);
        }
        Ok(grades)
    }

    fn get_by_subject(&self, subject_id: i64) -> RepoResult<Vec<Grade>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GRADE_SELECT_SQL} WHERE subject_id = ?1;"))?;
        let mut rows = stmt.query(params![subject_id])?;
        let mut grades = Vec::new();
        while let Some(row) = rows.next()? {
            grades.push(parse_grade_row(row)?);
        }
        Ok(grades)
    }
}

fn save_error(grade: &Grade, err: rusqlite::Error) -> RepoError {
    match classify_constraint(&err) {
        Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(format!(
            "could not save grade: enrollment {} or subject {} does not exist",
            grade.enrollment_id, grade.subject_id
        )),
        Some((_, detail)) => RepoError::Integrity(format!("could not save grade: {detail}")),
        None => err.into(),
    }
}

fn parse_grade_row(row: &Row<'_>) -> RepoResult<Grade> {
    Ok(Grade {
        grade_id: Some(row.get("grade_id")?),
        enrollment_id: row.get("enrollment_id")?,
        subject_id: row.get("subject_id")?,
        grade: row.get("grade")?,
    })
}
