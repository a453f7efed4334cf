//! Enrollment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered listings over the `enrollments` table.
//! - Surface duplicate-enrollment and dangling-reference saves as
//!   recoverable integrity errors.
//!
//! # Invariants
//! - Uniqueness of `(student_id, formation_id)` is enforced by the store
//!   alone; there is no check-then-act pre-probe before insert.
//! - The update path writes `enrollment_year` only; the identity pair is
//!   immutable post-creation by convention.

use crate::model::enrollment::Enrollment;
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConstraintKind, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const ENROLLMENT_SELECT_SQL: &str =
    "SELECT enrollment_id, student_id, formation_id, enrollment_year FROM enrollments";
const ENROLLMENT_COLUMNS: &[&str] = &[
    "enrollment_id",
    "student_id",
    "formation_id",
    "enrollment_year",
];

/// Repository interface for enrollment records.
pub trait EnrollmentRepository {
    /// Inserts when identity is unassigned, else updates `enrollment_year`
    /// by identity. Returns the record with `enrollment_id` populated.
    fn save(&self, enrollment: &Enrollment) -> RepoResult<Enrollment>;
    /// Removes the row with that identity; missing rows are a no-op.
    fn delete(&self, enrollment_id: i64) -> RepoResult<()>;
    fn get_by_id(&self, enrollment_id: i64) -> RepoResult<Option<Enrollment>>;
    fn get_all(&self) -> RepoResult<Vec<Enrollment>>;
    /// Lists all enrollments of one student.
    fn get_by_student(&self, student_id: &str) -> RepoResult<Vec<Enrollment>>;
    /// Lists all enrollments into one formation.
    fn get_by_formation(&self, formation_id: i64) -> RepoResult<Vec<Enrollment>>;
    /// Point lookup on the unique `(student_id, formation_id)` pair.
    fn get_by_student_and_formation(
        &self,
        student_id: &str,
        formation_id: i64,
    ) -> RepoResult<Option<Enrollment>>;
}

/// SQLite-backed enrollment repository.
pub struct SqliteEnrollmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEnrollmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "enrollments", ENROLLMENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EnrollmentRepository for SqliteEnrollmentRepository<'_> {
    fn save(&self, enrollment: &Enrollment) -> RepoResult<Enrollment> {
        let enrollment_id = match enrollment.enrollment_id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO enrollments (student_id, formation_id, enrollment_year)
                         VALUES (?1, ?2, ?3);",
                        params![
                            enrollment.student_id.as_str(),
                            enrollment.formation_id,
                            enrollment.enrollment_year,
                        ],
                    )
                    .map_err(|err| save_error(enrollment, err))?;
                self.conn.last_insert_rowid()
            }
            Some(enrollment_id) => {
                self.conn
                    .execute(
                        "UPDATE enrollments SET enrollment_year = ?1 WHERE enrollment_id = ?2;",
                        params![enrollment.enrollment_year, enrollment_id],
                    )
                    .map_err(|err| save_error(enrollment, err))?;
                enrollment_id
            }
        };

        Ok(Enrollment {
            enrollment_id: Some(enrollment_id),
            ..enrollment.clone()
        })
    }

    fn delete(&self, enrollment_id: i64) -> RepoResult<()> {
        self.conn
            .execute(
                "DELETE FROM enrollments WHERE enrollment_id = ?1;",
                params![enrollment_id],
            )
            .map_err(|err| match classify_constraint(&err) {
                Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(format!(
                    "cannot delete enrollment {enrollment_id}: grades still reference it"
                )),
                _ => err.into(),
            })?;
        Ok(())
    }

    fn get_by_id(&self, enrollment_id: i64) -> RepoResult<Option<Enrollment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENROLLMENT_SELECT_SQL} WHERE enrollment_id = ?1;"))?;
        let mut rows = stmt.query(params![enrollment_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_enrollment_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Enrollment>> {
        let mut stmt = self.conn.prepare(&format!("{ENROLLMENT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next()? {
            enrollments.push(parse_enrollment_row(row)?);
        }
        Ok(enrollments)
    }

    fn get_by_student(&self, student_id: &str) -> RepoResult<Vec<Enrollment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENROLLMENT_SELECT_SQL} WHERE student_id = ?1;"))?;
        let mut rows = stmt.query(params![student_id])?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next()? {
            enrollments.push(parse_enrollment_row(row)?);
        }
        Ok(enrollments)
    }

    fn get_by_formation(&self, formation_id: i64) -> RepoResult<Vec<Enrollment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENROLLMENT_SELECT_SQL} WHERE formation_id = ?1;"))?;
        let mut rows = stmt.query(params![formation_id])?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next()? {
            enrollments.push(parse_enrollment_row(row)?);
        }
        Ok(enrollments)
    }

    fn get_by_student_and_formation(
        &self,
        student_id: &str,
        formation_id: i64,
    ) -> RepoResult<Option<Enrollment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENROLLMENT_SELECT_SQL} WHERE student_id = ?1 AND formation_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![student_id, formation_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_enrollment_row(row)?));
        }
        Ok(None)
    }
}

fn save_error(enrollment: &Enrollment, err: rusqlite::Error) -> RepoError {
    match classify_constraint(&err) {
        Some((ConstraintKind::Unique, _)) => RepoError::Integrity(format!(
            "student `{}` is already enrolled in formation {}",
            enrollment.student_id, enrollment.formation_id
        )),
        Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(format!(
            "could not save enrollment: student `{}` or formation {} does not exist",
            enrollment.student_id, enrollment.formation_id
        )),
        Some((_, detail)) => {
            RepoError::Integrity(format!("could not save enrollment: {detail}"))
        }
        None => err.into(),
    }
}

fn parse_enrollment_row(row: &Row<'_>) -> RepoResult<Enrollment> {
    Ok(Enrollment {
        enrollment_id: Some(row.get("enrollment_id")?),
        student_id: row.get("student_id")?,
        formation_id: row.get("formation_id")?,
        enrollment_year: row.get("enrollment_year")?,
    })
}
