//! Subject repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and formation/year listing over the `subjects` table.
//! - Surface dangling formation references as integrity errors at save time.
//!
//! # Invariants
//! - `year` is stored as given; its 1..duration_years range is a UI
//!   contract, not a store constraint.

use crate::model::subject::Subject;
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConstraintKind, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const SUBJECT_SELECT_SQL: &str =
    "SELECT subject_id, name, credits, year, formation_id FROM subjects";
const SUBJECT_COLUMNS: &[&str] = &["subject_id", "name", "credits", "year", "formation_id"];

/// Repository interface for subject records.
pub trait SubjectRepository {
    /// Inserts when identity is unassigned, else updates by identity.
    /// Returns the record with `subject_id` populated.
    fn save(&self, subject: &Subject) -> RepoResult<Subject>;
    /// Removes the row with that identity; missing rows are a no-op.
    fn delete(&self, subject_id: i64) -> RepoResult<()>;
    fn get_by_id(&self, subject_id: i64) -> RepoResult<Option<Subject>>;
    fn get_all(&self) -> RepoResult<Vec<Subject>>;
    /// Lists subjects taught in one formation during one year of study.
    fn get_by_formation_and_year(&self, formation_id: i64, year: i64) -> RepoResult<Vec<Subject>>;
}

/// SQLite-backed subject repository.
pub struct SqliteSubjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "subjects", SUBJECT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl SubjectRepository for SqliteSubjectRepository<'_> {
    fn save(&self, subject: &Subject) -> RepoResult<Subject> {
        let subject_id = match subject.subject_id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO subjects (name, credits, year, formation_id)
                         VALUES (?1, ?2, ?3, ?4);",
                        params![
                            subject.name.as_str(),
                            subject.credits,
                            subject.year,
                            subject.formation_id,
                        ],
                    )
                    .map_err(|err| save_error(subject, err))?;
                self.conn.last_insert_rowid()
            }
            Some(subject_id) => {
                self.conn
                    .execute(
                        "UPDATE subjects
                         SET name = ?1, credits = ?2, year = ?3, formation_id = ?4
                         WHERE subject_id = ?5;",
                        params![
                            subject.name.as_str(),
                            subject.credits,
                            subject.year,
                            subject.formation_id,
                            subject_id,
                        ],
                    )
                    .map_err(|err| save_error(subject, err))?;
                subject_id
            }
        };

        Ok(Subject {
            subject_id: Some(subject_id),
            ..subject.clone()
        })
    }

    fn delete(&self, subject_id: i64) -> RepoResult<()> {
        self.conn
            .execute(
                "DELETE FROM subjects WHERE subject_id = ?1;",
                params![subject_id],
            )
            .map_err(|err| match classify_constraint(&err) {
                Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(format!(
                    "cannot delete subject {subject_id}: grades still reference it"
                )),
                _ => err.into(),
            })?;
        Ok(())
    }

    fn get_by_id(&self, subject_id: i64) -> RepoResult<Option<Subject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBJECT_SELECT_SQL} WHERE subject_id = ?1;"))?;
        let mut rows = stmt.query(params![subject_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_subject_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Subject>> {
        let mut stmt = self.conn.prepare(&format!("{SUBJECT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row)?);
        }
        Ok(subjects)
    }

    fn get_by_formation_and_year(&self, formation_id: i64, year: i64) -> RepoResult<Vec<Subject>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUBJECT_SELECT_SQL} WHERE formation_id = ?1 AND year = ?2;"
        ))?;
        let mut rows = stmt.query(params![formation_id, year])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row)?);
        }
        Ok(subjects)
    }
}

fn save_error(subject: &Subject, err: rusqlite::Error) -> RepoError {
    match classify_constraint(&err) {
        Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(format!(
            "could not save subject `{}`: formation id {} does not exist",
            subject.name, subject.formation_id
        )),
        Some((_, detail)) => {
            RepoError::Integrity(format!("could not save subject `{}`: {detail}", subject.name))
        }
        None => err.into(),
    }
}

fn parse_subject_row(row: &Row<'_>) -> RepoResult<Subject> {
    Ok(Subject {
        subject_id: Some(row.get("subject_id")?),
        name: row.get("name")?,
        credits: row.get("credits")?,
        year: row.get("year")?,
        formation_id: row.get("formation_id")?,
    })
}
