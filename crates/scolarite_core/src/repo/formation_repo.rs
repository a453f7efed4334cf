//! Formation repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and by-department listing over the `formations` table.
//! - Surface dangling department references as integrity errors at save time.

use crate::model::formation::Formation;
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConstraintKind, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const FORMATION_SELECT_SQL: &str =
    "SELECT formation_id, name, duration_years, department_id FROM formations";
const FORMATION_COLUMNS: &[&str] = &["formation_id", "name", "duration_years", "department_id"];

/// Repository interface for formation records.
pub trait FormationRepository {
    /// Inserts when identity is unassigned, else updates by identity.
    /// Returns the record with `formation_id` populated.
    fn save(&self, formation: &Formation) -> RepoResult<Formation>;
    /// Removes the row with that identity; missing rows are a no-op.
    fn delete(&self, formation_id: i64) -> RepoResult<()>;
    fn get_by_id(&self, formation_id: i64) -> RepoResult<Option<Formation>>;
    fn get_all(&self) -> RepoResult<Vec<Formation>>;
    /// Lists formations belonging to one department.
    fn get_by_department(&self, department_id: i64) -> RepoResult<Vec<Formation>>;
}

/// SQLite-backed formation repository.
pub struct SqliteFormationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFormationRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "formations", FORMATION_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl FormationRepository for SqliteFormationRepository<'_> {
    fn save(&self, formation: &Formation) -> RepoResult<Formation> {
        let formation_id = match formation.formation_id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO formations (name, duration_years, department_id)
                         VALUES (?1, ?2, ?3);",
                        params![
                            formation.name.as_str(),
                            formation.duration_years,
                            formation.department_id,
                        ],
                    )
                    .map_err(|err| save_error(formation, err))?;
                self.conn.last_insert_rowid()
            }
            Some(formation_id) => {
                self.conn
                    .execute(
                        "UPDATE formations
                         SET name = ?1, duration_years = ?2, department_id = ?3
                         WHERE formation_id = ?4;",
                        params![
                            formation.name.as_str(),
                            formation.duration_years,
                            formation.department_id,
                            formation_id,
                        ],
                    )
                    .map_err(|err| save_error(formation, err))?;
                formation_id
            }
        };

        Ok(Formation {
            formation_id: Some(formation_id),
            ..formation.clone()
        })
    }

    fn delete(&self, formation_id: i64) -> RepoResult<()> {
        self.conn
            .execute(
                "DELETE FROM formations WHERE formation_id = ?1;",
                params![formation_id],
            )
            .map_err(|err| match classify_constraint(&err) {
                Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(format!(
                    "cannot delete formation {formation_id}: subjects or enrollments still reference it"
                )),
                _ => err.into(),
            })?;
        Ok(())
    }

    fn get_by_id(&self, formation_id: i64) -> RepoResult<Option<Formation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FORMATION_SELECT_SQL} WHERE formation_id = ?1;"))?;
        let mut rows = stmt.query(params![formation_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_formation_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Formation>> {
        let mut stmt = self.conn.prepare(&format!("{FORMATION_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut formations = Vec::new();
        while let Some(row) = rows.next()? {
            formations.push(parse_formation_row(row)?);
        }
        Ok(formations)
    }

    fn get_by_department(&self, department_id: i64) -> RepoResult<Vec<Formation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FORMATION_SELECT_SQL} WHERE department_id = ?1;"))?;
        let mut rows = stmt.query(params![department_id])?;
        let mut formations = Vec::new();
        while let Some(row) = rows.next()? {
            formations.push(parse_formation_row(row)?);
        }
        Ok(formations)
    }
}

fn save_error(formation: &Formation, err: rusqlite::Error) -> RepoError {
    match classify_constraint(&err) {
        Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(format!(
            "could not save formation `{}`: department id {} does not exist",
            formation.name, formation.department_id
        )),
        Some((_, detail)) => RepoError::Integrity(format!(
            "could not save formation `{}`: {detail}",
            formation.name
        )),
        None => err.into(),
    }
}

fn parse_formation_row(row: &Row<'_>) -> RepoResult<Formation> {
    Ok(Formation {
        formation_id: Some(row.get("formation_id")?),
        name: row.get("name")?,
        duration_years: row.get("duration_years")?,
        department_id: row.get("department_id")?,
    })
}
