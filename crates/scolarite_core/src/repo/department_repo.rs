//! Department repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and name-lookup APIs over the `departments` table.
//! - Surface duplicate-name saves as recoverable integrity errors.
//!
//! # Invariants
//! - `name` is unique; the store enforces it, the repository translates the
//!   violation.
//! - Deleting a department that formations still reference is rejected.

use crate::model::department::Department;
use crate::repo::{
    classify_constraint, ensure_connection_ready, ConstraintKind, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const DEPARTMENT_SELECT_SQL: &str = "SELECT department_id, name FROM departments";
const DEPARTMENT_COLUMNS: &[&str] = &["department_id", "name"];

/// Repository interface for department records.
pub trait DepartmentRepository {
    /// Inserts when identity is unassigned, else updates by identity.
    /// Returns the record with `department_id` populated.
    fn save(&self, department: &Department) -> RepoResult<Department>;
    /// Removes the row with that identity; missing rows are a no-op.
    fn delete(&self, department_id: i64) -> RepoResult<()>;
    fn get_by_id(&self, department_id: i64) -> RepoResult<Option<Department>>;
    fn get_by_name(&self, name: &str) -> RepoResult<Option<Department>>;
    fn get_all(&self) -> RepoResult<Vec<Department>>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "departments", DEPARTMENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn save(&self, department: &Department) -> RepoResult<Department> {
        let department_id = match department.department_id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO departments (name) VALUES (?1);",
                        params![department.name.as_str()],
                    )
                    .map_err(|err| save_error(&department.name, err))?;
                self.conn.last_insert_rowid()
            }
            Some(department_id) => {
                self.conn
                    .execute(
                        "UPDATE departments SET name = ?1 WHERE department_id = ?2;",
                        params![department.name.as_str(), department_id],
                    )
                    .map_err(|err| save_error(&department.name, err))?;
                department_id
            }
        };

        Ok(Department {
            department_id: Some(department_id),
            name: department.name.clone(),
        })
    }

    fn delete(&self, department_id: i64) -> RepoResult<()> {
        self.conn
            .execute(
                "DELETE FROM departments WHERE department_id = ?1;",
                params![department_id],
            )
            .map_err(|err| match classify_constraint(&err) {
                Some((ConstraintKind::ForeignKey, _)) => RepoError::Integrity(format!(
                    "cannot delete department {department_id}: formations still reference it"
                )),
                _ => err.into(),
            })?;
        Ok(())
    }

    fn get_by_id(&self, department_id: i64) -> RepoResult<Option<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE department_id = ?1;"))?;
        let mut rows = stmt.query(params![department_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn get_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query(params![name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self.conn.prepare(&format!("{DEPARTMENT_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }
        Ok(departments)
    }
}

fn save_error(name: &str, err: rusqlite::Error) -> RepoError {
    match classify_constraint(&err) {
        Some((ConstraintKind::Unique, _)) => {
            RepoError::Integrity(format!("department with name `{name}` already exists"))
        }
        Some((_, detail)) => {
            RepoError::Integrity(format!("could not save department `{name}`: {detail}"))
        }
        None => err.into(),
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    Ok(Department {
        department_id: Some(row.get("department_id")?),
        name: row.get("name")?,
    })
}
