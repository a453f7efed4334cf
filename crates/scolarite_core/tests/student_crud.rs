use rusqlite::Connection;
use scolarite_core::db::open_db_in_memory;
use scolarite_core::{
    Department, DepartmentRepository, Enrollment, EnrollmentRepository, Formation,
    FormationRepository, RepoError, SqliteDepartmentRepository, SqliteEnrollmentRepository,
    SqliteFormationRepository, SqliteStudentRepository, Student, StudentRepository,
};

#[test]
fn save_inserts_then_updates_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    repo.save(&Student::new("S1001", "John", "Doe")).unwrap();
    assert_eq!(repo.get_all().unwrap().len(), 1);

    // Same id again: the row is updated, no new row appears.
    repo.save(&Student::new("S1001", "John", "Doe Jr.")).unwrap();
    assert_eq!(repo.get_all().unwrap().len(), 1);

    let loaded = repo.get_by_id("S1001").unwrap().unwrap();
    assert_eq!(loaded.last_name, "Doe Jr.");
}

#[test]
fn identity_is_caller_supplied_and_never_regenerated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    let saved = repo.save(&Student::new("S2001", "Jane", "Smith")).unwrap();
    assert_eq!(saved.student_id, "S2001");

    assert!(repo.get_by_id("S9999").unwrap().is_none());
}

#[test]
fn delete_missing_identity_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();

    repo.save(&Student::new("S1001", "John", "Doe")).unwrap();
    repo.delete("S9999").unwrap();
    assert_eq!(repo.get_all().unwrap().len(), 1);

    repo.delete("S1001").unwrap();
    assert!(repo.get_all().unwrap().is_empty());
    // Deleting twice stays a no-op.
    repo.delete("S1001").unwrap();
}

#[test]
fn delete_with_dependent_enrollments_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let students = SqliteStudentRepository::try_new(&conn).unwrap();
    let enrollments = SqliteEnrollmentRepository::try_new(&conn).unwrap();

    let formation_id = seed_formation(&conn);
    students.save(&Student::new("S1001", "John", "Doe")).unwrap();
    enrollments
        .save(&Enrollment::new("S1001", formation_id, 2023))
        .unwrap();

    let err = students.delete("S1001").unwrap_err();
    match err {
        RepoError::Integrity(message) => {
            assert!(message.contains("S1001"));
            assert!(message.contains("enrollments"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn seed_formation(conn: &Connection) -> i64 {
    let departments = SqliteDepartmentRepository::try_new(conn).unwrap();
    let formations = SqliteFormationRepository::try_new(conn).unwrap();
    let department = departments.save(&Department::new("Computer Science")).unwrap();
    formations
        .save(&Formation::new(
            "Software Engineering",
            4,
            department.department_id.unwrap(),
        ))
        .unwrap()
        .formation_id
        .unwrap()
}
