use rusqlite::Connection;
use scolarite_core::db::open_db_in_memory;
use scolarite_core::{
    Department, DepartmentRepository, Enrollment, EnrollmentRepository, Formation,
    FormationRepository, RepoError, SqliteDepartmentRepository, SqliteEnrollmentRepository,
    SqliteFormationRepository, SqliteStudentRepository, Student, StudentRepository,
};

#[test]
fn duplicate_student_formation_pair_fails_on_second_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEnrollmentRepository::try_new(&conn).unwrap();
    let formation_id = seed_formation(&conn, "Software Engineering");
    seed_student(&conn, "S1001");

    repo.save(&Enrollment::new("S1001", formation_id, 2023))
        .unwrap();
    let err = repo
        .save(&Enrollment::new("S1001", formation_id, 2025))
        .unwrap_err();

    match err {
        RepoError::Integrity(message) => {
            assert!(message.contains("S1001"));
            assert!(message.contains("already enrolled"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.get_all().unwrap().len(), 1);
}

#[test]
fn changing_only_enrollment_year_does_not_violate_uniqueness() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEnrollmentRepository::try_new(&conn).unwrap();
    let formation_id = seed_formation(&conn, "Software Engineering");
    seed_student(&conn, "S1001");

    let saved = repo
        .save(&Enrollment::new("S1001", formation_id, 2023))
        .unwrap();
    let updated = repo
        .save(&Enrollment {
            enrollment_year: 2024,
            ..saved.clone()
        })
        .unwrap();
    assert_eq!(updated.enrollment_id, saved.enrollment_id);

    let loaded = repo.get_by_id(saved.enrollment_id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.enrollment_year, 2024);
    assert_eq!(repo.get_all().unwrap().len(), 1);
}

#[test]
fn save_with_missing_student_or_formation_fails_with_integrity_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEnrollmentRepository::try_new(&conn).unwrap();
    let formation_id = seed_formation(&conn, "Software Engineering");

    // Student S1001 was never created.
    let err = repo
        .save(&Enrollment::new("S1001", formation_id, 2023))
        .unwrap_err();
    match err {
        RepoError::Integrity(message) => assert!(message.contains("does not exist")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn enrollments_are_listed_by_student_and_by_formation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEnrollmentRepository::try_new(&conn).unwrap();
    let swe_id = seed_formation(&conn, "Software Engineering");
    let ds_id = seed_formation_under_existing_department(&conn, "Data Science", 3);
    seed_student(&conn, "S1001");
    seed_student(&conn, "S1002");

    repo.save(&Enrollment::new("S1001", swe_id, 2023)).unwrap();
    repo.save(&Enrollment::new("S1001", ds_id, 2024)).unwrap();
    repo.save(&Enrollment::new("S1002", swe_id, 2023)).unwrap();

    let for_s1001 = repo.get_by_student("S1001").unwrap();
    assert_eq!(for_s1001.len(), 2);
    assert!(for_s1001.iter().all(|e| e.student_id == "S1001"));

    let in_swe = repo.get_by_formation(swe_id).unwrap();
    assert_eq!(in_swe.len(), 2);
    assert!(in_swe.iter().all(|e| e.formation_id == swe_id));

    let pair = repo
        .get_by_student_and_formation("S1001", ds_id)
        .unwrap()
        .unwrap();
    assert_eq!(pair.enrollment_year, 2024);
    assert!(repo
        .get_by_student_and_formation("S1002", ds_id)
        .unwrap()
        .is_none());
}

#[test]
fn delete_missing_identity_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEnrollmentRepository::try_new(&conn).unwrap();
    let formation_id = seed_formation(&conn, "Software Engineering");
    seed_student(&conn, "S1001");

    repo.save(&Enrollment::new("S1001", formation_id, 2023))
        .unwrap();
    repo.delete(9999).unwrap();
    assert_eq!(repo.get_all().unwrap().len(), 1);
}

fn seed_formation(conn: &Connection, name: &str) -> i64 {
    let departments = SqliteDepartmentRepository::try_new(conn).unwrap();
    let formations = SqliteFormationRepository::try_new(conn).unwrap();
    let department = departments.save(&Department::new("Computer Science")).unwrap();
    formations
        .save(&Formation::new(name, 4, department.department_id.unwrap()))
        .unwrap()
        .formation_id
        .unwrap()
}

fn seed_formation_under_existing_department(
    conn: &Connection,
    name: &str,
    duration_years: i64,
) -> i64 {
    let departments = SqliteDepartmentRepository::try_new(conn).unwrap();
    let formations = SqliteFormationRepository::try_new(conn).unwrap();
    let department = departments
        .get_by_name("Computer Science")
        .unwrap()
        .expect("department seeded first");
    formations
        .save(&Formation::new(
            name,
            duration_years,
            department.department_id.unwrap(),
        ))
        .unwrap()
        .formation_id
        .unwrap()
}

fn seed_student(conn: &Connection, student_id: &str) {
    let students = SqliteStudentRepository::try_new(conn).unwrap();
    students
        .save(&Student::new(student_id, "Test", "Student"))
        .unwrap();
}
