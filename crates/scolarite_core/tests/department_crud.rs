use scolarite_core::db::open_db_in_memory;
use scolarite_core::{
    Department, DepartmentRepository, Formation, FormationRepository, RepoError,
    SqliteDepartmentRepository, SqliteFormationRepository,
};

#[test]
fn save_returns_populated_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    let saved = repo.save(&Department::new("Computer Science")).unwrap();
    assert!(saved.department_id.is_some());
    assert_eq!(saved.name, "Computer Science");

    let loaded = repo.get_by_id(saved.department_id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn duplicate_name_fails_with_integrity_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    repo.save(&Department::new("Computer Science")).unwrap();
    let err = repo.save(&Department::new("Computer Science")).unwrap_err();

    match err {
        RepoError::Integrity(message) => {
            assert!(message.contains("Computer Science"));
            assert!(message.contains("already exists"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // A distinct name still goes through.
    let saved = repo.save(&Department::new("Mathematics")).unwrap();
    assert!(saved.department_id.is_some());
}

#[test]
fn update_renames_existing_row_in_place() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    let saved = repo.save(&Department::new("Computer Science")).unwrap();
    let renamed = repo
        .save(&Department {
            name: "CS Engineering".to_string(),
            ..saved.clone()
        })
        .unwrap();

    assert_eq!(renamed.department_id, saved.department_id);
    assert_eq!(repo.get_all().unwrap().len(), 1);
    let loaded = repo.get_by_id(saved.department_id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded.name, "CS Engineering");
}

#[test]
fn rename_to_taken_name_fails_with_integrity_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    repo.save(&Department::new("Computer Science")).unwrap();
    let math = repo.save(&Department::new("Mathematics")).unwrap();

    let err = repo
        .save(&Department {
            name: "Computer Science".to_string(),
            ..math
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Integrity(_)));
}

#[test]
fn get_by_name_is_a_point_lookup() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    let saved = repo.save(&Department::new("Mathematics")).unwrap();

    let found = repo.get_by_name("Mathematics").unwrap().unwrap();
    assert_eq!(found, saved);
    assert!(repo.get_by_name("Physics").unwrap().is_none());
}

#[test]
fn delete_missing_identity_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();

    repo.save(&Department::new("Computer Science")).unwrap();
    repo.delete(9999).unwrap();

    assert_eq!(repo.get_all().unwrap().len(), 1);
}

#[test]
fn delete_with_dependent_formations_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let departments = SqliteDepartmentRepository::try_new(&conn).unwrap();
    let formations = SqliteFormationRepository::try_new(&conn).unwrap();

    let department = departments.save(&Department::new("Computer Science")).unwrap();
    let department_id = department.department_id.unwrap();
    formations
        .save(&Formation::new("Software Engineering", 4, department_id))
        .unwrap();

    let err = departments.delete(department_id).unwrap_err();
    match err {
        RepoError::Integrity(message) => assert!(message.contains("formations")),
        other => panic!("unexpected error: {other}"),
    }

    // Still present after the rejected delete.
    assert!(departments.get_by_id(department_id).unwrap().is_some());
}
