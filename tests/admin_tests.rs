mod common;
use common::{ADMIN_PIN, as_user, init_company, init_company_with_crew, setup_test_db};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

#[test]
fn test_user_add_and_list() {
    let db = setup_test_db("admin_user_list");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["user", "list"])
        .assert()
        .success()
        .stdout(contains("Alice Admin"))
        .stdout(contains("Bob Worker"))
        .stdout(contains("Manœuvre"))
        .stdout(contains("+15145550199"));
}

#[test]
fn test_pin_must_be_unique_and_four_digits() {
    let db = setup_test_db("admin_pin_rules");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["user", "add", "--name", "Clone", "--user-pin", "2222"])
        .assert()
        .failure()
        .stderr(contains("already used by Bob Worker"));

    as_user(&db, ADMIN_PIN, &["user", "add", "--name", "Court", "--user-pin", "12"])
        .assert()
        .failure()
        .stderr(contains("Invalid PIN"));
}

#[test]
fn test_non_admin_cannot_manage_users() {
    let db = setup_test_db("admin_forbidden");
    init_company_with_crew(&db);

    as_user(&db, "2222", &["user", "add", "--name", "Eve", "--user-pin", "5555"])
        .assert()
        .failure()
        .stderr(contains("not an administrator"));
}

#[test]
fn test_removed_user_cannot_log_in() {
    let db = setup_test_db("admin_remove");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["user", "remove", "2"])
        .assert()
        .success()
        .stdout(contains("deactivated"));

    as_user(&db, "2222", &["login"]).assert().failure();

    as_user(&db, ADMIN_PIN, &["user", "list"])
        .assert()
        .success()
        .stdout(contains("Bob Worker").not());
}

#[test]
fn test_admin_cannot_remove_self() {
    let db = setup_test_db("admin_remove_self");
    init_company(&db);

    as_user(&db, ADMIN_PIN, &["user", "remove", "1"])
        .assert()
        .failure();
}

#[test]
fn test_project_assignment_limits_available_projects() {
    let db = setup_test_db("admin_assign");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["project", "add", "--name", "Chantier Sud", "--number", "25-102"])
        .assert()
        .success();

    // Bob is assigned to #2 only
    as_user(&db, ADMIN_PIN, &["project", "assign", "2", "--user", "2"])
        .assert()
        .success()
        .stdout(contains("assigned"));

    as_user(&db, "2222", &["login"])
        .assert()
        .success()
        .stdout(contains("Chantier Sud"))
        .stdout(contains("Chantier Nord").not());

    as_user(&db, "2222", &["punch", "in", "--project", "1"])
        .assert()
        .failure()
        .stderr(contains("not available"));

    // toggling again unassigns
    as_user(&db, ADMIN_PIN, &["project", "assign", "2", "--user", "2"])
        .assert()
        .success()
        .stdout(contains("removed"));
}

#[test]
fn test_project_list_and_remove() {
    let db = setup_test_db("admin_project_remove");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["project", "list"])
        .assert()
        .success()
        .stdout(contains("25-101"));

    as_user(&db, ADMIN_PIN, &["project", "remove", "1"])
        .assert()
        .success();

    as_user(&db, ADMIN_PIN, &["project", "list"])
        .assert()
        .success()
        .stdout(contains("No active projects"));
}
