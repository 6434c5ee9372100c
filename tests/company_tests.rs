mod common;
use common::{ADMIN_PIN, CODE, as_user, init_company, init_company_with_crew, lp, run, setup_test_db};
use predicates::str::contains;

#[test]
fn test_create_company_and_show() {
    let db = setup_test_db("company_show");
    init_company(&db);

    as_user(&db, ADMIN_PIN, &["company", "show"])
        .assert()
        .success()
        .stdout(contains("Excavation Test"))
        .stdout(contains(CODE));
}

#[test]
fn test_show_needs_settings_page() {
    let db = setup_test_db("company_show_pages");
    init_company(&db);

    as_user(
        &db,
        ADMIN_PIN,
        &["user", "add", "--name", "Paul Punch", "--user-pin", "6666", "--pages", "punch"],
    )
    .assert()
    .success();

    as_user(&db, "6666", &["company", "show"])
        .assert()
        .failure()
        .stderr(contains("no access to 'settings'"));

    as_user(
        &db,
        ADMIN_PIN,
        &["user", "add", "--name", "Sara Settings", "--user-pin", "7777", "--pages", "punch,settings"],
    )
    .assert()
    .success();

    as_user(&db, "7777", &["company", "show"])
        .assert()
        .success()
        .stdout(contains("Excavation Test"));
}

#[test]
fn test_create_rejects_mismatched_pins() {
    let db = setup_test_db("company_pin_mismatch");
    lp().args(["--db", &db, "--test", "init"]).assert().success();

    lp().args([
        "--db",
        &db,
        "--test",
        "company",
        "create",
        "--name",
        "Mauvais PIN",
        "--admin-name",
        "Zoé",
        "--admin-pin",
        "1234",
        "--confirm-pin",
        "4321",
    ])
    .assert()
    .failure()
    .stderr(contains("do not match"));
}

#[test]
fn test_join_code_is_case_insensitive() {
    let db = setup_test_db("company_join");
    init_company(&db);

    lp().args(["--db", &db, "--test", "company", "join", "test01"])
        .assert()
        .success()
        .stdout(contains("Excavation Test"));

    lp().args(["--db", &db, "--test", "company", "join", "NOPE99"])
        .assert()
        .failure()
        .stderr(contains("Invalid code"));
}

#[test]
fn test_duplicate_join_code_is_rejected() {
    let db = setup_test_db("company_dup_code");
    init_company(&db);

    run(
        &db,
        &[
            "company",
            "create",
            "--name",
            "Autre",
            "--admin-name",
            "Carl",
            "--admin-pin",
            "9999",
            "--confirm-pin",
            "9999",
            "--join-code",
            CODE,
        ],
    )
    .assert()
    .failure()
    .stderr(contains("already taken"));
}

#[test]
fn test_unknown_company_code_fails() {
    let db = setup_test_db("company_unknown");
    init_company(&db);

    lp().args(["--db", &db, "--test", "--company", "ZZZZZZ", "--pin", ADMIN_PIN, "login"])
        .assert()
        .failure()
        .stderr(contains("Invalid code"));
}

#[test]
fn test_login_shows_projects_and_rejects_bad_pin() {
    let db = setup_test_db("company_login");
    init_company_with_crew(&db);

    as_user(&db, "2222", &["login"])
        .assert()
        .success()
        .stdout(contains("Bob Worker"))
        .stdout(contains("Chantier Nord"))
        .stdout(contains("Not punched in"));

    as_user(&db, "3333", &["login"])
        .assert()
        .failure()
        .stderr(contains("incorrect PIN"));

    run(&db, &["login"])
        .assert()
        .failure()
        .stderr(contains("--pin is required"));
}

#[test]
fn test_update_company_requires_admin() {
    let db = setup_test_db("company_update");
    init_company_with_crew(&db);

    as_user(&db, "2222", &["company", "update", "--name", "Piraté"])
        .assert()
        .failure()
        .stderr(contains("not an administrator"));

    as_user(&db, ADMIN_PIN, &["company", "update", "--address", "12 rue du Port"])
        .assert()
        .success()
        .stdout(contains("12 rue du Port"));
}
