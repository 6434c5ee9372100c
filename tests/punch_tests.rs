mod common;
use common::{ADMIN_PIN, as_user, init_company_with_crew, setup_test_db};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

const BOB: &str = "2222";

fn punch_in(db: &str, pin: &str, at: &str) {
    as_user(db, pin, &["punch", "in", "--project", "1", "--at", at])
        .assert()
        .success();
}

#[test]
fn test_punch_in_out_and_week_total() {
    let db = setup_test_db("punch_basic");
    init_company_with_crew(&db);

    as_user(&db, BOB, &["punch", "in", "--project", "1", "--at", "2025-03-10 07:00"])
        .assert()
        .success()
        .stdout(contains("Chantier Nord"))
        .stdout(contains("07:00"));

    as_user(&db, BOB, &["punch", "out", "--lunch", "30", "--at", "2025-03-10 15:30"])
        .assert()
        .success()
        .stdout(contains("8.00 h"))
        .stdout(contains("pending"));

    as_user(&db, BOB, &["hours", "--week", "2025-03-12"])
        .assert()
        .success()
        .stdout(contains("2025-03-09"))
        .stdout(contains("Chantier Nord"))
        .stdout(contains("8.00 h"));
}

#[test]
fn test_cannot_punch_in_twice() {
    let db = setup_test_db("punch_twice");
    init_company_with_crew(&db);

    punch_in(&db, BOB, "2025-03-10 07:00");

    as_user(&db, BOB, &["punch", "in", "--project", "1", "--at", "2025-03-10 08:00"])
        .assert()
        .failure()
        .stderr(contains("Already punched in"));
}

#[test]
fn test_punch_out_without_shift_fails() {
    let db = setup_test_db("punch_out_none");
    init_company_with_crew(&db);

    as_user(&db, BOB, &["punch", "out"])
        .assert()
        .failure()
        .stderr(contains("No open shift"));
}

#[test]
fn test_lunch_over_two_hours_is_rejected() {
    let db = setup_test_db("punch_lunch");
    init_company_with_crew(&db);

    punch_in(&db, BOB, "2025-03-10 07:00");

    as_user(&db, BOB, &["punch", "out", "--lunch", "150", "--at", "2025-03-10 16:00"])
        .assert()
        .failure()
        .stderr(contains("Invalid lunch break"));
}

#[test]
fn test_operator_needs_a_machine() {
    let db = setup_test_db("punch_operator");
    init_company_with_crew(&db);

    as_user(
        &db,
        ADMIN_PIN,
        &["user", "add", "--name", "Olga Op", "--user-pin", "3333", "--role", "Opérateur"],
    )
    .assert()
    .success();

    as_user(&db, "3333", &["punch", "in", "--project", "1"])
        .assert()
        .failure()
        .stderr(contains("machine is required"));

    as_user(
        &db,
        "3333",
        &["punch", "in", "--project", "1", "--machine", "Pelle 320", "--at", "2025-03-10 06:30"],
    )
    .assert()
    .success()
    .stdout(contains("Pelle 320"));
}

#[test]
fn test_switch_project_closes_and_reopens() {
    let db = setup_test_db("punch_switch");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["project", "add", "--name", "Chantier Sud", "--number", "25-102"])
        .assert()
        .success();

    punch_in(&db, BOB, "2025-03-10 07:00");

    as_user(&db, BOB, &["punch", "switch", "--project", "2", "--at", "2025-03-10 11:00"])
        .assert()
        .success()
        .stdout(contains("Moved from Chantier Nord to Chantier Sud"))
        .stdout(contains("4.00 h"));

    as_user(&db, ADMIN_PIN, &["active"])
        .assert()
        .success()
        .stdout(contains("Chantier Sud"))
        .stdout(contains("Bob Worker"));
}

#[test]
fn test_admin_shift_is_auto_approved() {
    let db = setup_test_db("punch_admin");
    init_company_with_crew(&db);

    punch_in(&db, ADMIN_PIN, "2025-03-10 06:00");

    as_user(&db, ADMIN_PIN, &["punch", "out", "--at", "2025-03-10 14:00"])
        .assert()
        .success()
        .stdout(contains("approved"));
}

#[test]
fn test_admin_switch_leaves_segment_pending() {
    let db = setup_test_db("punch_admin_switch");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["project", "add", "--name", "Chantier Sud", "--number", "25-102"])
        .assert()
        .success();

    punch_in(&db, ADMIN_PIN, "2025-03-10 06:00");

    as_user(&db, ADMIN_PIN, &["punch", "switch", "--project", "2", "--at", "2025-03-10 10:00"])
        .assert()
        .success()
        .stdout(contains("4.00 h (pending)"));
}

#[test]
fn test_punch_out_before_punch_in_counts_zero() {
    let db = setup_test_db("punch_out_early");
    init_company_with_crew(&db);

    punch_in(&db, BOB, "2025-03-10 07:00");

    as_user(&db, BOB, &["punch", "out", "--at", "2025-03-10 06:00"])
        .assert()
        .success()
        .stdout(contains("0.00 h"));
}

#[test]
fn test_delete_own_entry() {
    let db = setup_test_db("punch_delete");
    init_company_with_crew(&db);

    punch_in(&db, BOB, "2025-03-10 07:00");
    as_user(&db, BOB, &["punch", "out", "--at", "2025-03-10 12:00"])
        .assert()
        .success();

    as_user(&db, BOB, &["hours", "--delete", "1"])
        .assert()
        .success()
        .stdout(contains("Entry #1 deleted"));

    as_user(&db, BOB, &["hours", "--week", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("No entries this week"));
}

#[test]
fn test_active_lists_open_shifts_only() {
    let db = setup_test_db("punch_active");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["active"])
        .assert()
        .success()
        .stdout(contains("Nobody is punched in"));

    punch_in(&db, BOB, "2025-03-10 07:00");

    as_user(&db, ADMIN_PIN, &["active"])
        .assert()
        .success()
        .stdout(contains("Bob Worker"))
        .stdout(contains("Alice Admin").not());
}
