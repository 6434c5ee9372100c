mod common;
use common::{ADMIN_PIN, as_user, init_company_with_crew, setup_test_db, temp_out};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;

const BOB: &str = "2222";

/// Three shifts for Bob (8 h, 4 h, 2 h); the last one is rejected.
fn seed(db: &str) {
    for (inn, out, lunch) in [
        ("2025-03-10 07:00", "2025-03-10 15:30", "30"),
        ("2025-03-11 07:00", "2025-03-11 11:00", "0"),
        ("2025-03-12 07:00", "2025-03-12 09:00", "0"),
    ] {
        as_user(db, BOB, &["punch", "in", "--project", "1", "--at", inn])
            .assert()
            .success();
        as_user(db, BOB, &["punch", "out", "--lunch", lunch, "--at", out])
            .assert()
            .success();
    }

    as_user(db, ADMIN_PIN, &["approvals", "reject", "3"])
        .assert()
        .success();
}

#[test]
fn test_groups_are_listed() {
    let db = setup_test_db("ts_groups");
    init_company_with_crew(&db);

    as_user(&db, ADMIN_PIN, &["timesheet"])
        .assert()
        .success()
        .stdout(contains("Nord"));
}

#[test]
fn test_timesheet_totals_skip_rejected() {
    let db = setup_test_db("ts_totals");
    init_company_with_crew(&db);
    seed(&db);

    as_user(&db, ADMIN_PIN, &["timesheet", "--group", "Nord", "--week", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("Bob Worker"))
        .stdout(contains("12.00"))
        .stdout(contains("14.00").not());
}

#[test]
fn test_export_csv_and_json() {
    let db = setup_test_db("ts_export");
    init_company_with_crew(&db);
    seed(&db);

    let csv = temp_out("ts_export", "csv");
    as_user(
        &db,
        ADMIN_PIN,
        &["timesheet", "--group", "Nord", "--week", "2025-03-10", "--export", "csv", "--file", &csv],
    )
    .assert()
    .success();

    let content = fs::read_to_string(&csv).expect("read csv");
    assert!(content.contains("Excavation Test - Feuille de temps"));
    assert!(content.contains("Bob Worker"));
    assert!(content.contains("25-101"));
    assert!(content.contains("Total semaine"));
    assert!(content.contains("12.00"));

    let json = temp_out("ts_export", "json");
    as_user(
        &db,
        ADMIN_PIN,
        &["timesheet", "--group", "Nord", "--week", "2025-03-10", "--export", "json", "--file", &json],
    )
    .assert()
    .success();

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json).expect("read json")).expect("parse json");
    assert_eq!(doc["group"], "Nord");
    assert_eq!(doc["week_start"], "2025-03-09");
    assert_eq!(doc["total_hours"], 12.0);
    assert_eq!(doc["employees"][0]["name"], "Bob Worker");
    assert_eq!(doc["employees"][0]["entries"].as_array().map(|a| a.len()), Some(2));
}

#[test]
fn test_export_xlsx_and_pdf_files_exist() {
    let db = setup_test_db("ts_binary");
    init_company_with_crew(&db);
    seed(&db);

    for ext in ["xlsx", "pdf"] {
        let out = temp_out("ts_binary", ext);
        as_user(
            &db,
            ADMIN_PIN,
            &["timesheet", "--group", "Nord", "--week", "2025-03-10", "--export", ext, "--file", &out],
        )
        .assert()
        .success();

        assert!(Path::new(&out).exists(), "{ext} file missing");
        let bytes = fs::read(&out).expect("read export");
        assert!(!bytes.is_empty());
        if ext == "pdf" {
            assert!(bytes.starts_with(b"%PDF"));
        }
    }
}

#[test]
fn test_export_force_overwrites_existing_file() {
    let db = setup_test_db("ts_force");
    init_company_with_crew(&db);

    let out = temp_out("ts_force", "csv");
    fs::write(&out, "old").expect("write");

    as_user(
        &db,
        ADMIN_PIN,
        &["timesheet", "--group", "Nord", "--export", "csv", "--file", &out, "--force"],
    )
    .assert()
    .success();

    assert_ne!(fs::read_to_string(&out).expect("read"), "old");
}
