#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const CODE: &str = "TEST01";
pub const ADMIN_PIN: &str = "1111";

pub fn lp() -> Command {
    cargo_bin_cmd!("logipunch")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_logipunch.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `--db <db> --test --company TEST01` followed by `args`.
pub fn run(db: &str, args: &[&str]) -> Command {
    let mut cmd = lp();
    cmd.args(["--db", db, "--test", "--company", CODE]).args(args);
    cmd
}

/// Same as [`run`], authenticated with `pin`.
pub fn as_user(db: &str, pin: &str, args: &[&str]) -> Command {
    let mut cmd = run(db, args);
    cmd.args(["--pin", pin]);
    cmd
}

/// Init the DB and create company TEST01 with its administrator (PIN 1111).
pub fn init_company(db_path: &str) {
    lp().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    run(
        db_path,
        &[
            "company",
            "create",
            "--name",
            "Excavation Test",
            "--admin-name",
            "Alice Admin",
            "--admin-pin",
            ADMIN_PIN,
            "--confirm-pin",
            ADMIN_PIN,
            "--admin-phone",
            "514-555-0100",
            "--join-code",
            CODE,
        ],
    )
    .assert()
    .success();
}

/// Company, one project (#1 "Chantier Nord"), and a Manœuvre in group "Nord" (PIN 2222, user #2).
pub fn init_company_with_crew(db_path: &str) {
    init_company(db_path);

    as_user(
        db_path,
        ADMIN_PIN,
        &["project", "add", "--name", "Chantier Nord", "--number", "25-101"],
    )
    .assert()
    .success();

    as_user(
        db_path,
        ADMIN_PIN,
        &[
            "user",
            "add",
            "--name",
            "Bob Worker",
            "--user-pin",
            "2222",
            "--role",
            "manoeuvre",
            "--group",
            "Nord",
            "--phone",
            "(514) 555-0199",
        ],
    )
    .assert()
    .success();
}
