use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ledger(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("buildledger").expect("bin");
    cmd.env("BUILDLEDGER_DATA_DIR", dir).env_remove("BUILDLEDGER_LOG");
    cmd
}

fn init(dir: &Path) {
    ledger(dir).arg("init").assert().success();
}

/// Run `transaction add` and return the short ID it printed
fn add_transaction(dir: &Path, args: &[&str]) -> String {
    let output = ledger(dir)
        .args(["transaction", "add"])
        .args(args)
        .output()
        .expect("run");
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("ID:"))
        .map(|id| id.trim().to_string())
        .expect("transaction id in output")
}

#[test]
fn init_creates_collections() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data/categories.json").exists());
    assert!(dir.path().join("data/transactions.json").exists());
    assert!(dir.path().join("data/clients.json").exists());
}

#[test]
fn config_shows_settings() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Near deadline days: 5"))
        .stdout(predicate::str::contains("₸"));
}

#[test]
fn deleting_an_expense_gives_the_amount_back() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .args(["category", "add", "Cash", "--balance", "1000 ₸"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000 ₸"));

    let id = add_transaction(dir.path(), &["Cash", "200", "--type", "expense"]);

    ledger(dir.path())
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("800 ₸"));

    ledger(dir.path())
        .args(["transaction", "delete", &id, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transaction deleted"))
        .stdout(predicate::str::contains("800 ₸ -> 1000 ₸"));

    ledger(dir.path())
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn deleting_income_takes_the_amount_away() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .args(["category", "add", "Cash", "--balance", "700"])
        .assert()
        .success();
    let id = add_transaction(dir.path(), &["Cash", "300", "--type", "income"]);

    ledger(dir.path())
        .args(["transaction", "delete", &id, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000 ₸ -> 700 ₸"));
}

#[test]
fn legacy_text_balance_is_corrected_on_delete() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    // A category and an expense as older records stored them
    let category_id = "5b0c5f2e-7d5c-4a39-9a3c-1f0a3e6b2c11";
    let txn_id = "9e8d7c6b-5a49-4382-a716-253443322110";
    fs::write(
        dir.path().join("data/categories.json"),
        format!(
            r#"{{"categories":[{{"id":"{}","name":"Cash","amount":"1000 ₸"}}]}}"#,
            category_id
        ),
    )
    .unwrap();
    fs::write(
        dir.path().join("data/transactions.json"),
        format!(
            r#"{{"transactions":[{{"id":"{}","category_id":"{}","amount":-20000,"type":"expense",
            "from_user":"Office","to_user":"Supplier","description":"","date":"2025-02-01T10:00:00Z"}}]}}"#,
            txn_id, category_id
        ),
    )
    .unwrap();

    ledger(dir.path())
        .args(["transaction", "delete", txn_id, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000 ₸ -> 1200 ₸"));

    let stored = fs::read_to_string(dir.path().join("data/categories.json")).unwrap();
    assert!(stored.contains("\"balance\": 120000"));
    assert!(!stored.contains("\"amount\""));
}

#[test]
fn missing_category_aborts_delete() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .args(["category", "add", "Cash", "--balance", "1000"])
        .assert()
        .success();
    let id = add_transaction(dir.path(), &["Cash", "200"]);

    // Category removed out of band
    fs::write(dir.path().join("data/categories.json"), r#"{"categories":[]}"#).unwrap();

    ledger(dir.path())
        .args(["transaction", "delete", &id, "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to delete transaction"));

    ledger(dir.path())
        .args(["transaction", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("(missing)"));
}

#[test]
fn unknown_transaction_reports_generic_failure() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .args(["transaction", "delete", "txn-00000000", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to delete transaction"));
}

#[test]
fn declined_delete_keeps_everything() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .args(["category", "add", "Cash", "--balance", "1000"])
        .assert()
        .success();
    let id = add_transaction(dir.path(), &["Cash", "200"]);

    ledger(dir.path())
        .args(["transaction", "delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[y/N]"))
        .stdout(predicate::str::contains("Cancelled."));

    ledger(dir.path())
        .args(["transaction", "show", &id])
        .assert()
        .success();
}

#[test]
fn client_cards_show_progress_and_stage() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .args([
            "client", "add", "Aidar", "Nurlanov", "--number", "17", "--days", "90",
            "--contract", "10000", "--object", "Cottage",
        ])
        .assert()
        .success();
    ledger(dir.path())
        .args(["category", "add", "Cash"])
        .assert()
        .success();
    add_transaction(
        dir.path(),
        &["Cash", "2500", "--type", "income", "--client", "17"],
    );

    ledger(dir.path())
        .args(["client", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nurlanov Aidar"))
        .stdout(predicate::str::contains("Cottage"))
        .stdout(predicate::str::contains("25%"));

    ledger(dir.path())
        .args(["client", "show", "17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[emerald]"))
        .stdout(predicate::str::contains("remaining 7500 ₸"))
        .stdout(predicate::str::contains("Hide icons"));

    ledger(dir.path())
        .args(["client", "toggle-icons", "17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Icons hidden"));

    ledger(dir.path())
        .args(["client", "stage", "17", "built"])
        .assert()
        .success();

    ledger(dir.path())
        .args(["client", "show", "17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[blue]"))
        .stdout(predicate::str::contains("Show icons"))
        .stdout(predicate::str::contains("Deadline").not());

    ledger(dir.path())
        .args(["client", "history", "17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ 2500 ₸"));
}

#[test]
fn overdue_client_is_flagged() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    let client_id = "0f1e2d3c-4b5a-4697-8877-665544332211";
    fs::write(
        dir.path().join("data/clients.json"),
        format!(
            r#"{{"clients":[{{"id":"{}","first_name":"Aidar","last_name":"Nurlanov",
            "client_number":"17","object_name":"","phone":"","construction_address":"",
            "created_at":"2020-01-01T00:00:00Z","construction_days":30,"stage":"building",
            "updated_at":"2020-01-01T00:00:00Z"}}]}}"#,
            client_id
        ),
    )
    .unwrap();

    ledger(dir.path())
        .args(["client", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("! Nurlanov Aidar"))
        .stdout(predicate::str::contains("—"));
}

#[test]
fn oversized_construction_duration_is_rejected() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .args(["client", "add", "Aidar", "Nurlanov", "--number", "17", "--days", "4294967295"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Construction duration too long"));

    // A record written by other means still lists
    fs::write(
        dir.path().join("data/clients.json"),
        r#"{"clients":[{"id":"0f1e2d3c-4b5a-4697-8877-665544332211","first_name":"Aidar",
        "last_name":"Nurlanov","client_number":"17","construction_days":4294967295,
        "updated_at":"2025-01-01T00:00:00Z"}]}"#,
    )
    .unwrap();

    ledger(dir.path())
        .args(["client", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nurlanov Aidar"));
}

#[test]
fn amount_too_large_is_rejected() {
    let dir = TempDir::new().unwrap();
    init(dir.path());

    ledger(dir.path())
        .args(["category", "add", "Cash", "--balance", "99999999999999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}
