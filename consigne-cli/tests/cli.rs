use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::process::Output;

fn export_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join("store_export.csv")
}

fn consigne(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("consigne").unwrap();
    cmd.env("CONSIGNE_HOME", home).env("RUST_LOG", "off");
    cmd
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn test_remaining_text() {
    let home = tempfile::tempdir().unwrap();
    let out = consigne(home.path())
        .args(["remaining", "--client", "c-100", "--file"])
        .arg(export_path())
        .output()
        .unwrap();
    assert!(out.status.success());

    let text = stdout(&out);
    assert!(text.contains("Client c-100: 3 item(s) outstanding"));
    assert!(text.contains("- 1 Chopine Beer"));
    assert!(text.contains("- 2 Bouteille 1.5L Sprite"));
}

#[test]
fn test_remaining_with_dates_json() {
    let home = tempfile::tempdir().unwrap();
    let out = consigne(home.path())
        .args(["remaining", "--client", "c-100", "--dates", "--json", "--file"])
        .arg(export_path())
        .output()
        .unwrap();
    assert!(out.status.success());

    let items: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(items[2]["text"], "2 Bouteille 1.5L Sprite");
    assert_eq!(items[2]["date"], "06/03/2026");
    assert_eq!(items[2]["time"], "17:20");
}

#[test]
fn test_summary_skips_settled_clients() {
    let home = tempfile::tempdir().unwrap();
    let out = consigne(home.path())
        .args(["summary", "--json", "--file"])
        .arg(export_path())
        .output()
        .unwrap();
    assert!(out.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let clients: Vec<&String> = summary.as_object().unwrap().keys().collect();
    assert_eq!(clients, vec!["c-100", "c-300"]);
    assert_eq!(summary["c-300"][0], "1 Bouteille Coca");
}

#[test]
fn test_unknown_client_fails() {
    let home = tempfile::tempdir().unwrap();
    let out = consigne(home.path())
        .args(["remaining", "--client", "nobody", "--file"])
        .arg(export_path())
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no transactions for client 'nobody'"));
}

#[test]
fn test_record_return_then_remaining() {
    let home = tempfile::tempdir().unwrap();
    let ledger = home.path().join("ledger.csv");
    std::fs::copy(export_path(), &ledger).unwrap();

    let out = consigne(home.path())
        .args(["return", "--client", "c-100", "--item", "chopines beer", "--qty", "1", "--file"])
        .arg(&ledger)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).contains("Recorded: Returned: 1 Chopine Beer"));

    let out = consigne(home.path())
        .args(["remaining", "--client", "c-100", "--file"])
        .arg(&ledger)
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(!text.contains("Chopine Beer"));
    assert!(text.contains("2 item(s) outstanding"));
}

#[test]
fn test_return_more_than_held_fails() {
    let home = tempfile::tempdir().unwrap();
    let ledger = home.path().join("ledger.csv");
    std::fs::copy(export_path(), &ledger).unwrap();

    let out = consigne(home.path())
        .args(["return", "--client", "c-100", "--item", "1.5L Sprite", "--qty", "5", "--file"])
        .arg(&ledger)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(stderr(&out).contains("only holds 2 Bouteille 1.5L Sprite"));

    let after = std::fs::read_to_string(&ledger).unwrap();
    assert_eq!(after, std::fs::read_to_string(export_path()).unwrap());
}

#[test]
fn test_config_init_writes_defaults() {
    let home = tempfile::tempdir().unwrap();
    consigne(home.path())
        .args(["config", "init"])
        .assert()
        .success();

    let written = std::fs::read_to_string(home.path().join("config.toml")).unwrap();
    assert!(written.contains("Indian/Mauritius"));
    assert!(written.contains("returned"));
}
