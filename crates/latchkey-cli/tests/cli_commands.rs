use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_latchkey_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("latchkey")
}

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

/// A command pointed at throwaway vault and settings files
fn latchkey(dir: &TempDir) -> Command {
    let mut cmd = Command::new(get_latchkey_bin());
    cmd.arg("--vault")
        .arg(dir.path().join("vault.json"))
        .arg("--config")
        .arg(dir.path().join("settings.json"));
    cmd
}

#[test]
fn test_main_help_lists_commands() {
    let mut cmd = Command::new(get_latchkey_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("suggest"))
        .stdout(predicate::str::contains("never-save"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("Generate shell completion"));
}

#[test]
fn test_match_json_output() {
    let mut cmd = Command::new(get_latchkey_bin());
    cmd.args([
        "--format",
        "json",
        "match",
        "https://www.example.com",
        "https://accounts.example.com",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"matches\": true"))
        .stdout(predicate::str::contains("\"tier\": \"same_site\""));
}

#[test]
fn test_match_package_against_url() {
    let mut cmd = Command::new(get_latchkey_bin());
    cmd.args(["match", "com.android.chrome", "https://example.com"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("NO MATCH"));
}

#[test]
fn test_classify_table_output() {
    let mut cmd = Command::new(get_latchkey_bin());
    cmd.arg("--format")
        .arg("table")
        .arg("classify")
        .arg(fixture_path("login_page.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Field,Role,Input"))
        .stdout(predicate::str::contains("\"password\",password,password"));
}

#[test]
fn test_detect_missing_page_fails() {
    let dir = TempDir::new().unwrap();
    let mut cmd = latchkey(&dir);
    cmd.arg("detect").arg(dir.path().join("missing.json"));

    cmd.assert().failure();
}

#[test]
fn test_suggest_and_search_with_fixture_vault() {
    let dir = TempDir::new().unwrap();
    std::fs::copy(fixture_path("vault.json"), dir.path().join("vault.json")).unwrap();

    let mut cmd = latchkey(&dir);
    cmd.arg("suggest").arg(fixture_path("login_page.json"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("alice@example.com"))
        .stdout(predicate::str::contains("alice.work"));

    let mut cmd = latchkey(&dir);
    cmd.args(["--format", "json", "search", "--query", "bob"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("other.test"))
        .stdout(predicate::str::contains("hunter2hunter2").not());
}

#[test]
fn test_save_then_imports() {
    let dir = TempDir::new().unwrap();

    let mut cmd = latchkey(&dir);
    cmd.arg("save").arg(fixture_path("submitted_login.json"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[OK]"));

    let mut cmd = latchkey(&dir);
    cmd.args(["--format", "table", "imports", "--clear"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"octocat\""));

    let mut cmd = latchkey(&dir);
    cmd.arg("imports");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No credentials pending import"));
}

#[test]
fn test_never_save_add_and_list() {
    let dir = TempDir::new().unwrap();

    let mut cmd = latchkey(&dir);
    cmd.args(["never-save", "https://www.bank.example/login"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Never saving logins"));

    let mut cmd = latchkey(&dir);
    cmd.args(["--format", "json", "never-save", "--list"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"bank.example\""));
}

#[test]
fn test_never_save_rejects_bad_pattern() {
    let dir = TempDir::new().unwrap();

    let mut cmd = latchkey(&dir);
    cmd.args(["never-save", "[*unclosed"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid glob pattern"));
}

#[test]
fn test_generate_respects_length() {
    let dir = TempDir::new().unwrap();

    let mut cmd = latchkey(&dir);
    cmd.args(["--format", "table", "generate", "--length", "24", "--no-symbols"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Za-z0-9]{24},\d+,").unwrap());
}

#[test]
fn test_generate_zero_length_fails() {
    let dir = TempDir::new().unwrap();

    let mut cmd = latchkey(&dir);
    cmd.args(["generate", "--length", "0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 1024"));
}

#[test]
fn test_strength_pretty_output() {
    let mut cmd = Command::new(get_latchkey_bin());
    cmd.args(["strength", "hello"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Very Weak"))
        .stdout(predicate::str::contains("Add uppercase letters"));
}

#[test]
fn test_serve_over_stdin() {
    let dir = TempDir::new().unwrap();

    let mut cmd = latchkey(&dir);
    cmd.arg("serve")
        .write_stdin("{\"action\": \"status\"}\n{\"action\": \"get_passwords\"}\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"status\""))
        .stdout(predicate::str::contains("\"type\":\"locked\""));
}

#[test]
fn test_completion_covers_subcommands_and_flags() {
    let mut cmd = Command::new(get_latchkey_bin());
    cmd.args(["completion", "--shell", "bash"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("never-save"))
        .stdout(predicate::str::contains("--allow-similar"))
        .stdout(predicate::str::contains("--vault"));

    let mut cmd = Command::new(get_latchkey_bin());
    cmd.args(["completion", "--shell", "zsh"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#compdef latchkey"));
}

#[test]
fn test_completion_rejects_unknown_shell() {
    let mut cmd = Command::new(get_latchkey_bin());
    cmd.args(["completion", "--shell", "tcsh"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
