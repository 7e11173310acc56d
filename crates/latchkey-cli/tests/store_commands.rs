use latchkey_core::{AutofillSettings, CredentialStore, JsonFileStore, MatchTier, UpsertOutcome};
use latchkey_detectors::SaveOutcome;
use std::path::PathBuf;
use tempfile::TempDir;

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

/// Copy the fixture vault into a temp dir so tests can write to it
fn temp_vault(dir: &TempDir) -> JsonFileStore {
    let path = dir.path().join("vault.json");
    std::fs::copy(fixture_path("vault.json"), &path).unwrap();
    JsonFileStore::open(path).unwrap()
}

#[test]
fn test_suggest_ranks_fixture_vault() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_vault(&temp_dir);

    let response = latchkey_cli::commands::suggest::suggest_for_page(
        &fixture_path("login_page.json"),
        &store,
        &AutofillSettings::default(),
    )
    .unwrap();

    let usernames: Vec<&str> = response
        .suggestions
        .iter()
        .map(|s| s.username.as_str())
        .collect();
    assert_eq!(usernames, vec!["alice@example.com", "alice.work"]);
    assert_eq!(response.suggestions[0].domain_match.tier, MatchTier::SameHost);
    assert_eq!(response.suggestions[1].domain_match.tier, MatchTier::SameSite);

    let dataset = &response.suggestions[0].dataset;
    assert_eq!(dataset.get("email"), Some("alice@example.com"));
    assert_eq!(dataset.get("password"), Some("Tr0ub4dor&3"));
    assert_eq!(dataset.get("subscribe"), None);
}

#[test]
fn test_suggest_honors_max_suggestions() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_vault(&temp_dir);
    let settings = AutofillSettings {
        max_suggestions: 1,
        ..Default::default()
    };

    let response = latchkey_cli::commands::suggest::suggest_for_page(
        &fixture_path("login_page.json"),
        &store,
        &settings,
    )
    .unwrap();

    assert_eq!(response.suggestions.len(), 1);
}

#[test]
fn test_save_creates_then_updates() {
    let temp_dir = TempDir::new().unwrap();
    let vault_path = temp_dir.path().join("vault.json");
    let settings = AutofillSettings::default();
    let page = fixture_path("submitted_login.json");

    let mut store = JsonFileStore::open(&vault_path).unwrap();
    let first = latchkey_cli::commands::save::save_page(&page, &mut store, &settings).unwrap();
    let SaveOutcome::Saved { id, outcome } = first else {
        panic!("expected the login to be saved, got {:?}", first);
    };
    assert_eq!(outcome, UpsertOutcome::Created);

    let mut reopened = JsonFileStore::open(&vault_path).unwrap();
    let second = latchkey_cli::commands::save::save_page(&page, &mut reopened, &settings).unwrap();
    assert_eq!(
        second,
        SaveOutcome::Saved {
            id: id.clone(),
            outcome: UpsertOutcome::Updated
        }
    );

    let records = JsonFileStore::open(&vault_path).unwrap().list_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].display_name, "Github");
    assert_eq!(records[0].username, "octocat");
    assert_eq!(records[0].notes.as_deref(), Some("Auto-saved from github.com"));

    let pending = latchkey_cli::commands::imports::pending(&mut reopened, true).unwrap();
    assert_eq!(pending.len(), 1);
    assert!(JsonFileStore::open(&vault_path)
        .unwrap()
        .pending_imports()
        .unwrap()
        .is_empty());
}

#[test]
fn test_save_on_never_save_host() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.json");
    let mut store = JsonFileStore::open(temp_dir.path().join("vault.json")).unwrap();

    assert!(latchkey_cli::commands::never_save::add(&settings_path, "github.com").unwrap());
    assert!(!latchkey_cli::commands::never_save::add(&settings_path, "github.com").unwrap());

    let settings = AutofillSettings::load(&settings_path).unwrap();
    let outcome = latchkey_cli::commands::save::save_page(
        &fixture_path("submitted_login.json"),
        &mut store,
        &settings,
    )
    .unwrap();

    assert_eq!(outcome, SaveOutcome::Suppressed);
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_search_fixture_vault() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_vault(&temp_dir);
    let settings = AutofillSettings::default();

    let hits =
        latchkey_cli::commands::search::search(&store, &settings, Some("alice"), None).unwrap();
    assert_eq!(hits.len(), 3);

    let hits = latchkey_cli::commands::search::search(
        &store,
        &settings,
        None,
        Some("com.example.app"),
    )
    .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].display_name, "Example App");
}
