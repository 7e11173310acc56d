//! Request routing for the `serve` loop
//!
//! Each request is one JSON object tagged by `action`. Requests that read
//! or write the vault require an unlocked session; everything else (form
//! detection, password tools, status) works while locked.

use anyhow::Result;
use chrono::{DateTime, Utc};
use latchkey_core::{
    AutofillSettings, CredentialRecord, CredentialStore, GeneratorOptions, NewCredential,
    PageSnapshot, SessionContext, UpsertOutcome, UserProfile,
};
use latchkey_detectors::{
    AutofillEngine, DetectionReport, FillResponse, FormDetector, PasswordGenerator,
    PasswordStrength, SaveOutcome,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    Authenticate {
        user: UserProfile,
    },
    SignOut,
    Status,
    GetPasswords {
        #[serde(default)]
        url: Option<String>,
    },
    AddPassword {
        credential: NewCredential,
    },
    Search {
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
    DetectForms {
        page: PageSnapshot,
    },
    Fill {
        page: PageSnapshot,
    },
    Save {
        page: PageSnapshot,
    },
    GeneratePassword {
        #[serde(default)]
        options: Option<GeneratorOptions>,
    },
    CheckStrength {
        password: String,
    },
    NeverSave {
        host: String,
    },
    PendingImports {
        #[serde(default)]
        clear: bool,
    },
    LogActivity {
        kind: String,
        #[serde(default)]
        detail: Option<String>,
    },
}

impl Request {
    /// Whether handling this request touches the vault or the activity log
    pub fn requires_unlock(&self) -> bool {
        match self {
            Request::GetPasswords { .. }
            | Request::AddPassword { .. }
            | Request::Search { .. }
            | Request::Fill { .. }
            | Request::Save { .. }
            | Request::PendingImports { .. }
            | Request::LogActivity { .. } => true,
            Request::Authenticate { .. }
            | Request::SignOut
            | Request::Status
            | Request::DetectForms { .. }
            | Request::GeneratePassword { .. }
            | Request::CheckStrength { .. }
            | Request::NeverSave { .. } => false,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Request::Authenticate { .. } => "authenticate",
            Request::SignOut => "sign_out",
            Request::Status => "status",
            Request::GetPasswords { .. } => "get_passwords",
            Request::AddPassword { .. } => "add_password",
            Request::Search { .. } => "search",
            Request::DetectForms { .. } => "detect_forms",
            Request::Fill { .. } => "fill",
            Request::Save { .. } => "save",
            Request::GeneratePassword { .. } => "generate_password",
            Request::CheckStrength { .. } => "check_strength",
            Request::NeverSave { .. } => "never_save",
            Request::PendingImports { .. } => "pending_imports",
            Request::LogActivity { .. } => "log_activity",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Authenticated {
        user: UserProfile,
        locks_at: Option<DateTime<Utc>>,
    },
    SignedOut,
    Status {
        authenticated: bool,
        locked: bool,
        user: Option<UserProfile>,
        locks_at: Option<DateTime<Utc>>,
        activity_count: usize,
    },
    Credentials {
        credentials: Vec<CredentialRecord>,
    },
    Added {
        id: String,
        outcome: UpsertOutcome,
    },
    Detection {
        report: DetectionReport,
    },
    Fill {
        response: FillResponse,
    },
    Save {
        outcome: SaveOutcome,
    },
    Password {
        password: String,
        strength: PasswordStrength,
    },
    Strength {
        strength: PasswordStrength,
    },
    NeverSave {
        host: String,
        added: bool,
    },
    PendingImports {
        credentials: Vec<CredentialRecord>,
    },
    Logged,
    Locked,
    Error {
        message: String,
    },
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

/// Handle one request against the session, store and settings
pub fn dispatch(
    request: Request,
    session: &mut SessionContext,
    store: &mut dyn CredentialStore,
    settings: &mut AutofillSettings,
) -> Response {
    dispatch_at(request, session, store, settings, Utc::now())
}

/// [`dispatch`] with an explicit clock
pub fn dispatch_at(
    request: Request,
    session: &mut SessionContext,
    store: &mut dyn CredentialStore,
    settings: &mut AutofillSettings,
    now: DateTime<Utc>,
) -> Response {
    let action = request.action();
    tracing::debug!("Dispatching {} request", action);

    if request.requires_unlock() {
        if session.is_locked(now) {
            tracing::info!("Rejected {} request: session is locked", action);
            return Response::Locked;
        }
        session.touch(now);
    }

    match handle(request, session, store, settings, now) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("{} request failed: {:#}", action, e);
            Response::Error {
                message: format!("{:#}", e),
            }
        }
    }
}

fn handle(
    request: Request,
    session: &mut SessionContext,
    store: &mut dyn CredentialStore,
    settings: &mut AutofillSettings,
    now: DateTime<Utc>,
) -> Result<Response> {
    let response = match request {
        Request::Authenticate { user } => {
            session.authenticate(user.clone(), now);
            session.log_activity("authenticate", None, now);
            Response::Authenticated {
                user,
                locks_at: session.locks_at(),
            }
        }
        Request::SignOut => {
            session.sign_out();
            Response::SignedOut
        }
        Request::Status => Response::Status {
            authenticated: session.is_authenticated(),
            locked: session.is_locked(now),
            user: session.user().cloned(),
            locks_at: session.locks_at(),
            activity_count: session.activities().count(),
        },
        Request::GetPasswords { url } => {
            let credentials = match url.as_deref().filter(|u| !u.trim().is_empty()) {
                Some(url) => AutofillEngine::all_matches(url, store)
                    .into_iter()
                    .map(|m| m.record)
                    .collect(),
                None => store.list_all()?,
            };
            Response::Credentials { credentials }
        }
        Request::AddPassword { credential } => {
            if credential.origin.trim().is_empty() || credential.secret.is_empty() {
                anyhow::bail!("A credential needs an origin and a password");
            }
            let record = credential.into_record(now);
            let id = record.id.clone();
            let outcome = store.upsert(record)?;
            session.log_activity("add_password", Some(id.clone()), now);
            Response::Added { id, outcome }
        }
        Request::Search { query, url } => {
            let credentials =
                AutofillEngine::new(settings).search(store, query.as_deref(), url.as_deref())?;
            Response::Credentials { credentials }
        }
        Request::DetectForms { page } => Response::Detection {
            report: FormDetector::detect(&page, settings),
        },
        Request::Fill { page } => {
            let response = AutofillEngine::new(settings).fill(&page, store);
            if !response.suggestions.is_empty() {
                session.log_activity("fill", Some(page.origin.clone()), now);
            }
            Response::Fill { response }
        }
        Request::Save { page } => {
            let outcome = AutofillEngine::new(settings).save(&page, store, now)?;
            if let SaveOutcome::Saved { id, .. } = &outcome {
                session.log_activity("save", Some(id.clone()), now);
            }
            Response::Save { outcome }
        }
        Request::GeneratePassword { options } => {
            let options = options.unwrap_or_else(|| settings.generator.clone());
            options.validate()?;
            let password = PasswordGenerator::generate(&options);
            let strength = PasswordStrength::evaluate(&password);
            Response::Password { password, strength }
        }
        Request::CheckStrength { password } => Response::Strength {
            strength: PasswordStrength::evaluate(&password),
        },
        Request::NeverSave { host } => {
            let added = settings.add_never_save(&host)?;
            Response::NeverSave { host, added }
        }
        Request::PendingImports { clear } => {
            let credentials = if clear {
                store.take_pending_imports()?
            } else {
                store.pending_imports()?
            };
            Response::PendingImports { credentials }
        }
        Request::LogActivity { kind, detail } => {
            session.log_activity(kind, detail, now);
            Response::Logged
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use latchkey_core::{FieldDescriptor, MemoryStore};

    fn alice() -> UserProfile {
        UserProfile {
            uid: "u-1".to_string(),
            email: "alice@example.com".to_string(),
            display_name: Some("Alice".to_string()),
        }
    }

    struct Harness {
        session: SessionContext,
        store: MemoryStore,
        settings: AutofillSettings,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                session: SessionContext::new(15),
                store: MemoryStore::new(),
                settings: AutofillSettings::default(),
            }
        }

        fn send(&mut self, request: Request, now: DateTime<Utc>) -> Response {
            dispatch_at(
                request,
                &mut self.session,
                &mut self.store,
                &mut self.settings,
                now,
            )
        }

        fn unlock(&mut self, now: DateTime<Utc>) {
            self.send(Request::Authenticate { user: alice() }, now);
        }
    }

    fn login_page(origin: &str) -> PageSnapshot {
        PageSnapshot::new(origin)
            .with_field(FieldDescriptor::new("u").with_hints(["username"]).in_container("login"))
            .with_field(FieldDescriptor::new("p").with_hints(["password"]).in_container("login"))
    }

    #[test]
    fn test_vault_requests_require_unlock() {
        let mut harness = Harness::new();
        let response = harness.send(Request::GetPasswords { url: None }, Utc::now());
        assert!(matches!(response, Response::Locked));
    }

    #[test]
    fn test_tools_work_while_locked() {
        let mut harness = Harness::new();
        let now = Utc::now();

        let response = harness.send(
            Request::CheckStrength {
                password: "hello".to_string(),
            },
            now,
        );
        assert!(matches!(response, Response::Strength { .. }));

        let response = harness.send(Request::GeneratePassword { options: None }, now);
        let Response::Password { password, .. } = response else {
            panic!("expected a password, got {:?}", response);
        };
        assert_eq!(password.len(), 16);

        let response = harness.send(
            Request::DetectForms {
                page: login_page("https://example.com/login"),
            },
            now,
        );
        let Response::Detection { report } = response else {
            panic!("expected a detection report, got {:?}", response);
        };
        assert_eq!(report.candidates.len(), 1);
    }

    #[test]
    fn test_add_then_fill() {
        let mut harness = Harness::new();
        let now = Utc::now();
        harness.unlock(now);

        let credential: NewCredential = serde_json::from_value(serde_json::json!({
            "name": "Example",
            "username": "alice",
            "password": "s3cret!",
            "url": "https://www.example.com"
        }))
        .unwrap();
        let response = harness.send(Request::AddPassword { credential }, now);
        assert!(matches!(
            response,
            Response::Added {
                outcome: UpsertOutcome::Created,
                ..
            }
        ));

        let response = harness.send(
            Request::Fill {
                page: login_page("https://example.com/login"),
            },
            now,
        );
        let Response::Fill { response } = response else {
            panic!("expected a fill response, got {:?}", response);
        };
        assert_eq!(response.suggestions.len(), 1);
        assert_eq!(response.suggestions[0].dataset.get("p"), Some("s3cret!"));
    }

    #[test]
    fn test_session_locks_after_idle() {
        let mut harness = Harness::new();
        let start = Utc::now();
        harness.unlock(start);

        let response = harness.send(Request::GetPasswords { url: None }, start + Duration::minutes(10));
        assert!(matches!(response, Response::Credentials { .. }));

        // activity at minute 10 pushes the deadline to minute 25
        let response = harness.send(Request::GetPasswords { url: None }, start + Duration::minutes(20));
        assert!(matches!(response, Response::Credentials { .. }));

        let response = harness.send(Request::GetPasswords { url: None }, start + Duration::minutes(40));
        assert!(matches!(response, Response::Locked));
    }

    #[test]
    fn test_errors_become_error_responses() {
        let mut harness = Harness::new();
        let now = Utc::now();
        harness.unlock(now);

        let credential = NewCredential {
            display_name: None,
            username: "alice".to_string(),
            secret: "pw".to_string(),
            origin: "  ".to_string(),
            notes: None,
            category: None,
            is_favorite: false,
        };
        let response = harness.send(Request::AddPassword { credential }, now);
        assert!(response.is_error());

        let response = harness.send(
            Request::NeverSave {
                host: String::new(),
            },
            now,
        );
        assert!(response.is_error());
    }

    #[test]
    fn test_status_and_sign_out() {
        let mut harness = Harness::new();
        let now = Utc::now();
        harness.unlock(now);
        harness.send(
            Request::LogActivity {
                kind: "popup_opened".to_string(),
                detail: None,
            },
            now,
        );

        let Response::Status {
            authenticated,
            locked,
            activity_count,
            ..
        } = harness.send(Request::Status, now)
        else {
            panic!("expected a status response");
        };
        assert!(authenticated);
        assert!(!locked);
        assert_eq!(activity_count, 2);

        assert!(matches!(harness.send(Request::SignOut, now), Response::SignedOut));
        let Response::Status { locked, .. } = harness.send(Request::Status, now) else {
            panic!("expected a status response");
        };
        assert!(locked);
    }

    #[test]
    fn test_never_save_then_save_is_suppressed() {
        let mut harness = Harness::new();
        let now = Utc::now();
        harness.unlock(now);

        let response = harness.send(
            Request::NeverSave {
                host: "example.com".to_string(),
            },
            now,
        );
        assert!(matches!(response, Response::NeverSave { added: true, .. }));

        let page = PageSnapshot::new("https://example.com/login")
            .with_field(FieldDescriptor::new("u").with_hints(["username"]).with_value("alice"))
            .with_field(FieldDescriptor::new("p").with_hints(["password"]).with_value("pw"));
        let response = harness.send(Request::Save { page }, now);

        assert!(matches!(
            response,
            Response::Save {
                outcome: SaveOutcome::Suppressed
            }
        ));
        assert!(harness.store.is_empty());
    }

    #[test]
    fn test_oversized_password_length_is_an_error() {
        let mut harness = Harness::new();
        let request: Request = serde_json::from_str(
            r#"{"action": "generate_password", "options": {"length": 18446744073709551615}}"#,
        )
        .unwrap();

        let response = harness.send(request, Utc::now());
        let Response::Error { message } = response else {
            panic!("expected an error, got {:?}", response);
        };
        assert!(message.contains("between 1 and 1024"));
    }

    #[test]
    fn test_get_passwords_returns_every_match() {
        let mut harness = Harness::new();
        let now = Utc::now();
        let mut records: Vec<CredentialRecord> = (0..8)
            .map(|i| CredentialRecord::new("https://example.com", format!("user{}", i), "pw", now))
            .collect();
        records.push(CredentialRecord::new("https://other.test", "eve", "pw", now));
        harness.store = MemoryStore::with_records(records);
        harness.unlock(now);

        let response = harness.send(
            Request::GetPasswords {
                url: Some("https://www.example.com/login".to_string()),
            },
            now,
        );
        let Response::Credentials { credentials } = response else {
            panic!("expected credentials, got {:?}", response);
        };
        assert_eq!(credentials.len(), 8);
        assert!(credentials.iter().all(|c| c.origin == "https://example.com"));
    }

    #[test]
    fn test_request_wire_format() {
        let request: Request = serde_json::from_str(
            r#"{"action": "search", "query": "git"}"#,
        )
        .unwrap();
        assert!(matches!(
            request,
            Request::Search { query: Some(ref q), url: None } if q == "git"
        ));

        let request: Request = serde_json::from_str(r#"{"action": "sign_out"}"#).unwrap();
        assert_eq!(request.action(), "sign_out");

        let json = serde_json::to_value(Response::Locked).unwrap();
        assert_eq!(json["type"], "locked");
    }
}
