pub mod credential;
pub mod error;
pub mod field;
pub mod origin;
pub mod page;
pub mod session;
pub mod settings;
pub mod store;

pub use credential::{CredentialRecord, NewCredential};
pub use error::{Error, Result};
pub use field::{Bounds, FieldDescriptor, FieldRole, InputClassification};
pub use origin::{DomainMatch, DomainMatcher, HostPattern, MatchTier};
pub use page::{Container, PageSnapshot};
pub use session::{ActivityEntry, SessionContext, UserProfile};
pub use settings::{AutofillSettings, GeneratorOptions};
pub use store::{
    CredentialMatch, CredentialStore, JsonFileStore, MemoryStore, UpsertOutcome, VaultFile,
};
