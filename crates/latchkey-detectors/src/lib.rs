pub mod autofill;
pub mod classifier;
pub mod detector;
pub mod error;
pub mod grouping;
pub mod password;
pub mod scorer;

pub use autofill::{AutofillEngine, FillDataset, FillResponse, SaveInfo, SaveOutcome, Suggestion};
pub use classifier::FieldClassifier;
pub use detector::{DetectionReport, FormDetector};
pub use error::{Error, Result};
pub use grouping::{FieldGroup, FieldGrouper, GroupKind};
pub use password::{PasswordGenerator, PasswordStrength, StrengthLabel};
pub use scorer::{CandidateForm, FormScorer, ScoringContext};
