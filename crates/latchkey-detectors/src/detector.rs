use crate::classifier::FieldClassifier;
use crate::grouping::FieldGrouper;
use crate::scorer::{CandidateForm, FormScorer, ScoringContext};
use latchkey_core::{AutofillSettings, PageSnapshot};
use serde::{Deserialize, Serialize};

/// Every login form candidate found on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub origin: String,
    /// Candidates with a non-zero score, in document order
    pub candidates: Vec<CandidateForm>,
}

impl DetectionReport {
    /// Position of the highest scoring candidate; the earliest one wins a tie
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, candidate) in self.candidates.iter().enumerate() {
            match best {
                Some(current) if self.candidates[current].confidence >= candidate.confidence => {}
                _ => best = Some(i),
            }
        }
        best
    }

    pub fn best(&self) -> Option<&CandidateForm> {
        self.best_index().map(|i| &self.candidates[i])
    }

    /// Best candidate, if it clears the confidence threshold
    pub fn best_above(&self, threshold: f64) -> Option<&CandidateForm> {
        self.best().filter(|c| c.meets_threshold(threshold))
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

pub struct FormDetector;

impl FormDetector {
    /// Classify, group and score the fields of a page
    pub fn detect(page: &PageSnapshot, settings: &AutofillSettings) -> DetectionReport {
        tracing::debug!(
            "Detecting login forms on {} ({} fields)",
            page.origin,
            page.fields.len()
        );

        let classified = FieldClassifier::classify_all(&page.fields);
        let groups = FieldGrouper::group(page, &classified, settings.formless_max_distance);

        let candidates: Vec<CandidateForm> = groups
            .iter()
            .map(|group| {
                let mut context = ScoringContext::new(page.origin.clone())
                    .with_structure_text(group.structure_text.clone());
                context.title = page.title.clone();
                FormScorer::score(&group.fields, &context)
            })
            .filter(|candidate| candidate.is_candidate())
            .collect();

        tracing::info!(
            "Found {} login form candidates on {}",
            candidates.len(),
            page.origin
        );

        DetectionReport {
            origin: page.origin.clone(),
            candidates,
        }
    }
}
