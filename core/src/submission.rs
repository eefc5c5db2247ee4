use crate::error::{Plans4YouError, Result};
use crate::form::FormDraft;
use crate::normalizer::normalize;
use crate::presenter::{render_with_status, RenderedView};
use plans4you_protocol::{HealthcareFormValues, Payload, RecommendationSet, Submission};

/// Tracks the busy flag and the current recommendation set across
/// submissions. Only the most recently begun submission may complete;
/// anything older is discarded.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    in_flight: Option<String>,
    current: RecommendationSet,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current(&self) -> &RecommendationSet {
        &self.current
    }

    /// Validate a draft and begin a submission for it.
    pub fn submit(&mut self, draft: &FormDraft) -> Result<Submission> {
        let form = draft.validate()?;
        Ok(self.begin(form))
    }

    pub fn begin(&mut self, form: HealthcareFormValues) -> Submission {
        let submission = Submission::new(form);
        if let Some(previous) = self.in_flight.replace(submission.id.clone()) {
            tracing::debug!("submission {previous} superseded by {}", submission.id);
        }
        tracing::info!("submission {} started", submission.id);
        submission
    }

    /// Apply a resolved payload. The previous set is replaced wholesale.
    pub fn complete(&mut self, id: &str, payload: &Payload) -> Result<&RecommendationSet> {
        if self.in_flight.as_deref() != Some(id) {
            tracing::debug!("discarding response for stale submission {id}");
            return Err(Plans4YouError::StaleSubmission { id: id.to_string() });
        }
        self.in_flight = None;
        self.current = normalize(payload);
        tracing::info!("submission {id} completed");
        Ok(&self.current)
    }

    pub fn view(&self) -> RenderedView {
        render_with_status(&self.current, self.is_busy())
    }
}
