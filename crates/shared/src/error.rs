use thiserror::Error;

use crate::domain::DraftField;

/// Why a draft submission did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFailure {
    MissingFields { fields: Vec<String> },
    Rejected { status: u16 },
    Transport,
}

/// User-visible failures. Both kinds are recoverable by a fresh user action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("Failed to fetch students. Please try again later.")]
    FetchFailure,
    #[error("{}", submission_message(.0))]
    SubmissionFailure(SubmissionFailure),
}

impl ViewError {
    pub fn missing_fields(fields: &[DraftField]) -> Self {
        ViewError::SubmissionFailure(SubmissionFailure::MissingFields {
            fields: fields.iter().map(|field| field.to_string()).collect(),
        })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ViewError::SubmissionFailure(SubmissionFailure::MissingFields { .. })
        )
    }
}

fn submission_message(failure: &SubmissionFailure) -> &'static str {
    match failure {
        SubmissionFailure::MissingFields { .. } => "All fields are required.",
        SubmissionFailure::Rejected { .. } => "Failed to submit student data.",
        SubmissionFailure::Transport => "An error occurred while submitting the form.",
    }
}
