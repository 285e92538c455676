//! Error types for the form engine

use thiserror::Error;

/// Errors raised while addressing or mutating the value tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid field path `{path}`: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("invalid form definition: {0}")]
    InvalidDefinition(String),
}

/// Failure of a submit handler.
///
/// Validation failures never show up here; they are reported through
/// [`crate::SubmitOutcome::Rejected`].
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submit handler failed: {0:#}")]
    Handler(#[source] anyhow::Error),
}

/// Illegal wizard navigation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {step} does not exist (wizard has {len} steps)")]
    OutOfRange { step: usize, len: usize },

    #[error("step {0} is not reachable yet")]
    Unreachable(usize),

    #[error("step {0} must be completed before moving on")]
    Incomplete(usize),

    #[error("already at the last step")]
    AtLastStep,

    #[error("already at the first step")]
    AtFirstStep,
}
