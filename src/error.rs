//! Step fault types and their outcome mapping.
//!
//! This module defines [`StepError`], the value returned by step bodies and
//! by step resolution instead of a thrown exception, and the uniform
//! fault-to-outcome mapping applied by the step dispatcher.
//!
//! # Error Handling Strategy
//!
//! - `Pending`, `Undefined` and `Ambiguous` are control outcomes: expected,
//!   non-fatal test states, not engine bugs
//! - `Failed` and `Other` represent test-body defects
//! - No fault of any kind escapes the step dispatcher; everything is
//!   converted into an [`Outcome`] and the run continues

use thiserror::Error;

use crate::outcome::Outcome;

/// A fault raised by a step body or by step resolution.
#[derive(Debug, Error)]
pub enum StepError {
    /// Step is explicitly marked as intentionally not-yet-implemented.
    #[error("step is pending")]
    Pending,

    /// No step definition matched the step text.
    #[error("no matching step definition")]
    Undefined,

    /// More than one step definition matched the step text.
    #[error("step matches {count} definitions")]
    Ambiguous { count: usize },

    /// Step body failed: an explicit failure, a caught panic, or a failed
    /// lifecycle hook around the step.
    #[error("{message}")]
    Failed { message: String },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StepError {
    /// Create a generic failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        StepError::Failed {
            message: message.into(),
        }
    }

    /// The outcome this fault maps to. Applied uniformly regardless of
    /// which stage of step execution raised the fault.
    pub fn outcome(&self) -> Outcome {
        match self {
            StepError::Pending => Outcome::Pending,
            StepError::Undefined => Outcome::Undefined,
            StepError::Ambiguous { .. } => Outcome::Ambiguous,
            StepError::Failed { .. } | StepError::Other(_) => Outcome::Failed,
        }
    }
}

/// Result type returned by step bodies.
pub type StepResult = std::result::Result<(), StepError>;
