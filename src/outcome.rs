//! Outcome classification and the aggregation algebra.
//!
//! Every attempted scope (Feature, Rule, Scenario, Step) ends in exactly one
//! [`Outcome`]. Composite scopes aggregate with AND semantics: `passed` iff
//! every attempted child passed, `failed` otherwise — regardless of which
//! specific non-passed outcome a child produced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result classification of an attempted scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Everything attempted in this scope succeeded.
    Passed,

    /// A step body, hook, or child scope did not succeed.
    Failed,

    /// The step is explicitly marked as not-yet-implemented.
    Pending,

    /// No step definition matched the step text.
    Undefined,

    /// More than one step definition matched the step text.
    Ambiguous,

    /// Not attempted because an ancestor or earlier sibling already failed.
    Skipped,
}

impl Outcome {
    /// Whether this outcome counts as a success for aggregation.
    pub fn is_passed(self) -> bool {
        self == Outcome::Passed
    }

    /// AND-aggregation over sibling scopes. Any non-passed operand makes the
    /// composite `failed`; the specific non-passed variant is not preserved.
    pub fn and(self, other: Outcome) -> Outcome {
        if self.is_passed() && other.is_passed() {
            Outcome::Passed
        } else {
            Outcome::Failed
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Pending => "pending",
            Outcome::Undefined => "undefined",
            Outcome::Ambiguous => "ambiguous",
            Outcome::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}
