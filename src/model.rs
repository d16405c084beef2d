//! Scope nodes of a parsed behavior specification.
//!
//! Features hold Rules and Scenarios, Rules hold Scenarios, Scenarios hold
//! Steps. The tree is produced by an external parser and is immutable during
//! a run. Each step carries its pre-resolved [`StepMatch`] binding, computed
//! upstream by the step registry — the engine consumes bindings, it never
//! performs text matching itself.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::StepContext;
use crate::error::StepResult;

/// Unordered, deduplicated tag labels attached to a Feature or Scenario.
pub type TagSet = BTreeSet<String>;

/// Build a [`TagSet`] from anything string-like.
pub fn tags<I, S>(labels: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(Into::into).collect()
}

/// Source position of a step definition or check failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File the failure or definition originates from.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A data table attached to a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    /// Rows in source order; each row is a list of cell values.
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a table from rows of cells.
    pub fn new<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = String>,
    {
        Self {
            rows: rows.into_iter().map(|r| r.into_iter().collect()).collect(),
        }
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A step definition body, bound when the step registry matched the step
/// text. Receives the per-step [`StepContext`] and returns a fault value
/// instead of throwing.
pub type StepFn = Box<dyn Fn(&mut StepContext<'_>) -> StepResult>;

/// An executable step binding: the matched definition body plus the
/// arguments captured from the step text.
pub struct StepExec {
    /// The matched definition body.
    pub body: StepFn,
    /// Arguments captured from the step text by the matcher.
    pub captures: Vec<String>,
}

impl StepExec {
    /// Create a binding with no captured arguments.
    pub fn new(body: impl Fn(&mut StepContext<'_>) -> StepResult + 'static) -> Self {
        Self {
            body: Box::new(body),
            captures: Vec::new(),
        }
    }

    /// Attach captured arguments to the binding.
    pub fn with_captures<I, S>(mut self, captures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.captures = captures.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for StepExec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepExec")
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

/// Pre-resolved binding of a step, computed by the step registry.
#[derive(Debug)]
pub enum StepMatch {
    /// No registered definition matched the step text.
    None,

    /// More than one definition matched; `count` is at least 2.
    Ambiguous { count: usize },

    /// Exactly one definition matched.
    Single(StepExec),
}

/// A single step of a scenario.
#[derive(Debug)]
pub struct Step {
    /// The step text as written in the feature file.
    pub text: String,
    /// Optional data table attached below the step.
    pub table: Option<DataTable>,
    /// The pre-resolved binding for this step.
    pub binding: StepMatch,
}

impl Step {
    /// Create a step with its pre-resolved binding.
    pub fn new(text: impl Into<String>, binding: StepMatch) -> Self {
        Self {
            text: text.into(),
            table: None,
            binding,
        }
    }

    /// Attach a data table to the step.
    pub fn with_table(mut self, table: DataTable) -> Self {
        self.table = Some(table);
        self
    }
}

/// A scenario: an ordered sequence of steps, optionally tagged.
#[derive(Debug, Default)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Tags used to filter which hooks apply.
    pub tags: TagSet,
    /// Steps in source order.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Create an empty scenario.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A rule: a named group of scenarios inside a feature. Rules have no
/// hooks of their own.
#[derive(Debug, Default)]
pub struct Rule {
    /// Rule name.
    pub name: String,
    /// Scenarios in source order.
    pub scenarios: Vec<Scenario>,
}

impl Rule {
    /// Create an empty rule.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenarios: Vec::new(),
        }
    }
}

/// A feature: the top-level scope, holding rules and direct scenarios.
#[derive(Debug, Default)]
pub struct Feature {
    /// Feature name.
    pub name: String,
    /// Tags used to filter which hooks apply.
    pub tags: TagSet,
    /// Rules in source order.
    pub rules: Vec<Rule>,
    /// Scenarios declared directly under the feature, in source order.
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Create an empty feature.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// An empty feature holds neither rules nor scenarios; it is invisible
    /// to the report.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.scenarios.is_empty()
    }
}
