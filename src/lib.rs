//! Cairn - behavior-driven test execution engine.
//!
//! Cairn walks a parsed hierarchy of Features, Rules, Scenarios and Steps,
//! resolves each step against its pre-matched definition, invokes
//! tag-filtered lifecycle hooks, aggregates pass/fail outcomes bottom-up,
//! and reports structured progress events to an observer. Parsing feature
//! files, matching step text against definitions, and rendering reports are
//! collaborator responsibilities consumed at their interface boundary.
//!
//! # Modules
//!
//! - [`context`] - Per-scope execution records and the context stack
//! - [`error`] - Step fault types and their outcome mapping
//! - [`model`] - Scope nodes produced by an external parser
//! - [`outcome`] - Outcome classification and aggregation
//! - [`policy`] - Live-run and dry-run execution strategies
//! - [`registry`] - Hook registration and lifecycle-point lookup
//! - [`report`] - Report handler interface and shipped handlers
//! - [`runner`] - The traversal engine
//!
//! # Example
//!
//! ```
//! use cairn::model::{Feature, Scenario, Step, StepExec, StepMatch};
//! use cairn::policy::LiveRun;
//! use cairn::registry::HookRegistry;
//! use cairn::report::RecordingReport;
//! use cairn::runner::TestRunner;
//! use cairn::Outcome;
//!
//! let mut scenario = Scenario::new("Paying with a gift card");
//! scenario.steps.push(Step::new(
//!     "the balance covers the total",
//!     StepMatch::Single(StepExec::new(|_ctx| Ok(()))),
//! ));
//! let mut feature = Feature::new("Checkout");
//! feature.scenarios.push(scenario);
//!
//! let hooks = HookRegistry::new();
//! let mut report = RecordingReport::new();
//! let outcome = TestRunner::new(&hooks, &LiveRun, &mut report).run(&[feature]);
//!
//! assert_eq!(outcome, Outcome::Passed);
//! ```

pub mod context;
pub mod error;
pub mod model;
pub mod outcome;
pub mod policy;
pub mod registry;
pub mod report;
pub mod runner;

pub use error::{StepError, StepResult};
pub use outcome::Outcome;
