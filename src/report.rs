//! Report handler interface and shipped handlers.
//!
//! The engine emits events in traversal order; every `*_end` event carries
//! the scope's final aggregated outcome and elapsed duration. Rendering
//! events into consoles or files is a collaborator's job — this crate only
//! defines the boundary, plus two handlers useful on their own:
//! [`RecordingReport`] for assertions in tests and [`NullReport`] for runs
//! whose only consumer is the returned outcome.

use std::time::Duration;

use serde::Serialize;

use crate::model::{Feature, Rule, Scenario, SourceLocation, Step};
use crate::outcome::Outcome;

/// Observer of traversal progress.
pub trait ReportHandler {
    /// A feature is about to run.
    fn feature_start(&mut self, feature: &Feature);
    /// A feature finished with its aggregated outcome.
    fn feature_end(&mut self, outcome: Outcome, feature: &Feature, duration: Duration);
    /// A rule is about to run.
    fn rule_start(&mut self, rule: &Rule);
    /// A rule finished with its aggregated outcome.
    fn rule_end(&mut self, outcome: Outcome, rule: &Rule, duration: Duration);
    /// A scenario is about to run.
    fn scenario_start(&mut self, scenario: &Scenario);
    /// A scenario finished with its aggregated outcome.
    fn scenario_end(&mut self, outcome: Outcome, scenario: &Scenario, duration: Duration);
    /// A step is about to be attempted.
    fn step_start(&mut self, step: &Step);
    /// A step attempt finished.
    fn step_end(&mut self, outcome: Outcome, step: &Step, duration: Duration);
    /// A step was not attempted because its scenario already failed.
    fn step_skipped(&mut self, step: &Step);
    /// An individual check failure collected during a step.
    fn failure(&mut self, message: &str, location: Option<&SourceLocation>);
    /// Output captured from a step body, trailing whitespace trimmed.
    fn trace(&mut self, text: &str);
    /// The run finished; emitted exactly once, last.
    fn summary(&mut self, total: Duration);
}

/// A single recorded report event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    FeatureStart {
        name: String,
    },
    FeatureEnd {
        name: String,
        outcome: Outcome,
        duration: Duration,
    },
    RuleStart {
        name: String,
    },
    RuleEnd {
        name: String,
        outcome: Outcome,
        duration: Duration,
    },
    ScenarioStart {
        name: String,
    },
    ScenarioEnd {
        name: String,
        outcome: Outcome,
        duration: Duration,
    },
    StepStart {
        text: String,
    },
    StepEnd {
        text: String,
        outcome: Outcome,
        duration: Duration,
    },
    StepSkipped {
        text: String,
    },
    Failure {
        message: String,
        location: Option<SourceLocation>,
    },
    Trace {
        text: String,
    },
    Summary {
        total: Duration,
    },
}

impl Event {
    /// Compact one-line rendering without durations, for sequence
    /// assertions.
    pub fn outline(&self) -> String {
        match self {
            Event::FeatureStart { name } => format!("feature_start {}", name),
            Event::FeatureEnd { name, outcome, .. } => {
                format!("feature_end {} {}", name, outcome)
            }
            Event::RuleStart { name } => format!("rule_start {}", name),
            Event::RuleEnd { name, outcome, .. } => format!("rule_end {} {}", name, outcome),
            Event::ScenarioStart { name } => format!("scenario_start {}", name),
            Event::ScenarioEnd { name, outcome, .. } => {
                format!("scenario_end {} {}", name, outcome)
            }
            Event::StepStart { text } => format!("step_start {}", text),
            Event::StepEnd { text, outcome, .. } => format!("step_end {} {}", text, outcome),
            Event::StepSkipped { text } => format!("step_skipped {}", text),
            Event::Failure { message, .. } => format!("failure {}", message),
            Event::Trace { text } => format!("trace {}", text),
            Event::Summary { .. } => "summary".to_string(),
        }
    }
}

/// Report handler that records every event for later assertion.
#[derive(Debug, Default)]
pub struct RecordingReport {
    events: Vec<Event>,
}

impl RecordingReport {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// One [`Event::outline`] line per recorded event.
    pub fn outline(&self) -> Vec<String> {
        self.events.iter().map(Event::outline).collect()
    }
}

impl ReportHandler for RecordingReport {
    fn feature_start(&mut self, feature: &Feature) {
        self.events.push(Event::FeatureStart {
            name: feature.name.clone(),
        });
    }

    fn feature_end(&mut self, outcome: Outcome, feature: &Feature, duration: Duration) {
        self.events.push(Event::FeatureEnd {
            name: feature.name.clone(),
            outcome,
            duration,
        });
    }

    fn rule_start(&mut self, rule: &Rule) {
        self.events.push(Event::RuleStart {
            name: rule.name.clone(),
        });
    }

    fn rule_end(&mut self, outcome: Outcome, rule: &Rule, duration: Duration) {
        self.events.push(Event::RuleEnd {
            name: rule.name.clone(),
            outcome,
            duration,
        });
    }

    fn scenario_start(&mut self, scenario: &Scenario) {
        self.events.push(Event::ScenarioStart {
            name: scenario.name.clone(),
        });
    }

    fn scenario_end(&mut self, outcome: Outcome, scenario: &Scenario, duration: Duration) {
        self.events.push(Event::ScenarioEnd {
            name: scenario.name.clone(),
            outcome,
            duration,
        });
    }

    fn step_start(&mut self, step: &Step) {
        self.events.push(Event::StepStart {
            text: step.text.clone(),
        });
    }

    fn step_end(&mut self, outcome: Outcome, step: &Step, duration: Duration) {
        self.events.push(Event::StepEnd {
            text: step.text.clone(),
            outcome,
            duration,
        });
    }

    fn step_skipped(&mut self, step: &Step) {
        self.events.push(Event::StepSkipped {
            text: step.text.clone(),
        });
    }

    fn failure(&mut self, message: &str, location: Option<&SourceLocation>) {
        self.events.push(Event::Failure {
            message: message.to_string(),
            location: location.cloned(),
        });
    }

    fn trace(&mut self, text: &str) {
        self.events.push(Event::Trace {
            text: text.to_string(),
        });
    }

    fn summary(&mut self, total: Duration) {
        self.events.push(Event::Summary { total });
    }
}

/// Report handler that discards every event.
#[derive(Debug, Default)]
pub struct NullReport;

impl ReportHandler for NullReport {
    fn feature_start(&mut self, _feature: &Feature) {}
    fn feature_end(&mut self, _outcome: Outcome, _feature: &Feature, _duration: Duration) {}
    fn rule_start(&mut self, _rule: &Rule) {}
    fn rule_end(&mut self, _outcome: Outcome, _rule: &Rule, _duration: Duration) {}
    fn scenario_start(&mut self, _scenario: &Scenario) {}
    fn scenario_end(&mut self, _outcome: Outcome, _scenario: &Scenario, _duration: Duration) {}
    fn step_start(&mut self, _step: &Step) {}
    fn step_end(&mut self, _outcome: Outcome, _step: &Step, _duration: Duration) {}
    fn step_skipped(&mut self, _step: &Step) {}
    fn failure(&mut self, _message: &str, _location: Option<&SourceLocation>) {}
    fn trace(&mut self, _text: &str) {}
    fn summary(&mut self, _total: Duration) {}
}
