//! Depth-first traversal of the Feature → Rule → Scenario → Step hierarchy.
//!
//! The whole run is one synchronous call stack mirroring the hierarchy.
//! Failure never aborts traversal: it is absorbed into outcomes, skips the
//! remaining steps of the affected scenario, and worsens ancestor scopes
//! through AND-aggregation. The only run-level short-circuit is a failing
//! `beforeAll` hook call, which suppresses the feature loop entirely;
//! `afterAll` still runs unconditionally.

use tracing::{debug, warn};

use crate::context::{ContextManager, StepContext};
use crate::error::{StepError, StepResult};
use crate::model::{Feature, Rule, Scenario, Step, StepExec, StepMatch, TagSet};
use crate::outcome::Outcome;
use crate::policy::RunPolicy;
use crate::registry::{HookKind, HookRegistry};
use crate::report::ReportHandler;

/// Walks a feature tree once, driving hooks, step dispatch, and reporting.
pub struct TestRunner<'a> {
    hooks: &'a HookRegistry,
    policy: &'a dyn RunPolicy,
    report: &'a mut dyn ReportHandler,
    ctx: ContextManager,
}

impl<'a> TestRunner<'a> {
    /// Create a runner with explicit collaborators. The policy decides
    /// whether matched bodies actually execute (live run vs dry-run).
    pub fn new(
        hooks: &'a HookRegistry,
        policy: &'a dyn RunPolicy,
        report: &'a mut dyn ReportHandler,
    ) -> Self {
        Self {
            hooks,
            policy,
            report,
            ctx: ContextManager::new(),
        }
    }

    /// Run every feature in order, invoking `beforeAll`/`afterAll` around
    /// the loop, and emit the final summary event. Returns the aggregated
    /// outcome of the whole run.
    pub fn run(mut self, features: &[Feature]) -> Outcome {
        debug!(features = features.len(), "starting run");

        let no_tags = TagSet::new();
        if self.policy.execute_hook(self.hooks, HookKind::BeforeAll, &no_tags) {
            for feature in features {
                self.run_feature(feature);
            }
        } else {
            self.ctx.current_mut().mark_failed();
        }

        // afterAll runs regardless of beforeAll's result.
        if !self.policy.execute_hook(self.hooks, HookKind::AfterAll, &no_tags) {
            self.ctx.current_mut().mark_failed();
        }

        self.report.summary(self.ctx.current().elapsed());
        self.ctx.current().outcome()
    }

    fn run_feature(&mut self, feature: &Feature) {
        // An empty feature is invisible to the report.
        if feature.is_empty() {
            return;
        }

        self.ctx.enter();
        self.report.feature_start(feature);

        if self
            .policy
            .execute_hook(self.hooks, HookKind::BeforeFeature, &feature.tags)
        {
            self.run_rules(&feature.rules);
            self.run_scenarios(&feature.scenarios);
        } else {
            self.ctx.current_mut().mark_failed();
        }

        if !self
            .policy
            .execute_hook(self.hooks, HookKind::AfterFeature, &feature.tags)
        {
            self.ctx.current_mut().mark_failed();
        }

        self.report
            .feature_end(self.ctx.current().outcome(), feature, self.ctx.current().elapsed());

        let record = self.ctx.exit();
        if !record.outcome().is_passed() {
            self.ctx.current_mut().mark_failed();
        }
    }

    fn run_rules(&mut self, rules: &[Rule]) {
        for rule in rules {
            self.ctx.enter();
            self.report.rule_start(rule);

            self.run_scenarios(&rule.scenarios);

            self.report
                .rule_end(self.ctx.current().outcome(), rule, self.ctx.current().elapsed());

            let record = self.ctx.exit();
            if !record.outcome().is_passed() {
                self.ctx.current_mut().mark_failed();
            }
        }
    }

    fn run_scenarios(&mut self, scenarios: &[Scenario]) {
        let mut aggregate = Outcome::Passed;
        for scenario in scenarios {
            self.ctx.enter();
            self.report.scenario_start(scenario);

            if self
                .policy
                .execute_hook(self.hooks, HookKind::Before, &scenario.tags)
            {
                self.execute_steps(scenario);
            } else {
                self.ctx.current_mut().mark_failed();
            }

            // after hooks run even when the before hooks failed.
            if !self
                .policy
                .execute_hook(self.hooks, HookKind::After, &scenario.tags)
            {
                self.ctx.current_mut().mark_failed();
            }

            self.report.scenario_end(
                self.ctx.current().outcome(),
                scenario,
                self.ctx.current().elapsed(),
            );
            aggregate = aggregate.and(self.ctx.exit().outcome());
        }

        if !aggregate.is_passed() {
            self.ctx.current_mut().mark_failed();
        }
    }

    fn execute_steps(&mut self, scenario: &Scenario) {
        // No early return: the per-step skip rule handles the rest of the
        // sequence once the scenario has diverged from passed.
        for step in &scenario.steps {
            self.manage_execute_step(scenario, step);
        }
    }

    fn manage_execute_step(&mut self, scenario: &Scenario, step: &Step) {
        self.ctx.enter_step();

        if !self.ctx.parent_outcome().is_passed() {
            self.report.step_skipped(step);
            self.ctx.exit();
            return;
        }

        self.report.step_start(step);
        self.wrap_execute_step(scenario, step);
        self.report
            .step_end(self.ctx.current().outcome(), step, self.ctx.current().elapsed());

        let record = self.ctx.exit();
        if !record.outcome().is_passed() {
            self.ctx.current_mut().mark_failed();
        }
    }

    /// Step attempt wrapped in the capture shims. Buffered output is
    /// trimmed and forwarded as a `Trace` event first; collected check
    /// failures follow as `Failure` events and force the step to `failed`
    /// even when the body returned `Ok`. Both buffers are drained on every
    /// exit path out of the dispatch.
    fn wrap_execute_step(&mut self, scenario: &Scenario, step: &Step) {
        self.dispatch_step(scenario, step);

        let output = self.ctx.innermost_step().take_output();
        let output = output.trim_end();
        if !output.is_empty() {
            self.report.trace(output);
        }

        let failures = self.ctx.innermost_step().take_failures();
        for failure in &failures {
            self.report
                .failure(&failure.message, failure.location.as_ref());
        }
        if !failures.is_empty() {
            self.ctx.current_mut().set_outcome(Outcome::Failed);
        }
    }

    /// Step dispatcher: a direct match over the pre-resolved binding with
    /// every fault funneled through the uniform outcome mapping. This is
    /// the hard boundary — nothing raised below escapes past it.
    fn dispatch_step(&mut self, scenario: &Scenario, step: &Step) {
        let result = match &step.binding {
            StepMatch::None => Err(StepError::Undefined),
            StepMatch::Ambiguous { count } => Err(StepError::Ambiguous { count: *count }),
            StepMatch::Single(exec) => self.dispatch_single(scenario, step, exec),
        };

        if let Err(fault) = result {
            let outcome = fault.outcome();
            if outcome == Outcome::Failed {
                warn!(step = %step.text, error = %fault, "step failed");
            }
            self.ctx.current_mut().set_outcome(outcome);
        }
    }

    /// Run a single matched step. The `afterStep` obligation is entered
    /// before the body is attempted and honored on every path out: body
    /// faults are values by this point, so the sequential
    /// before → body → after ordering realises the cleanup guarantee.
    fn dispatch_single(&mut self, scenario: &Scenario, step: &Step, exec: &StepExec) -> StepResult {
        let result = if self
            .policy
            .execute_hook(self.hooks, HookKind::BeforeStep, &scenario.tags)
        {
            let mut step_ctx =
                StepContext::new(&exec.captures, step.table.as_ref(), self.ctx.innermost_step());
            self.policy.execute_step(&mut step_ctx, exec)
        } else {
            Err(StepError::failed("beforeStep hooks failed"))
        };

        if !self
            .policy
            .execute_hook(self.hooks, HookKind::AfterStep, &scenario.tags)
            && result.is_ok()
        {
            return Err(StepError::failed("afterStep hooks failed"));
        }

        result
    }
}
