//! Run-mode strategies: live execution and dry-run resolution.
//!
//! A [`RunPolicy`] is selected once per run and injected into the engine.
//! [`LiveRun`] executes step and hook bodies for real, absorbing panics and
//! error values into outcomes. [`DryRun`] resolves everything but executes
//! nothing — it exists to validate that every step and hook reference
//! resolves without side effects, so hook bodies never run and hook failures
//! cannot occur.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::context::StepContext;
use crate::error::{StepError, StepResult};
use crate::model::{StepExec, TagSet};
use crate::registry::{HookKind, HookRegistry};

/// Strategy deciding whether matched bodies actually run.
pub trait RunPolicy {
    /// Invoke the matched step body. Must not unwind; every fault comes
    /// back as a value.
    fn execute_step(&self, ctx: &mut StepContext<'_>, exec: &StepExec) -> StepResult;

    /// Invoke every hook registered at `kind` whose filter accepts `tags`,
    /// in registration order. The first failing hook aborts the rest and
    /// the whole call reports `false`; an empty match set is success. This
    /// is a hard boundary: it never raises.
    fn execute_hook(&self, hooks: &HookRegistry, kind: HookKind, tags: &TagSet) -> bool;
}

/// Executes step and hook bodies for real.
#[derive(Debug, Default)]
pub struct LiveRun;

impl RunPolicy for LiveRun {
    fn execute_step(&self, ctx: &mut StepContext<'_>, exec: &StepExec) -> StepResult {
        match panic::catch_unwind(AssertUnwindSafe(|| (exec.body)(ctx))) {
            Ok(result) => result,
            Err(payload) => Err(StepError::failed(panic_message(payload.as_ref()))),
        }
    }

    fn execute_hook(&self, hooks: &HookRegistry, kind: HookKind, tags: &TagSet) -> bool {
        for hook in hooks.query(kind, tags) {
            match panic::catch_unwind(AssertUnwindSafe(|| hook.invoke())) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(hook = %kind, error = %err, "hook failed; aborting remaining hooks");
                    return false;
                }
                Err(payload) => {
                    warn!(
                        hook = %kind,
                        message = %panic_message(payload.as_ref()),
                        "hook panicked; aborting remaining hooks"
                    );
                    return false;
                }
            }
        }
        true
    }
}

/// Resolves everything, executes nothing.
#[derive(Debug, Default)]
pub struct DryRun;

impl RunPolicy for DryRun {
    fn execute_step(&self, _ctx: &mut StepContext<'_>, _exec: &StepExec) -> StepResult {
        Ok(())
    }

    fn execute_hook(&self, _hooks: &HookRegistry, _kind: HookKind, _tags: &TagSet) -> bool {
        true
    }
}

/// Extract a readable message from a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
