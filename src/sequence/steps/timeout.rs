use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::StepError;
use crate::sequence::step::{SharedStep, Step, StepContext};

/// Races the wrapped step against a timer.
///
/// A step that loses the race is NOT cancelled: it is abandoned in its own
/// task, and any side effects it eventually produces still occur
/// asynchronously. Safe with passive waits; be wary of wrapping steps with
/// side effects.
pub(crate) struct TimeoutStep {
    inner: SharedStep,
    timeout: Duration,
}

impl TimeoutStep {
    pub(crate) fn new(inner: SharedStep, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait(?Send)]
impl Step for TimeoutStep {
    async fn execute(&mut self, ctx: &StepContext) -> Result<(), StepError> {
        let step = Rc::clone(&self.inner);
        let ctx = ctx.clone();
        let task = tokio::task::spawn_local(async move {
            // A previous timed-out run may still hold the step.
            let mut step = step.try_borrow_mut().map_err(|_| StepError::StillPending)?;
            step.execute(&ctx).await
        });

        tokio::select! {
            joined = task => match joined {
                Ok(result) => result,
                Err(e) => Err(StepError::TaskFailed(e.to_string())),
            },
            _ = tokio::time::sleep(self.timeout) => {
                debug!(
                    target: "sequence",
                    "step timed out after {:?}; the step itself keeps running",
                    self.timeout
                );
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        match self.inner.try_borrow_mut() {
            Ok(mut step) => step.reset(),
            Err(_) => {
                warn!(
                    target: "sequence",
                    "skipping reset of a step still pending from a timed-out run"
                );
            }
        }
    }
}
