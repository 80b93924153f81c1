use std::time::Duration;

use async_trait::async_trait;

use crate::error::StepError;
use crate::host::ClockKind;
use crate::sequence::step::{Step, StepContext};

/// Passive delay on the host's wait service.
pub(crate) struct WaitStep {
    duration: Duration,
    clock: ClockKind,
}

impl WaitStep {
    pub(crate) fn new(duration: Duration, clock: ClockKind) -> Self {
        Self { duration, clock }
    }
}

#[async_trait(?Send)]
impl Step for WaitStep {
    async fn execute(&mut self, ctx: &StepContext) -> Result<(), StepError> {
        ctx.host.wait(self.duration, self.clock).await;
        Ok(())
    }
}
