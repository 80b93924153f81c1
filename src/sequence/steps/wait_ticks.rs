use async_trait::async_trait;

use crate::error::StepError;
use crate::host::TickKind;
use crate::sequence::step::{Step, StepContext};

/// Waits for a number of pulses of one tick class.
pub(crate) struct WaitTicksStep {
    count: u32,
    kind: TickKind,
}

impl WaitTicksStep {
    pub(crate) fn new(count: u32, kind: TickKind) -> Self {
        Self { count, kind }
    }
}

#[async_trait(?Send)]
impl Step for WaitTicksStep {
    async fn execute(&mut self, ctx: &StepContext) -> Result<(), StepError> {
        for _ in 0..self.count {
            ctx.host.next_tick(self.kind).await;
        }
        Ok(())
    }
}
