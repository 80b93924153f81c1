use async_trait::async_trait;

use crate::error::StepError;
use crate::sequence::step::{Step, StepContext};

/// Waits for the next firing of a named event on a host source.
pub(crate) struct WaitEventStep {
    source: String,
    name: String,
}

impl WaitEventStep {
    pub(crate) fn new(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
        }
    }
}

#[async_trait(?Send)]
impl Step for WaitEventStep {
    async fn execute(&mut self, ctx: &StepContext) -> Result<(), StepError> {
        ctx.host.next_named_event(&self.source, &self.name).await
    }
}
