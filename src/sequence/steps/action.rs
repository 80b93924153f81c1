use async_trait::async_trait;

use crate::error::StepError;
use crate::sequence::step::{Step, StepContext};

/// Invokes an action synchronously; never suspends.
pub(crate) struct ActionStep {
    action: Box<dyn FnMut()>,
}

impl ActionStep {
    pub(crate) fn new(action: impl FnMut() + 'static) -> Self {
        Self {
            action: Box::new(action),
        }
    }
}

#[async_trait(?Send)]
impl Step for ActionStep {
    async fn execute(&mut self, _ctx: &StepContext) -> Result<(), StepError> {
        (self.action)();
        Ok(())
    }
}
