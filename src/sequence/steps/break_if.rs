use async_trait::async_trait;

use crate::error::StepError;
use crate::sequence::step::{Step, StepContext};
use crate::sequence::SequenceCommand;

/// Requests a break if the predicate holds; the remaining steps are then
/// never executed.
pub(crate) struct BreakIfStep {
    predicate: Box<dyn Fn() -> bool>,
}

impl BreakIfStep {
    pub(crate) fn new(predicate: impl Fn() -> bool + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

#[async_trait(?Send)]
impl Step for BreakIfStep {
    async fn execute(&mut self, ctx: &StepContext) -> Result<(), StepError> {
        if (self.predicate)() {
            ctx.command(SequenceCommand::Break);
        }
        Ok(())
    }
}
