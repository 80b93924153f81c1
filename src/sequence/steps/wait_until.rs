use async_trait::async_trait;

use crate::error::StepError;
use crate::host::TickKind;
use crate::sequence::step::{Step, StepContext};

/// Polls a predicate once per frame tick until it returns true.
///
/// Closures capture by value: a predicate over a copied value is frozen in
/// time. Read through a shared handle (`Rc<Cell<_>>`, a getter) instead.
pub(crate) struct WaitUntilStep {
    predicate: Box<dyn Fn() -> bool>,
}

impl WaitUntilStep {
    pub(crate) fn new(predicate: impl Fn() -> bool + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

#[async_trait(?Send)]
impl Step for WaitUntilStep {
    async fn execute(&mut self, ctx: &StepContext) -> Result<(), StepError> {
        while !(self.predicate)() {
            ctx.host.next_tick(TickKind::Frame).await;
        }
        Ok(())
    }
}
