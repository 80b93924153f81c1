use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::error::StepError;
use crate::sequence::step::{Step, StepContext};
use crate::signal::{SignalArgs, WeakSignal};

use super::latch::Latch;

/// Waits for a [`Signal`](crate::Signal) to be emitted, whatever its arity.
///
/// Holds the signal weakly: if the signal was dropped before this step
/// executes, the step fails with [`StepError::SignalDropped`] rather than
/// waiting forever. The listener is removed again on resume and on reset.
pub(crate) struct WaitSignalStep<A: SignalArgs> {
    signal: WeakSignal<A>,
    callback: Rc<A::Callback>,
    slot: Rc<RefCell<Rc<Latch>>>,
}

impl<A: SignalArgs> WaitSignalStep<A> {
    pub(crate) fn new(signal: &crate::signal::Signal<A>) -> Self {
        let slot = Rc::new(RefCell::new(Rc::new(Latch::new())));
        let callback = A::ignoring({
            let slot = Rc::clone(&slot);
            move || slot.borrow().trip()
        });
        Self {
            signal: signal.downgrade(),
            callback,
            slot,
        }
    }
}

#[async_trait(?Send)]
impl<A: SignalArgs> Step for WaitSignalStep<A> {
    async fn execute(&mut self, _ctx: &StepContext) -> Result<(), StepError> {
        let signal = self.signal.upgrade().ok_or(StepError::SignalDropped)?;
        signal.add(Rc::clone(&self.callback));

        let latch = Rc::clone(&self.slot.borrow());
        latch.wait().await;

        // The signal may have been dropped while we were suspended.
        if let Some(signal) = self.signal.upgrade() {
            signal.remove(&self.callback);
        }
        Ok(())
    }

    fn reset(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.remove(&self.callback);
        }
        let old = self.slot.replace(Rc::new(Latch::new()));
        old.trip();
    }
}
