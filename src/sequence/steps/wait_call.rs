use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::error::StepError;
use crate::sequence::step::{Step, StepContext};

use super::latch::Latch;

/// Waits until a trigger handle handed out at build time is invoked.
///
/// Triggering before the step executes resolves it immediately; the trigger
/// stays spent until the step is `reset`.
pub(crate) struct WaitCallStep {
    slot: Rc<RefCell<Rc<Latch>>>,
}

impl WaitCallStep {
    pub(crate) fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(Rc::new(Latch::new()))),
        }
    }

    pub(crate) fn trigger(&self) -> SequenceTrigger {
        SequenceTrigger {
            slot: Rc::clone(&self.slot),
        }
    }
}

#[async_trait(?Send)]
impl Step for WaitCallStep {
    async fn execute(&mut self, _ctx: &StepContext) -> Result<(), StepError> {
        let latch = Rc::clone(&self.slot.borrow());
        latch.wait().await;
        Ok(())
    }

    fn reset(&mut self) {
        // Release any in-flight wait, then arm a fresh latch. The trigger
        // handle reads through the slot, so it follows the swap.
        let old = self.slot.replace(Rc::new(Latch::new()));
        old.trip();
    }
}

/// External trigger for a `wait_for_call` step.
///
/// Cloneable; invoking any clone resolves the wait. Safe to call before the
/// sequence reaches the step.
#[derive(Clone)]
pub struct SequenceTrigger {
    slot: Rc<RefCell<Rc<Latch>>>,
}

impl SequenceTrigger {
    pub fn trigger(&self) {
        self.slot.borrow().trip();
    }
}
