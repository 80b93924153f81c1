use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::StepError;
use crate::host::SequenceHost;

use super::SequenceCommand;

/// Steps are shared so a timeout decorator can keep driving an abandoned
/// step from its own task while the sequence moves on.
pub(crate) type SharedStep = Rc<RefCell<Box<dyn Step>>>;

/// Channel a step uses to raise control commands at the orchestrator.
pub(crate) type ControlSender = mpsc::UnboundedSender<SequenceCommand>;

/// Everything a step needs at execution time: the host services it suspends
/// on and the control channel back to the orchestrator.
#[derive(Clone)]
pub struct StepContext {
    pub host: Rc<dyn SequenceHost>,
    pub(crate) control: ControlSender,
}

impl StepContext {
    /// Raise a control command. Commands are applied by the orchestrator
    /// once the current step resolves.
    pub fn command(&self, command: SequenceCommand) {
        let _ = self.control.send(command);
    }
}

/// One schedulable, resumable unit of work inside a [`Sequence`](super::Sequence).
///
/// `execute` suspends the sequence until the step's condition resolves; it
/// never blocks the thread. `reset` clears internal progress (repeat
/// counters, latches) so the step can run again from its initial state;
/// it is invoked by repeat commands, not by a plain restart.
#[async_trait(?Send)]
pub trait Step {
    async fn execute(&mut self, ctx: &StepContext) -> Result<(), StepError>;

    fn reset(&mut self) {}
}
