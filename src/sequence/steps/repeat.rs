use async_trait::async_trait;

use crate::error::StepError;
use crate::sequence::step::{Step, StepContext};
use crate::sequence::SequenceCommand;

/// Raises a repeat command a fixed number of times.
///
/// The counter persists across passes of the sequence: once exhausted, the
/// step stays inert until `reset`. A plain restart of a completed sequence
/// does not replay its repeats.
pub(crate) struct RepeatStep {
    command: SequenceCommand,
    times: u32,
    done: u32,
}

impl RepeatStep {
    pub(crate) fn previous(times: u32) -> Self {
        Self {
            command: SequenceCommand::RepeatPrevious,
            times,
            done: 0,
        }
    }

    pub(crate) fn from_beginning(times: u32) -> Self {
        Self {
            command: SequenceCommand::RepeatFromBeginning,
            times,
            done: 0,
        }
    }
}

#[async_trait(?Send)]
impl Step for RepeatStep {
    async fn execute(&mut self, ctx: &StepContext) -> Result<(), StepError> {
        if self.done < self.times {
            ctx.command(self.command);
            self.done += 1;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.done = 0;
    }
}
