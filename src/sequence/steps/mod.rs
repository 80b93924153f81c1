//! The step variants a sequence is built from, one file per variant.

mod action;
mod break_if;
mod latch;
mod repeat;
mod timeout;
mod wait;
mod wait_call;
mod wait_event;
mod wait_signal;
mod wait_ticks;
mod wait_until;

pub(crate) use action::ActionStep;
pub(crate) use break_if::BreakIfStep;
pub(crate) use repeat::RepeatStep;
pub(crate) use timeout::TimeoutStep;
pub(crate) use wait::WaitStep;
pub(crate) use wait_call::WaitCallStep;
pub use wait_call::SequenceTrigger;
pub(crate) use wait_event::WaitEventStep;
pub(crate) use wait_signal::WaitSignalStep;
pub(crate) use wait_ticks::WaitTicksStep;
pub(crate) use wait_until::WaitUntilStep;
