use std::fmt;

/// Error raised while executing a sequence step.
///
/// A step that fails aborts the in-flight run; the orchestrator applies no
/// retry or recovery.
//
// Implemented by hand rather than via `thiserror` because `UnknownEvent`
// carries a `source: String` field, which the derive would treat as the
// `std::error::Error::source` cause.
#[derive(Debug)]
pub enum StepError {
    /// The signal this step waits on was dropped before the step executed.
    SignalDropped,

    /// No named event is registered on the host for this source/name pair.
    UnknownEvent { source: String, name: String },

    /// The step is still mutably held by a previous timed-out execution that
    /// was abandoned rather than cancelled.
    StillPending,

    /// The task driving a timed-out step failed (e.g. a panicking action).
    TaskFailed(String),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::SignalDropped => {
                write!(f, "the signal this step waits on was dropped before execution")
            }
            StepError::UnknownEvent { source, name } => {
                write!(f, "no event `{name}` is registered for source `{source}`")
            }
            StepError::StillPending => {
                write!(f, "step is still pending from a previous timed-out execution")
            }
            StepError::TaskFailed(msg) => write!(f, "step task failed: {msg}"),
        }
    }
}

impl std::error::Error for StepError {}
