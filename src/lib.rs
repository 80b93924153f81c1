//! Typed signals and cooperative step sequences.
//!
//! Two coupled primitives for scripting time-extended, event-driven behavior
//! without blocking the caller:
//!
//! - [`Signal`]: a type-safe publish/subscribe bus with per-listener priority
//!   and limited-trigger expiry, generic over callback arity.
//! - [`Sequence`]: an ordered chain of suspendable steps (waits, actions,
//!   repeats, breaks) driven cooperatively on a single-threaded tokio runtime.
//!
//! Neither is thread-safe; both assume a current-thread runtime and a
//! `tokio::task::LocalSet` (sequences run as `spawn_local` tasks).

pub mod config;
pub mod error;
pub mod host;
pub mod sequence;
pub mod signal;

pub use config::HostConfig;
pub use error::StepError;
pub use host::{ClockKind, LocalHost, SequenceHost, TickKind};
pub use sequence::{Sequence, SequenceCommand, SequenceTrigger, Step, StepContext};
pub use signal::{ListenerHandle, Signal, SignalArgs, WeakSignal};
