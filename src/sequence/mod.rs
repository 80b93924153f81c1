//! Cooperative step sequencing.
//!
//! A [`Sequence`] chains waits and actions into an ordered, resumable
//! workflow and runs it without blocking the caller:
//!
//! ```no_run
//! # use std::{rc::Rc, time::Duration};
//! # use sequin::{LocalHost, Sequence};
//! # let host = Rc::new(LocalHost::new());
//! Sequence::new(host)
//!     .wait_frames(3)
//!     .then(|| println!("three frames later"))
//!     .wait(Duration::from_secs(1))
//!     .then(|| println!("and a second after that"))
//!     .start();
//! ```
//!
//! `start()` is fire-and-forget: it spawns the run as a local task and
//! returns immediately. Steps execute strictly one at a time; a step
//! suspends the sequence's forward progress but never the thread. Sequences
//! are single-threaded by design and must run inside a
//! `tokio::task::LocalSet`.

pub(crate) mod step;
mod steps;

pub use step::{Step, StepContext};
pub use steps::SequenceTrigger;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::host::{ClockKind, SequenceHost, TickKind};
use crate::signal::{Signal, SignalArgs};

use step::SharedStep;
use steps::{
    ActionStep, BreakIfStep, RepeatStep, TimeoutStep, WaitCallStep, WaitEventStep, WaitSignalStep,
    WaitStep, WaitTicksStep, WaitUntilStep,
};

/// Control command a step raises to redirect the orchestrator's cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceCommand {
    /// Go back to the start of the sequence.
    RepeatFromBeginning,
    /// Repeat the step before this one.
    RepeatPrevious,
    /// Stop; remaining steps are never executed.
    Break,
}

struct SequenceInner {
    steps: Vec<SharedStep>,
    /// Signed so repeat-from-beginning can park one before the first step.
    cursor: i64,
    running: bool,
    break_requested: bool,
}

/// An ordered, cooperatively-executed chain of steps.
///
/// Built fluently, started fire-and-forget, reusable: a completed sequence
/// can be `start()`ed again. Note that repeat counters are not reset by a
/// restart; only a repeat command resets the steps it replays.
pub struct Sequence {
    host: Rc<dyn SequenceHost>,
    inner: Rc<RefCell<SequenceInner>>,
}

impl Sequence {
    pub fn new(host: Rc<dyn SequenceHost>) -> Self {
        Self {
            host,
            inner: Rc::new(RefCell::new(SequenceInner {
                steps: Vec::new(),
                cursor: 0,
                running: false,
                break_requested: false,
            })),
        }
    }

    // -------------------------------------
    // Shortcuts
    // -------------------------------------

    /// Invoke an action after a duration on the scaled clock.
    pub fn do_after(host: Rc<dyn SequenceHost>, duration: Duration, action: impl FnMut() + 'static) {
        Sequence::new(host).wait(duration).then(action).start();
    }

    /// Invoke an action after a number of frame ticks.
    pub fn do_after_frames(host: Rc<dyn SequenceHost>, frames: u32, action: impl FnMut() + 'static) {
        Sequence::new(host).wait_frames(frames).then(action).start();
    }

    /// Invoke an action once a predicate returns true.
    pub fn do_after_condition(
        host: Rc<dyn SequenceHost>,
        predicate: impl Fn() -> bool + 'static,
        action: impl FnMut() + 'static,
    ) {
        Sequence::new(host).wait_until(predicate).then(action).start();
    }

    // -------------------------------------
    // Builder
    // -------------------------------------

    fn push(&self, step: impl Step + 'static) -> &Self {
        let step: Box<dyn Step> = Box::new(step);
        self.inner
            .borrow_mut()
            .steps
            .push(Rc::new(RefCell::new(step)));
        self
    }

    /// Append a custom step.
    pub fn add_step(&self, step: impl Step + 'static) -> &Self {
        self.push(step)
    }

    /// Pause for a duration on the scaled ("game") clock.
    pub fn wait(&self, duration: Duration) -> &Self {
        self.push(WaitStep::new(duration, ClockKind::Scaled))
    }

    /// Pause for a duration in real time, unaffected by the time scale.
    pub fn wait_real(&self, duration: Duration) -> &Self {
        self.push(WaitStep::new(duration, ClockKind::Real))
    }

    /// Pause for a number of frame ticks.
    pub fn wait_frames(&self, frames: u32) -> &Self {
        self.push(WaitTicksStep::new(frames, TickKind::Frame))
    }

    /// Pause for a number of physics ticks.
    pub fn wait_physics_frames(&self, frames: u32) -> &Self {
        self.push(WaitTicksStep::new(frames, TickKind::Physics))
    }

    /// Wait until a predicate returns true, re-checked once per frame tick.
    pub fn wait_until(&self, predicate: impl Fn() -> bool + 'static) -> &Self {
        self.push(WaitUntilStep::new(predicate))
    }

    /// Wait until the returned trigger is invoked.
    ///
    /// The trigger is handed out at build time so the caller can fire it
    /// from anywhere; triggering before the sequence reaches this step
    /// resolves the step immediately.
    pub fn wait_for_call(&self) -> SequenceTrigger {
        let step = WaitCallStep::new();
        let trigger = step.trigger();
        self.push(step);
        trigger
    }

    /// Wait for a signal of any arity to be emitted.
    ///
    /// The signal is held weakly: if it has been dropped by the time this
    /// step executes, the run aborts with
    /// [`StepError::SignalDropped`](crate::StepError::SignalDropped) instead
    /// of waiting forever.
    pub fn wait_for_signal<A: SignalArgs>(&self, signal: &Signal<A>) -> &Self {
        self.push(WaitSignalStep::new(signal))
    }

    /// Wait for the next firing of a named host event.
    pub fn wait_for_event(&self, source: impl Into<String>, name: impl Into<String>) -> &Self {
        self.push(WaitEventStep::new(source, name))
    }

    /// Execute an action.
    pub fn then(&self, action: impl FnMut() + 'static) -> &Self {
        self.push(ActionStep::new(action))
    }

    /// Break the sequence if the predicate returns true.
    pub fn break_if(&self, predicate: impl Fn() -> bool + 'static) -> &Self {
        self.push(BreakIfStep::new(predicate))
    }

    /// Repeat the entire sequence up to this point, `times` times.
    pub fn repeat_sequence(&self, times: u32) -> &Self {
        self.push(RepeatStep::from_beginning(times))
    }

    /// Repeat the previous step `times` times.
    pub fn repeat_previous(&self, times: u32) -> &Self {
        self.push(RepeatStep::previous(times))
    }

    /// Wrap the most recently appended step in a timeout.
    ///
    /// The wrapped step is not cancelled when the timeout wins the race; it
    /// is abandoned in place and its side effects may still land later.
    /// No-op on an empty sequence.
    pub fn timeout(&self, duration: Duration) -> &Self {
        let mut inner = self.inner.borrow_mut();
        match inner.steps.pop() {
            Some(last) => {
                let wrapped: Box<dyn Step> = Box::new(TimeoutStep::new(last, duration));
                inner.steps.push(Rc::new(RefCell::new(wrapped)));
            }
            None => warn!(target: "sequence", "cannot set a timeout on an empty sequence"),
        }
        self
    }

    /// Remove all steps.
    pub fn clear(&self) -> &Self {
        self.inner.borrow_mut().steps.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().steps.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    // -------------------------------------
    // Orchestration
    // -------------------------------------

    /// Start executing the sequence, one step at a time.
    ///
    /// Fire-and-forget: the run is spawned as a local task and this returns
    /// immediately. Restarting a completed sequence begins again from the
    /// first step. A sequence that is already running ignores the call;
    /// only one run per instance is ever in flight.
    ///
    /// Must be called from within a `tokio::task::LocalSet`.
    pub fn start(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.running {
                warn!(target: "sequence", "sequence is already running; ignoring start");
                return;
            }
            inner.running = true;
            inner.cursor = 0;
            inner.break_requested = false;
        }
        let host = Rc::clone(&self.host);
        let inner = Rc::clone(&self.inner);
        tokio::task::spawn_local(Self::run(host, inner));
    }

    async fn run(host: Rc<dyn SequenceHost>, inner: Rc<RefCell<SequenceInner>>) {
        let (control, mut commands) = mpsc::unbounded_channel();
        let ctx = StepContext { host, control };

        loop {
            let step = {
                let state = inner.borrow();
                if state.cursor < 0 || state.cursor as usize >= state.steps.len() {
                    None
                } else {
                    Some(Rc::clone(&state.steps[state.cursor as usize]))
                }
            };
            let Some(step) = step else { break };

            let result = {
                let mut step = step.borrow_mut();
                step.execute(&ctx).await
            };
            if let Err(e) = result {
                error!(target: "sequence", "step failed, aborting sequence: {e}");
                break;
            }

            // Commands raised during the step apply at this boundary.
            while let Ok(command) = commands.try_recv() {
                Self::handle_command(&inner, command);
            }

            let mut state = inner.borrow_mut();
            if state.break_requested {
                break;
            }
            state.cursor += 1;
        }

        inner.borrow_mut().running = false;
    }

    fn handle_command(inner: &Rc<RefCell<SequenceInner>>, command: SequenceCommand) {
        match command {
            SequenceCommand::Break => {
                inner.borrow_mut().break_requested = true;
            }
            SequenceCommand::RepeatPrevious => {
                let previous = {
                    let mut state = inner.borrow_mut();
                    if state.cursor >= 1 {
                        let step = Rc::clone(&state.steps[(state.cursor - 1) as usize]);
                        // Rewind by two; the loop's increment lands back on
                        // the just-reset step.
                        state.cursor -= 2;
                        Some(step)
                    } else {
                        None
                    }
                };
                match previous {
                    Some(step) => step.borrow_mut().reset(),
                    None => warn!(
                        target: "sequence",
                        "repeat-previous raised at the first step; nothing to repeat"
                    ),
                }
            }
            SequenceCommand::RepeatFromBeginning => {
                let preceding: Vec<SharedStep> = {
                    let state = inner.borrow();
                    let end = state.cursor.max(0) as usize;
                    state.steps[..end].to_vec()
                };
                for step in preceding {
                    step.borrow_mut().reset();
                }
                // Park before the first step; the loop's increment moves to 0.
                inner.borrow_mut().cursor = -1;
                debug!(target: "sequence", "repeating sequence from the beginning");
            }
        }
    }
}
