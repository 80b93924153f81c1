use std::cell::RefCell;
use std::rc::Rc;

use super::args::SignalArgs;

/// A registered callback plus its dispatch state: priority and an optional
/// remaining-invocation count.
///
/// Entries are shared between the live listener list and any emission
/// snapshot, so expiring an entry mid-emission is visible to both.
pub(crate) struct Listener<A: SignalArgs> {
    /// The wrapped callback. `None` marks the entry for removal.
    pub(crate) callback: Option<Rc<dyn Fn(A)>>,
    /// Higher priorities are invoked first.
    pub(crate) priority: i32,
    /// If set, the entry expires when this reaches 0. `None` is unlimited.
    pub(crate) remaining: Option<u32>,
}

impl<A: SignalArgs> Listener<A> {
    pub(crate) fn new(callback: Rc<dyn Fn(A)>) -> Self {
        Self {
            callback: Some(callback),
            priority: 0,
            remaining: None,
        }
    }

    /// An expired entry is skipped by emission and purged afterwards.
    pub(crate) fn is_expired(&self) -> bool {
        self.callback.is_none() || self.remaining == Some(0)
    }
}

/// Live, fluent view of a single registration.
///
/// Returned by [`Signal::add`](super::Signal::add); shares the entry the
/// signal itself dispatches through, so there is no commit step: a chained
/// `with_priority`/`call_limit` is visible to the very next emission.
pub struct ListenerHandle<A: SignalArgs> {
    pub(crate) entry: Rc<RefCell<Listener<A>>>,
}

impl<A: SignalArgs> ListenerHandle<A> {
    /// Set the dispatch priority. Higher values are invoked first.
    pub fn with_priority(self, priority: i32) -> Self {
        self.entry.borrow_mut().priority = priority;
        self
    }

    /// Expire this listener after it has been invoked `times` times.
    pub fn call_limit(self, times: u32) -> Self {
        self.entry.borrow_mut().remaining = Some(times);
        self
    }

    /// Shorthand for `call_limit(1)`.
    pub fn once(self) -> Self {
        self.call_limit(1)
    }
}
