//! Type-safe publish/subscribe signals.
//!
//! A [`Signal`] manages an ordered set of listeners for one event of a given
//! argument arity. Listeners carry a priority and an optional invocation
//! limit, configured fluently on the handle returned by [`Signal::add`]:
//!
//! ```no_run
//! # use std::rc::Rc;
//! # use sequin::Signal;
//! let on_hit: Signal<(u32, String)> = Signal::new();
//! let log: Rc<dyn Fn(u32, String)> = Rc::new(|damage, source| {
//!     println!("{damage} from {source}");
//! });
//! on_hit.add(log.clone()).with_priority(1).call_limit(2);
//! on_hit.emit(12, "goblin".to_string());
//! on_hit.remove(&log);
//! ```
//!
//! Signals are cheap to clone (clones share one listener list) and are not
//! thread-safe: all operations assume a single-threaded caller.

mod args;
mod listener;

pub use args::SignalArgs;
pub use listener::ListenerHandle;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use listener::Listener;

/// Keeps the exposed callback alive alongside its wrapped form so the
/// pointer key stays valid for as long as the registration exists.
struct WrapEntry<A: SignalArgs> {
    #[allow(dead_code)]
    exposed: Rc<A::Callback>,
    wrapped: Rc<dyn Fn(A)>,
}

struct SignalInner<A: SignalArgs> {
    listeners: Vec<Rc<RefCell<Listener<A>>>>,
    /// Keyed by the identity of the caller-supplied callback, so the same
    /// callback re-added later resolves to the same wrapped form and
    /// `remove` can find every registration made with it.
    wrapped: HashMap<*const (), WrapEntry<A>>,
}

/// A publish/subscribe signal generic over its argument tuple.
///
/// `A` is the payload tuple: `()`, `(T1,)`, `(T1, T2)`, up to four elements.
/// Callbacks are identified by `Rc` pointer identity; keep a clone of the
/// `Rc` you registered if you intend to call [`remove`](Signal::remove).
pub struct Signal<A: SignalArgs> {
    inner: Rc<RefCell<SignalInner<A>>>,
}

impl<A: SignalArgs> Clone for Signal<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: SignalArgs> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: SignalArgs> Signal<A> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SignalInner {
                listeners: Vec::new(),
                wrapped: HashMap::new(),
            })),
        }
    }

    fn key(callback: &Rc<A::Callback>) -> *const () {
        Rc::as_ptr(callback) as *const ()
    }

    /// Register a callback and return a live handle for fluent configuration.
    ///
    /// The handle shares the entry the signal dispatches through; chained
    /// `with_priority`/`call_limit`/`once` calls are visible to the very next
    /// emission. Registering the same callback several times is legal and
    /// each registration is configured independently.
    pub fn add(&self, callback: Rc<A::Callback>) -> ListenerHandle<A> {
        let wrapped = self.get_or_wrap(callback);
        let entry = Rc::new(RefCell::new(Listener::new(wrapped)));
        self.inner.borrow_mut().listeners.push(Rc::clone(&entry));
        ListenerHandle { entry }
    }

    /// Register a callback to fire exactly once.
    pub fn add_once(&self, callback: Rc<A::Callback>) -> ListenerHandle<A> {
        self.add(callback).once()
    }

    /// Register a callback to fire at most `times` times.
    pub fn add_limited(&self, callback: Rc<A::Callback>, times: u32) -> ListenerHandle<A> {
        self.add(callback).call_limit(times)
    }

    /// Remove every registration made with this callback. No-op if absent.
    pub fn remove(&self, callback: &Rc<A::Callback>) {
        let mut inner = self.inner.borrow_mut();
        if let Some(entry) = inner.wrapped.remove(&Self::key(callback)) {
            inner.listeners.retain(|listener| {
                !listener
                    .borrow()
                    .callback
                    .as_ref()
                    .is_some_and(|cb| Rc::ptr_eq(cb, &entry.wrapped))
            });
        }
    }

    /// Whether this callback currently has at least one registration.
    pub fn contains(&self, callback: &Rc<A::Callback>) -> bool {
        self.inner.borrow().wrapped.contains_key(&Self::key(callback))
    }

    /// Drop all listeners and the callback identity map.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.listeners.clear();
        inner.wrapped.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().listeners.is_empty()
    }

    /// Downgrade to a weak handle that does not keep the signal alive.
    pub fn downgrade(&self) -> WeakSignal<A> {
        WeakSignal(Rc::downgrade(&self.inner))
    }

    /// Emit with the payload tuple. Arity-specific `emit(a1, a2, ...)`
    /// methods forward here.
    ///
    /// Dispatch iterates a snapshot of the listener list sorted stably by
    /// priority (highest first): listeners added during the emission do not
    /// run this pass, and removals requested during it take effect on the
    /// next one. Invocation limits are decremented on the shared entries, so
    /// an entry exhausted mid-pass is already expired for the live list;
    /// expired entries are purged once the pass completes.
    pub fn emit_payload(&self, args: A) {
        let mut snapshot = self.inner.borrow().listeners.clone();
        snapshot.sort_by(|a, b| b.borrow().priority.cmp(&a.borrow().priority));

        for entry in &snapshot {
            let callback = {
                let listener = entry.borrow();
                if listener.is_expired() {
                    continue;
                }
                listener.callback.clone()
            };
            // Invoke with no borrow held so the callback may freely add,
            // remove or clear through its own clone of the signal.
            if let Some(callback) = callback {
                callback(args.clone());
            }
            let mut listener = entry.borrow_mut();
            if let Some(remaining) = listener.remaining {
                let remaining = remaining.saturating_sub(1);
                listener.remaining = Some(remaining);
                if remaining == 0 {
                    listener.callback = None;
                }
            }
        }

        self.inner
            .borrow_mut()
            .listeners
            .retain(|listener| !listener.borrow().is_expired());
    }

    fn get_or_wrap(&self, callback: Rc<A::Callback>) -> Rc<dyn Fn(A)> {
        let mut inner = self.inner.borrow_mut();
        let entry = inner
            .wrapped
            .entry(Self::key(&callback))
            .or_insert_with(|| WrapEntry {
                wrapped: A::wrap(Rc::clone(&callback)),
                exposed: callback,
            });
        Rc::clone(&entry.wrapped)
    }
}

/// Weak handle to a [`Signal`], used by wait-for-signal steps so a bus that
/// was dropped before execution is detected instead of waited on forever.
pub struct WeakSignal<A: SignalArgs>(Weak<RefCell<SignalInner<A>>>);

impl<A: SignalArgs> Clone for WeakSignal<A> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}

impl<A: SignalArgs> WeakSignal<A> {
    pub fn upgrade(&self) -> Option<Signal<A>> {
        self.0.upgrade().map(|inner| Signal { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) + Clone) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let push = {
            let log = Rc::clone(&log);
            move |entry: &str| log.borrow_mut().push(entry.to_string())
        };
        (log, push)
    }

    #[test]
    fn priorities_limits_and_removal() {
        let signal: Signal<(i32, String)> = Signal::new();
        let (log, push) = recorder();

        let normal: Rc<dyn Fn(i32, String)> = {
            let push = push.clone();
            Rc::new(move |i, s| push(&format!("N:{i}:{s}")))
        };
        let once: Rc<dyn Fn(i32, String)> = {
            let push = push.clone();
            Rc::new(move |i, s| push(&format!("O:{i}:{s}")))
        };
        let limited: Rc<dyn Fn(i32, String)> = {
            let push = push.clone();
            Rc::new(move |i, s| push(&format!("L:{i}:{s}")))
        };
        let to_remove: Rc<dyn Fn(i32, String)> = Rc::new(move |_, _| push("FAIL"));

        signal.add(normal).with_priority(1);
        signal.add(once).once();
        signal.add(limited).call_limit(2);
        signal.add(to_remove.clone());
        signal.remove(&to_remove);

        signal.emit(1, "a".to_string());
        signal.emit(2, "b".to_string());
        signal.clear();
        signal.emit(3, "c".to_string());

        let expected = vec!["N:1:a", "O:1:a", "L:1:a", "N:2:b", "L:2:b"];
        assert_eq!(*log.borrow(), expected);
        assert_eq!(signal.len(), 0);
    }

    #[test]
    fn equal_priorities_keep_insertion_order() {
        let signal: Signal<()> = Signal::new();
        let (log, push) = recorder();

        for name in ["first", "second", "third"] {
            let push = push.clone();
            let cb: Rc<dyn Fn()> = Rc::new(move || push(name));
            signal.add(cb);
        }
        signal.emit();

        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn remove_kills_every_registration_of_one_callback() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0u32));
        let cb: Rc<dyn Fn()> = {
            let hits = Rc::clone(&hits);
            Rc::new(move || hits.set(hits.get() + 1))
        };

        signal.add(cb.clone()).with_priority(5);
        signal.add(cb.clone());
        assert_eq!(signal.len(), 2);
        assert!(signal.contains(&cb));

        signal.remove(&cb);
        assert_eq!(signal.len(), 0);
        assert!(!signal.contains(&cb));

        signal.emit();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn listener_added_during_emit_waits_for_next_pass() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0u32));

        let late: Rc<dyn Fn()> = {
            let hits = Rc::clone(&hits);
            Rc::new(move || hits.set(hits.get() + 1))
        };
        let adder: Rc<dyn Fn()> = {
            let signal = signal.clone();
            let late = late.clone();
            Rc::new(move || {
                signal.add_once(late.clone());
            })
        };
        signal.add(adder);

        signal.emit();
        assert_eq!(hits.get(), 0, "snapshot was taken before the add");
        assert_eq!(signal.len(), 2);

        signal.emit();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn removal_during_emit_does_not_stop_current_pass() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0u32));

        let victim: Rc<dyn Fn()> = {
            let hits = Rc::clone(&hits);
            Rc::new(move || hits.set(hits.get() + 1))
        };
        let remover: Rc<dyn Fn()> = {
            let signal = signal.clone();
            let victim = victim.clone();
            Rc::new(move || signal.remove(&victim))
        };

        signal.add(remover).with_priority(1);
        signal.add(victim);

        signal.emit();
        assert_eq!(hits.get(), 1, "victim was in the snapshot");

        signal.emit();
        assert_eq!(hits.get(), 1, "removal applies from the next pass");
    }

    #[test]
    fn call_limit_counts_across_emissions() {
        let signal: Signal<(u8,)> = Signal::new();
        let hits = Rc::new(Cell::new(0u32));
        let cb: Rc<dyn Fn(u8)> = {
            let hits = Rc::clone(&hits);
            Rc::new(move |_| hits.set(hits.get() + 1))
        };

        signal.add(cb).call_limit(3);
        for i in 0..5 {
            signal.emit(i);
        }
        assert_eq!(hits.get(), 3);
        assert_eq!(signal.len(), 0);
    }

    #[test]
    fn handle_mutation_is_visible_before_next_emission() {
        let signal: Signal<()> = Signal::new();
        let (log, push) = recorder();

        let low: Rc<dyn Fn()> = {
            let push = push.clone();
            Rc::new(move || push("low"))
        };
        let high: Rc<dyn Fn()> = Rc::new(move || push("high"));

        signal.add(low);
        let handle = signal.add(high);
        handle.with_priority(10);

        signal.emit();
        assert_eq!(*log.borrow(), vec!["high", "low"]);
    }

    #[test]
    fn four_argument_arity_round_trips() {
        let signal: Signal<(u8, u16, u32, u64)> = Signal::new();
        let seen = Rc::new(Cell::new(0u64));
        let cb: Rc<dyn Fn(u8, u16, u32, u64)> = {
            let seen = Rc::clone(&seen);
            Rc::new(move |a, b, c, d| seen.set(a as u64 + b as u64 + c as u64 + d))
        };
        signal.add(cb);
        signal.emit(1, 2, 3, 4);
        assert_eq!(seen.get(), 10);
    }

    #[test]
    fn weak_signal_upgrades_while_alive() {
        let signal: Signal<()> = Signal::new();
        let weak = signal.downgrade();
        assert!(weak.upgrade().is_some());
        drop(signal);
        assert!(weak.upgrade().is_none());
    }
}
