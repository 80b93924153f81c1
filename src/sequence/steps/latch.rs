use std::cell::Cell;

use tokio::sync::Notify;

/// A one-shot completion gate.
///
/// Once tripped it stays resolved: a wait that starts after the trip returns
/// immediately. Steps that need a fresh gate swap in a new latch on `reset`
/// and trip the old one so any in-flight wait is released.
pub(crate) struct Latch {
    fired: Cell<bool>,
    notify: Notify,
}

impl Latch {
    pub(crate) fn new() -> Self {
        Self {
            fired: Cell::new(false),
            notify: Notify::new(),
        }
    }

    pub(crate) fn trip(&self) {
        self.fired.set(true);
        self.notify.notify_waiters();
    }

    pub(crate) async fn wait(&self) {
        while !self.fired.get() {
            self.notify.notified().await;
        }
    }
}
