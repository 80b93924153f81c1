//! The external services a sequence suspends on.
//!
//! The sequencing core has no clock or frame loop of its own; it consumes
//! three services from its host environment: a wait service (scaled and real
//! clocks), a tick-pulse source (two independent classes), and a named-event
//! subscription. [`LocalHost`] is the tokio-backed implementation; embedders
//! drive its ticks from their own loop or spawn interval tickers.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::HostConfig;
use crate::error::StepError;

/// Which pulse class a tick wait listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Rendering/update pulses.
    Frame,
    /// Fixed-step physics pulses.
    Physics,
}

/// Which clock a duration wait runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    /// The game clock, subject to the host's time scale.
    Scaled,
    /// Wall-clock time, unaffected by the time scale.
    Real,
}

/// Host services consumed by sequence steps.
///
/// Not thread-safe; implementations are driven from the same thread that
/// runs the sequences.
#[async_trait(?Send)]
pub trait SequenceHost {
    /// Resolve after `duration` elapses on the requested clock.
    async fn wait(&self, duration: Duration, clock: ClockKind);

    /// Resolve on the next pulse of the requested tick class.
    async fn next_tick(&self, kind: TickKind);

    /// Resolve the next time the named event fires on the given source.
    /// Fails fast if no such event is registered.
    async fn next_named_event(&self, source: &str, name: &str) -> Result<(), StepError>;
}

/// Tokio-backed [`SequenceHost`] for a single-threaded runtime.
///
/// Tick pulses are broadcast channels: a wait subscribes before awaiting, so
/// only pulses sent after the wait began count. Ticks can be driven manually
/// with [`tick`](LocalHost::tick) or from interval tasks via
/// [`spawn_ticker`](LocalHost::spawn_ticker).
pub struct LocalHost {
    time_scale: Cell<f64>,
    frame_rate_hz: f64,
    physics_rate_hz: f64,
    frame_tx: broadcast::Sender<()>,
    physics_tx: broadcast::Sender<()>,
    named: RefCell<HashMap<(String, String), broadcast::Sender<()>>>,
    channel_capacity: usize,
}

impl Default for LocalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalHost {
    pub fn new() -> Self {
        Self::from_config(&HostConfig::default())
    }

    pub fn from_config(config: &HostConfig) -> Self {
        let (frame_tx, _) = broadcast::channel(config.channel_capacity);
        let (physics_tx, _) = broadcast::channel(config.channel_capacity);
        Self {
            time_scale: Cell::new(config.time_scale),
            frame_rate_hz: config.frame_rate_hz,
            physics_rate_hz: config.physics_rate_hz,
            frame_tx,
            physics_tx,
            named: RefCell::new(HashMap::new()),
            channel_capacity: config.channel_capacity,
        }
    }

    /// Current multiplier on the scaled clock.
    pub fn time_scale(&self) -> f64 {
        self.time_scale.get()
    }

    /// Set the scaled-clock multiplier. Zero (or below) pauses the scaled
    /// clock: scaled waits started while paused never resolve.
    pub fn set_time_scale(&self, scale: f64) {
        self.time_scale.set(scale);
    }

    /// Send one pulse of the given tick class.
    pub fn tick(&self, kind: TickKind) {
        let _ = self.sender(kind).send(());
    }

    /// Spawn a task pulsing the given tick class at a fixed interval.
    pub fn spawn_ticker(&self, kind: TickKind, interval: Duration) -> tokio::task::JoinHandle<()> {
        let tx = self.sender(kind).clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // interval fires immediately; swallow that so pulses are
            // strictly periodic from now.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        })
    }

    /// Spawn frame and physics tickers at the configured rates.
    pub fn spawn_configured_tickers(
        &self,
    ) -> (tokio::task::JoinHandle<()>, tokio::task::JoinHandle<()>) {
        (
            self.spawn_ticker(TickKind::Frame, rate_interval(self.frame_rate_hz)),
            self.spawn_ticker(TickKind::Physics, rate_interval(self.physics_rate_hz)),
        )
    }

    /// Register a named event on a source so steps can wait for it.
    pub fn register_event(&self, source: &str, name: &str) {
        self.named
            .borrow_mut()
            .entry((source.to_string(), name.to_string()))
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0);
    }

    /// Fire a named event. Returns false if it was never registered.
    pub fn emit_named(&self, source: &str, name: &str) -> bool {
        let named = self.named.borrow();
        match named.get(&(source.to_string(), name.to_string())) {
            Some(tx) => {
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    fn sender(&self, kind: TickKind) -> &broadcast::Sender<()> {
        match kind {
            TickKind::Frame => &self.frame_tx,
            TickKind::Physics => &self.physics_tx,
        }
    }
}

/// Rates at or below zero fall back to one pulse per second rather than
/// panicking inside `Duration::from_secs_f64`.
fn rate_interval(rate_hz: f64) -> Duration {
    if rate_hz > 0.0 {
        Duration::from_secs_f64(1.0 / rate_hz)
    } else {
        Duration::from_secs(1)
    }
}

#[async_trait(?Send)]
impl SequenceHost for LocalHost {
    async fn wait(&self, duration: Duration, clock: ClockKind) {
        match clock {
            ClockKind::Real => tokio::time::sleep(duration).await,
            ClockKind::Scaled => {
                // Scale is sampled when the wait starts.
                let scale = self.time_scale.get();
                if scale > 0.0 {
                    tokio::time::sleep(duration.div_f64(scale)).await;
                } else {
                    debug!(target: "host", "scaled clock is paused; wait will not resolve");
                    std::future::pending::<()>().await;
                }
            }
        }
    }

    async fn next_tick(&self, kind: TickKind) {
        let mut rx = self.sender(kind).subscribe();
        let _ = rx.recv().await;
    }

    async fn next_named_event(&self, source: &str, name: &str) -> Result<(), StepError> {
        let mut rx = {
            let named = self.named.borrow();
            match named.get(&(source.to_string(), name.to_string())) {
                Some(tx) => tx.subscribe(),
                None => {
                    return Err(StepError::UnknownEvent {
                        source: source.to_string(),
                        name: name.to_string(),
                    })
                }
            }
        };
        let _ = rx.recv().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_named_reports_unknown_events() {
        let host = LocalHost::new();
        assert!(!host.emit_named("door", "opened"));
        host.register_event("door", "opened");
        // No subscribers yet; still counts as a known event.
        assert!(host.emit_named("door", "opened"));
    }

    #[tokio::test]
    async fn next_tick_sees_only_future_pulses() {
        let host = LocalHost::new();
        host.tick(TickKind::Frame); // nobody is listening yet

        let wait = host.next_tick(TickKind::Frame);
        tokio::pin!(wait);
        assert!(
            futures_poll_once(wait.as_mut()).await.is_none(),
            "pre-subscription pulse must not count"
        );

        host.tick(TickKind::Frame);
        wait.await;
    }

    #[tokio::test]
    async fn unknown_named_event_fails_fast() {
        let host = LocalHost::new();
        let result = host.next_named_event("door", "opened").await;
        assert!(matches!(result, Err(StepError::UnknownEvent { .. })));
    }

    /// Poll a future exactly once, returning its output if ready.
    async fn futures_poll_once<F: std::future::Future + Unpin>(future: F) -> Option<F::Output> {
        use std::task::Poll;
        let mut future = future;
        std::future::poll_fn(move |cx| match std::pin::Pin::new(&mut future).poll(cx) {
            Poll::Ready(output) => Poll::Ready(Some(output)),
            Poll::Pending => Poll::Ready(None),
        })
        .await
    }
}
