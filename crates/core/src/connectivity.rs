// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network reachability tracking.
//!
//! The platform layer (or the background poller in this module) reports
//! observations through [`ConnectivityMonitor::report`]. The monitor keeps
//! the current state for lock-free point queries and broadcasts an event on
//! every transition, in both directions. Repeated reports of the same state
//! are absorbed.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of the transition channel per subscriber.
const EVENT_CAPACITY: usize = 16;

/// A reachability transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// Unreachable to reachable.
    Online,
    /// Reachable to unreachable.
    Offline,
}

impl ConnectivityEvent {
    fn from_reachable(reachable: bool) -> Self {
        if reachable {
            ConnectivityEvent::Online
        } else {
            ConnectivityEvent::Offline
        }
    }

    pub fn is_online(self) -> bool {
        self == ConnectivityEvent::Online
    }
}

/// Tracks reachability and notifies subscribers of transitions.
pub struct ConnectivityMonitor {
    reachable: AtomicBool,
    events: broadcast::Sender<ConnectivityEvent>,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the given initial reachability.
    pub fn new(reachable: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        ConnectivityMonitor { reachable: AtomicBool::new(reachable), events }
    }

    /// Point-in-time reachability.
    pub fn is_connected(&self) -> bool {
        self.reachable.load(Ordering::Acquire)
    }

    /// Records an observation. Returns true if it was a transition.
    pub fn report(&self, reachable: bool) -> bool {
        let previous = self.reachable.swap(reachable, Ordering::AcqRel);
        if previous == reachable {
            return false;
        }

        let event = ConnectivityEvent::from_reachable(reachable);
        tracing::info!(?event, "connectivity changed");
        // No subscribers is fine
        let _ = self.events.send(event);
        true
    }

    /// Subscribes to transitions. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> Subscription<'_> {
        Subscription { monitor: self, rx: self.events.subscribe() }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

/// A live subscription to connectivity transitions.
pub struct Subscription<'a> {
    monitor: &'a ConnectivityMonitor,
    rx: broadcast::Receiver<ConnectivityEvent>,
}

impl Subscription<'_> {
    /// Waits for the next transition.
    ///
    /// If this subscriber fell behind, the missed events are collapsed into
    /// one event describing the current state.
    pub async fn next(&mut self) -> Option<ConnectivityEvent> {
        match self.rx.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "connectivity subscriber lagged");
                Some(ConnectivityEvent::from_reachable(self.monitor.is_connected()))
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

/// Probes whether the remote service can currently be reached.
pub trait ReachabilityProbe: Send + Sync {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Spawns a task that probes at `interval` and reports into `monitor`.
///
/// The task stops when `cancel` is triggered.
pub fn spawn_poller<P>(
    monitor: Arc<ConnectivityMonitor>,
    probe: P,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    P: ReachabilityProbe + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("connectivity poller cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let reachable = probe.probe().await;
                    monitor.report(reachable);
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
