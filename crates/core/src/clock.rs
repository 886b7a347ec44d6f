// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Monotonic timestamps for ordering pending operations.
//!
//! A [`Stamp`] is wall clock milliseconds plus a logical counter. The counter
//! only moves when the wall clock stalls or runs backwards, so stamps handed
//! out by one [`OpClock`] are strictly increasing.
//!
//! Format: `{wall_ms}-{counter}`

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// A creation timestamp for a pending operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stamp {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Logical counter for ordering events at the same wall time.
    pub counter: u32,
}

impl Stamp {
    pub fn new(wall_ms: u64, counter: u32) -> Self {
        Stamp { wall_ms, counter }
    }

    /// The earliest possible stamp.
    pub fn min() -> Self {
        Stamp { wall_ms: 0, counter: 0 }
    }
}

impl Ord for Stamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wall_ms
            .cmp(&other.wall_ms)
            .then_with(|| self.counter.cmp(&other.counter))
    }
}

impl PartialOrd for Stamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wall_ms, self.counter)
    }
}

/// Source of wall clock time, injectable for tests.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl<C: ClockSource + ?Sized> ClockSource for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Generator of strictly increasing [`Stamp`]s.
pub struct OpClock {
    source: Box<dyn ClockSource>,
    last: Mutex<Stamp>,
}

impl OpClock {
    /// Creates a clock backed by the system clock.
    pub fn system() -> Self {
        Self::with_source(SystemClock)
    }

    /// Creates a clock with a custom time source.
    pub fn with_source(source: impl ClockSource + 'static) -> Self {
        OpClock { source: Box::new(source), last: Mutex::new(Stamp::min()) }
    }

    /// Returns the current wall time of the underlying source.
    pub fn now_ms(&self) -> u64 {
        self.source.now_ms()
    }

    /// Generates a new stamp greater than every stamp issued or observed so far.
    pub fn now(&self) -> Stamp {
        let physical = self.source.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let next = if physical > last.wall_ms {
            Stamp::new(physical, 0)
        } else {
            // Wall clock stalled or went backwards
            Stamp::new(last.wall_ms, last.counter + 1)
        };
        *last = next;
        next
    }

    /// Advances the clock so that later stamps sort after `seen`.
    ///
    /// Used when reopening a persisted queue whose newest entry may be ahead
    /// of the current wall clock.
    pub fn observe(&self, seen: Stamp) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if seen > *last {
            *last = seen;
        }
    }
}

impl Default for OpClock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for OpClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("OpClock").field("last", &*last).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
