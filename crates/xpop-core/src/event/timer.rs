// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Timeouts and idle callbacks

use std::fmt;
use std::time::{Duration, Instant};

/// A timer handle
///
/// Returned by [`Timers::add_timeout`]; used to cancel the timeout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Timeout and idle callbacks of the host toolkit
///
/// A popup's modal loop calls [`Timers::service`] whenever input has been
/// idle for a while, so that timeouts registered here keep firing while the
/// popup blocks its caller.
#[derive(Default)]
pub struct Timers {
    next_handle: u64,
    // sorted in reverse order: the earliest timeout is last
    pending: Vec<(Instant, TimerHandle, Box<dyn FnMut()>)>,
    idle: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("pending", &self.pending.len())
            .field("idle", &self.idle.is_some())
            .finish()
    }
}

impl Timers {
    /// Construct, with no timeouts
    pub fn new() -> Self {
        Timers::default()
    }

    /// Schedule `f` to run once, `delay` from now
    pub fn add_timeout(&mut self, delay: Duration, f: impl FnMut() + 'static) -> TimerHandle {
        self.add_timeout_at(Instant::now() + delay, f)
    }

    /// Schedule `f` to run once at `time`
    pub fn add_timeout_at(&mut self, time: Instant, f: impl FnMut() + 'static) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        log::trace!(target: "xpop_core::event", "add_timeout_at: {handle:?}");
        self.pending.push((time, handle, Box::new(f)));
        self.pending.sort_by(|a, b| b.0.cmp(&a.0));
        handle
    }

    /// Cancel a timeout
    ///
    /// Returns `false` if the timeout already fired or was never added.
    pub fn remove_timeout(&mut self, handle: TimerHandle) -> bool {
        let len = self.pending.len();
        self.pending.retain(|row| row.1 != handle);
        self.pending.len() != len
    }

    /// Set (or with `None` clear) the idle callback
    ///
    /// This is called once per [`Self::service`].
    pub fn set_idle(&mut self, f: Option<Box<dyn FnMut()>>) {
        self.idle = f;
    }

    /// Time of the next pending timeout, if any
    pub fn next_resume(&self) -> Option<Instant> {
        self.pending.last().map(|row| row.0)
    }

    /// Number of pending timeouts
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if no timeout is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run all timeouts due at `now`, then the idle callback
    ///
    /// Returns the number of timeouts which fired.
    pub fn service(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(row) = self.pending.last() {
            if row.0 > now {
                break;
            }
            if let Some((_, handle, mut f)) = self.pending.pop() {
                log::trace!(target: "xpop_core::event", "service: fire {handle:?}");
                f();
                fired += 1;
            }
        }

        if let Some(idle) = self.idle.as_mut() {
            idle();
        }

        fired
    }
}
