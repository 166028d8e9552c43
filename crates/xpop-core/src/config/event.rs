// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Event loop configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Modal loop configuration
///
/// This is serializable (using `feature = "serde"`) with the following fields:
///
/// > `idle_poll_count`: `u32` (empty polls before an idle tick) \
/// > `idle_wait_ms`: `u32` (milliseconds) \
/// > `shift_interval_ms`: `u32` (milliseconds)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventConfig {
    #[cfg_attr(feature = "serde", serde(default = "defaults::idle_poll_count"))]
    pub idle_poll_count: u32,

    #[cfg_attr(feature = "serde", serde(default = "defaults::idle_wait_ms"))]
    pub idle_wait_ms: u32,

    #[cfg_attr(feature = "serde", serde(default = "defaults::shift_interval_ms"))]
    pub shift_interval_ms: u32,
}

impl Default for EventConfig {
    fn default() -> Self {
        EventConfig {
            idle_poll_count: defaults::idle_poll_count(),
            idle_wait_ms: defaults::idle_wait_ms(),
            shift_interval_ms: defaults::shift_interval_ms(),
        }
    }
}

impl EventConfig {
    /// Maximum time to block waiting for input after an idle tick
    #[inline]
    pub fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.idle_wait_ms.into())
    }

    /// True if a window shift at `time` is allowed after one at `last`
    ///
    /// Times are server time-stamps in milliseconds, which wrap.
    pub fn shift_allowed(&self, last: Option<u32>, time: u32) -> bool {
        match last {
            None => true,
            Some(last) => time.wrapping_sub(last) >= self.shift_interval_ms,
        }
    }
}

mod defaults {
    pub fn idle_poll_count() -> u32 {
        10
    }
    pub fn idle_wait_ms() -> u32 {
        50
    }
    pub fn shift_interval_ms() -> u32 {
        50
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shift_rate_limit() {
        let config = EventConfig::default();
        assert!(config.shift_allowed(None, 0));
        assert!(!config.shift_allowed(Some(1000), 1020));
        assert!(config.shift_allowed(Some(1000), 1050));
        // across wrap-around
        assert!(config.shift_allowed(Some(u32::MAX - 10), 60));
    }
}
