// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Top-level configuration struct

use super::{EventConfig, PopupConfig};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Base configuration
///
/// This is serializable (using `feature = "serde"`) with the following fields:
///
/// > `popup`: [`PopupConfig`] \
/// > `event`: [`EventConfig`]
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    #[cfg_attr(feature = "serde", serde(default))]
    pub popup: PopupConfig,

    #[cfg_attr(feature = "serde", serde(default))]
    pub event: EventConfig,

    #[cfg_attr(feature = "serde", serde(skip))]
    is_dirty: bool,
}

impl Config {
    /// Has the config ever been updated?
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Mutable access to popup defaults, marking the config dirty
    pub fn popup_mut(&mut self) -> &mut PopupConfig {
        self.is_dirty = true;
        &mut self.popup
    }

    /// Mutable access to event tuning, marking the config dirty
    pub fn event_mut(&mut self) -> &mut EventConfig {
        self.is_dirty = true;
        &mut self.event
    }
}
