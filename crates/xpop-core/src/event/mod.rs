// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Event handling
//!
//! Input arrives from the [`Backend`](crate::backend::Backend) as [`Event`]
//! values. While a popup is shown all pointer and keyboard input is grabbed
//! by the innermost popup's window, thus pointer positions are always given
//! relative to that window (see [`crate::popup::layout`] for conversion to
//! the frame of another popup).
//!
//! Keyboard shortcuts of popup entries are described by [`Shortcut`], parsed
//! from strings like `"^Q"` (see [`Shortcut::parse_list`]).
//!
//! [`Timers`] keeps the rest of the toolkit responsive while a popup runs
//! its modal loop.

mod event;
mod shortcut;
mod timer;

pub use event::{Button, Event, Key, Modifiers};
pub use shortcut::{MAX_SHORTCUTS, Shortcut, Shortcuts, underline_pos};
pub use timer::{TimerHandle, Timers};
