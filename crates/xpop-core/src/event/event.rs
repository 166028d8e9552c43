// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Event handling: `Event` type and dependencies

use crate::backend::WindowHandle;
use crate::geom::Coord;
use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier state
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
    }
}

/// A mouse button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Middle,
    Right,
    Other(u8),
}

/// A key, as far as the popup engine cares about it
///
/// Printable keys are reported as [`Key::Char`] with shift already applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    /// The X11 `Cancel` key
    Cancel,
    Return,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// Function key `F1`, `F2`, ...
    F(u8),
    Char(char),
}

/// Events from the windowing system
///
/// All positions are relative to `window`, which for pointer events is the
/// window holding the pointer grab. `time` is the server time-stamp in
/// milliseconds (wrapping).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// (Part of) `window` needs repainting
    Expose { window: WindowHandle },
    /// Pointer motion
    Motion {
        window: WindowHandle,
        pos: Coord,
        time: u32,
    },
    /// A mouse button was pressed
    ButtonPress {
        window: WindowHandle,
        pos: Coord,
        button: Button,
        time: u32,
    },
    /// A mouse button was released
    ButtonRelease {
        window: WindowHandle,
        pos: Coord,
        button: Button,
        time: u32,
    },
    /// A key was pressed
    KeyPress {
        window: WindowHandle,
        key: Key,
        modifiers: Modifiers,
        time: u32,
    },
    /// `window` was destroyed by somebody else
    Destroyed { window: WindowHandle },
}

impl Event {
    /// The window this event was reported for
    pub fn window(&self) -> WindowHandle {
        match *self {
            Event::Expose { window }
            | Event::Motion { window, .. }
            | Event::ButtonPress { window, .. }
            | Event::ButtonRelease { window, .. }
            | Event::KeyPress { window, .. }
            | Event::Destroyed { window } => window,
        }
    }
}
