// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Windowing system backends
//!
//! The popup engine talks to the host windowing system only through the
//! [`Backend`] trait: it creates transient windows, grabs input, paints
//! display lists and polls for events. An X11 implementation maps these
//! one-to-one onto `CreateWindow` (with override-redirect, save-under and
//! backing-store attributes), `GrabPointer`/`GrabKeyboard` and so on.
//!
//! [`headless::Headless`] is a scripted implementation for tests and demos.

pub mod headless;

use crate::draw::DrawCmd;
use crate::event::Event;
use crate::geom::{Coord, Rect, Size};
use crate::text::TextMetrics;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// Identifier of a window of the windowing system
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowHandle(u32);

impl WindowHandle {
    /// Construct from the windowing system's identifier
    #[inline]
    pub const fn from_raw(id: u32) -> Self {
        WindowHandle(id)
    }

    /// Get the windowing system's identifier
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Attributes of a popup window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowAttributes {
    /// Bypass the window manager
    pub override_redirect: bool,
    /// Ask the server to save (and restore) the screen under the window
    pub save_under: bool,
    /// Ask the server to retain the window's contents
    pub backing_store: bool,
}

impl WindowAttributes {
    /// Attributes used for all popup windows
    pub const POPUP: Self = WindowAttributes {
        override_redirect: true,
        save_under: true,
        backing_store: true,
    };
}

/// Errors reported by a backend
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The connection to the display was lost
    #[error("connection to the display was lost")]
    Disconnected,
    /// The window does not exist
    #[error("unknown window {0}")]
    UnknownWindow(WindowHandle),
    /// The windowing system refused to create a window
    #[error("failed to create window: {0}")]
    CreateWindow(String),
}

/// A failed input grab
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabError {
    #[error("failed to grab the pointer")]
    Pointer,
    #[error("failed to grab the keyboard")]
    Keyboard,
}

/// Interface to the windowing system
///
/// All rects passed to and returned from a backend are in screen (root)
/// coordinates unless otherwise noted.
pub trait Backend {
    /// Size of the screen
    fn screen_size(&self) -> Size;

    /// Current pointer position
    fn pointer_position(&self) -> Coord;

    /// Whether the server honours [`WindowAttributes::save_under`]
    ///
    /// When this is false, closing a popup requires the application and
    /// all remaining popups to be redrawn.
    fn supports_save_under(&self) -> bool;

    /// Text measurement for the fonts this backend renders with
    fn text_metrics(&self) -> Rc<dyn TextMetrics>;

    /// Create and map a window
    ///
    /// `owner` is the application window the popup belongs to, if any.
    fn create_window(
        &mut self,
        owner: Option<WindowHandle>,
        rect: Rect,
        attrs: &WindowAttributes,
    ) -> Result<WindowHandle, BackendError>;

    /// Move and/or resize a window
    fn configure_window(&mut self, window: WindowHandle, rect: Rect) -> Result<(), BackendError>;

    /// Destroy a window
    fn destroy_window(&mut self, window: WindowHandle);

    /// Paint a display list (in window-local coordinates)
    fn paint(&mut self, window: WindowHandle, cmds: &[DrawCmd]);

    /// Grab the pointer for `window`
    ///
    /// A new grab replaces any grab held by this client.
    fn grab_pointer(&mut self, window: WindowHandle) -> Result<(), GrabError>;

    /// Grab the keyboard for `window`
    fn grab_keyboard(&mut self, window: WindowHandle) -> Result<(), GrabError>;

    /// Release the pointer grab
    fn ungrab_pointer(&mut self);

    /// Release both pointer and keyboard grabs
    fn ungrab(&mut self);

    /// Request a repaint of all application windows
    fn redraw_application(&mut self);

    /// Return the next pending event without blocking
    fn poll_event(&mut self) -> Result<Option<Event>, BackendError>;

    /// Wait up to `timeout` for the next event
    fn wait_event(&mut self, timeout: Duration) -> Result<Option<Event>, BackendError>;
}
