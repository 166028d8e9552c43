// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Headless backend
//!
//! [`Headless`] simulates a screen, its windows and input grabs in memory and
//! replays a [`Script`] of user input. Pointer and key input is delivered to
//! the window holding the grab (as a real X server does), with positions
//! translated into that window's frame.
//!
//! Every window-system operation is recorded (see [`Headless::ops`]) so that
//! tests may assert on grab and destroy ordering.

use super::{Backend, BackendError, GrabError, WindowAttributes, WindowHandle};
use crate::draw::DrawCmd;
use crate::event::{Button, Event, Key, Modifiers};
use crate::geom::{Coord, Rect, Size};
use crate::text::{FixedMetrics, TextMetrics};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

/// A simulated user input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Move the pointer to this screen position
    Motion(Coord),
    /// Press a mouse button at the current pointer position
    Press(Button),
    /// Release a mouse button at the current pointer position
    Release(Button),
    /// Press a key
    Key(Key, Modifiers),
    /// Destroy the window holding the pointer grab (from "outside")
    DestroyGrabbed,
    /// Nothing happens for one poll
    Idle,
}

/// A sequence of simulated user input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script(VecDeque<Input>);

impl Script {
    /// Construct an empty script
    pub fn new() -> Self {
        Script::default()
    }

    /// Append an input
    #[must_use]
    pub fn push(mut self, input: Input) -> Self {
        self.0.push_back(input);
        self
    }

    /// Move the pointer (screen coordinates)
    #[must_use]
    pub fn motion(self, x: i32, y: i32) -> Self {
        self.push(Input::Motion(Coord(x, y)))
    }

    /// Press a button
    #[must_use]
    pub fn press(self, button: Button) -> Self {
        self.push(Input::Press(button))
    }

    /// Release a button
    #[must_use]
    pub fn release(self, button: Button) -> Self {
        self.push(Input::Release(button))
    }

    /// Press then release the left button
    #[must_use]
    pub fn click(self) -> Self {
        self.press(Button::Left).release(Button::Left)
    }

    /// Press an unmodified key
    #[must_use]
    pub fn key(self, key: Key) -> Self {
        self.push(Input::Key(key, Modifiers::empty()))
    }

    /// Press a key with modifiers
    #[must_use]
    pub fn key_with(self, key: Key, modifiers: Modifiers) -> Self {
        self.push(Input::Key(key, modifiers))
    }

    /// Destroy the grabbed window
    #[must_use]
    pub fn destroy_grabbed(self) -> Self {
        self.push(Input::DestroyGrabbed)
    }

    /// Insert `n` idle polls
    #[must_use]
    pub fn idle(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.0.push_back(Input::Idle);
        }
        self
    }

    /// Number of remaining inputs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no input remains
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A recorded window-system operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Create(WindowHandle),
    Configure(WindowHandle, Rect),
    Destroy(WindowHandle),
    GrabPointer(WindowHandle),
    GrabKeyboard(WindowHandle),
    UngrabPointer,
    Ungrab,
    RedrawApplication,
}

/// A simulated window
#[derive(Clone, Debug)]
pub struct HeadlessWindow {
    /// Screen rect
    pub rect: Rect,
    pub attrs: WindowAttributes,
    pub owner: Option<WindowHandle>,
    /// Number of paints received
    pub paints: usize,
    /// The most recent display list
    pub last_paint: Vec<DrawCmd>,
}

/// A scripted, in-memory backend
pub struct Headless {
    screen: Size,
    metrics: Rc<dyn TextMetrics>,
    save_under: bool,
    next_window: u32,
    windows: BTreeMap<WindowHandle, HeadlessWindow>,
    pointer_grab: Option<WindowHandle>,
    keyboard_grab: Option<WindowHandle>,
    pointer: Coord,
    time: u32,
    step_ms: u32,
    script: VecDeque<Input>,
    queue: VecDeque<Event>,
    ops: Vec<Op>,
    /// When set, [`Backend::grab_pointer`] fails
    pub fail_pointer_grab: bool,
    /// When set, [`Backend::grab_keyboard`] fails
    pub fail_keyboard_grab: bool,
}

impl std::fmt::Debug for Headless {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Headless")
            .field("screen", &self.screen)
            .field("windows", &self.windows.len())
            .field("pointer_grab", &self.pointer_grab)
            .field("pointer", &self.pointer)
            .field("script", &self.script.len())
            .finish_non_exhaustive()
    }
}

impl Headless {
    /// Construct with the given screen size, using [`FixedMetrics`]
    pub fn new(screen: Size) -> Self {
        Headless {
            screen,
            metrics: Rc::new(FixedMetrics),
            save_under: true,
            next_window: 1,
            windows: BTreeMap::new(),
            pointer_grab: None,
            keyboard_grab: None,
            pointer: Coord::ZERO,
            time: 0,
            step_ms: 100,
            script: VecDeque::new(),
            queue: VecDeque::new(),
            ops: vec![],
            fail_pointer_grab: false,
            fail_keyboard_grab: false,
        }
    }

    /// Use different text metrics
    pub fn with_metrics(mut self, metrics: Rc<dyn TextMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set whether the simulated server supports save-under
    pub fn set_save_under(&mut self, save_under: bool) {
        self.save_under = save_under;
    }

    /// Set the time advanced per scripted input (milliseconds)
    pub fn set_step_ms(&mut self, step_ms: u32) {
        self.step_ms = step_ms;
    }

    /// Warp the pointer (without generating an event)
    pub fn set_pointer(&mut self, pos: Coord) {
        self.pointer = pos;
    }

    /// Append a script to the pending input
    pub fn push_script(&mut self, script: Script) {
        self.script.extend(script.0);
    }

    /// Number of scripted inputs not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Access a window, if it exists
    pub fn window(&self, window: WindowHandle) -> Option<&HeadlessWindow> {
        self.windows.get(&window)
    }

    /// Iterate over existing windows
    pub fn windows(&self) -> impl Iterator<Item = (WindowHandle, &HeadlessWindow)> {
        self.windows.iter().map(|(h, w)| (*h, w))
    }

    /// The window holding the pointer grab
    pub fn pointer_grab(&self) -> Option<WindowHandle> {
        self.pointer_grab
    }

    /// The window holding the keyboard grab
    pub fn keyboard_grab(&self) -> Option<WindowHandle> {
        self.keyboard_grab
    }

    /// Recorded operations, oldest first
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Forget recorded operations
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Number of application redraw requests
    pub fn app_redraws(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| **op == Op::RedrawApplication)
            .count()
    }

    /// Current server time
    pub fn time(&self) -> u32 {
        self.time
    }

    fn local(&self, window: WindowHandle) -> Coord {
        match self.windows.get(&window) {
            Some(w) => Coord(self.pointer.0 - w.rect.pos.0, self.pointer.1 - w.rect.pos.1),
            None => self.pointer,
        }
    }

    fn remove_window(&mut self, window: WindowHandle) -> bool {
        if self.windows.remove(&window).is_none() {
            return false;
        }
        if self.pointer_grab == Some(window) {
            self.pointer_grab = None;
        }
        if self.keyboard_grab == Some(window) {
            self.keyboard_grab = None;
        }
        self.queue.retain(|ev| ev.window() != window);
        true
    }

    /// Translate the next scripted input
    ///
    /// Returns `None` when the script is exhausted, `Some(None)` when the
    /// input produced no event.
    fn next_input(&mut self) -> Option<Option<Event>> {
        let input = self.script.pop_front()?;
        self.time = self.time.wrapping_add(self.step_ms);
        let time = self.time;
        log::trace!(target: "xpop_core::backend", "Headless: input {input:?}");

        let event = match input {
            Input::Motion(pos) => {
                self.pointer = pos;
                self.pointer_grab.map(|window| Event::Motion {
                    window,
                    pos: self.local(window),
                    time,
                })
            }
            Input::Press(button) => self.pointer_grab.map(|window| Event::ButtonPress {
                window,
                pos: self.local(window),
                button,
                time,
            }),
            Input::Release(button) => self.pointer_grab.map(|window| Event::ButtonRelease {
                window,
                pos: self.local(window),
                button,
                time,
            }),
            Input::Key(key, modifiers) => {
                self.keyboard_grab
                    .or(self.pointer_grab)
                    .map(|window| Event::KeyPress {
                        window,
                        key,
                        modifiers,
                        time,
                    })
            }
            Input::DestroyGrabbed => match self.pointer_grab {
                Some(window) => {
                    self.remove_window(window);
                    Some(Event::Destroyed { window })
                }
                None => None,
            },
            Input::Idle => None,
        };
        Some(event)
    }
}

impl Backend for Headless {
    fn screen_size(&self) -> Size {
        self.screen
    }

    fn pointer_position(&self) -> Coord {
        self.pointer
    }

    fn supports_save_under(&self) -> bool {
        self.save_under
    }

    fn text_metrics(&self) -> Rc<dyn TextMetrics> {
        self.metrics.clone()
    }

    fn create_window(
        &mut self,
        owner: Option<WindowHandle>,
        rect: Rect,
        attrs: &WindowAttributes,
    ) -> Result<WindowHandle, BackendError> {
        if rect.size.is_empty() {
            return Err(BackendError::CreateWindow(format!(
                "bad size {:?}",
                rect.size
            )));
        }
        let window = WindowHandle::from_raw(self.next_window);
        self.next_window += 1;
        self.windows.insert(window, HeadlessWindow {
            rect,
            attrs: *attrs,
            owner,
            paints: 0,
            last_paint: vec![],
        });
        self.ops.push(Op::Create(window));
        self.queue.push_back(Event::Expose { window });
        Ok(window)
    }

    fn configure_window(&mut self, window: WindowHandle, rect: Rect) -> Result<(), BackendError> {
        let w = self
            .windows
            .get_mut(&window)
            .ok_or(BackendError::UnknownWindow(window))?;
        w.rect = rect;
        self.ops.push(Op::Configure(window, rect));
        Ok(())
    }

    fn destroy_window(&mut self, window: WindowHandle) {
        if self.remove_window(window) {
            self.ops.push(Op::Destroy(window));
        }
    }

    fn paint(&mut self, window: WindowHandle, cmds: &[DrawCmd]) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.paints += 1;
            w.last_paint = cmds.to_vec();
        }
    }

    fn grab_pointer(&mut self, window: WindowHandle) -> Result<(), GrabError> {
        if self.fail_pointer_grab || !self.windows.contains_key(&window) {
            return Err(GrabError::Pointer);
        }
        self.pointer_grab = Some(window);
        self.ops.push(Op::GrabPointer(window));
        Ok(())
    }

    fn grab_keyboard(&mut self, window: WindowHandle) -> Result<(), GrabError> {
        if self.fail_keyboard_grab || !self.windows.contains_key(&window) {
            return Err(GrabError::Keyboard);
        }
        self.keyboard_grab = Some(window);
        self.ops.push(Op::GrabKeyboard(window));
        Ok(())
    }

    fn ungrab_pointer(&mut self) {
        self.pointer_grab = None;
        self.ops.push(Op::UngrabPointer);
    }

    fn ungrab(&mut self) {
        self.pointer_grab = None;
        self.keyboard_grab = None;
        self.ops.push(Op::Ungrab);
    }

    fn redraw_application(&mut self) {
        self.ops.push(Op::RedrawApplication);
    }

    fn poll_event(&mut self) -> Result<Option<Event>, BackendError> {
        if let Some(event) = self.queue.pop_front() {
            return Ok(Some(event));
        }
        Ok(self.next_input().flatten())
    }

    fn wait_event(&mut self, timeout: Duration) -> Result<Option<Event>, BackendError> {
        if let Some(event) = self.queue.pop_front() {
            return Ok(Some(event));
        }
        match self.next_input() {
            Some(event) => Ok(event),
            None => {
                let ms: u32 = timeout.as_millis().try_into().unwrap_or(u32::MAX);
                self.time = self.time.wrapping_add(ms);
                Err(BackendError::Disconnected)
            }
        }
    }
}
