// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! The modal interaction loop

use super::{EntryId, EntryKind, Policy, PopupId, Popups, Result};
use crate::backend::{Backend, WindowHandle};
use crate::config::EventConfig;
use crate::event::{Button, Event, Key, Modifiers, Timers};
use crate::geom::Coord;
use std::time::Instant;

/// State of a popup interaction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Nothing is shown
    #[default]
    Idle,
    /// The root popup is shown and holds the grab
    Shown,
    /// `n` levels of sub-popups are open; the innermost holds the grab
    SubOpen(usize),
    /// The interaction ended
    Closed { selected: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Select(EntryId),
    Cancel,
}

/// One run of the modal loop over a chain of open popups
///
/// `chain[0]` is the root popup; `chain[n]` is the sub-popup opened from
/// the active entry of `chain[n - 1]`. Only the last popup of the chain
/// holds the grab.
pub(crate) struct Interaction<'a> {
    popups: &'a mut Popups,
    backend: &'a mut dyn Backend,
    config: &'a EventConfig,
    timers: &'a mut Timers,
    chain: Vec<PopupId>,
    state: State,
    seen_press: bool,
    moved: bool,
    outcome: Option<Outcome>,
}

impl<'a> Interaction<'a> {
    pub(crate) fn new(
        popups: &'a mut Popups,
        backend: &'a mut dyn Backend,
        config: &'a EventConfig,
        timers: &'a mut Timers,
    ) -> Self {
        Interaction {
            popups,
            backend,
            config,
            timers,
            chain: vec![],
            state: State::Idle,
            seen_press: false,
            moved: false,
            outcome: None,
        }
    }

    pub(crate) fn state(&self) -> State {
        self.state
    }

    fn update_state(&mut self) {
        let state = match (self.outcome, self.chain.len()) {
            (Some(outcome), _) => State::Closed {
                selected: matches!(outcome, Outcome::Select(_)),
            },
            (None, 0) => State::Idle,
            (None, 1) => State::Shown,
            (None, n) => State::SubOpen(n - 1),
        };
        if state != self.state {
            log::trace!(target: "xpop_core::event", "Interaction: {:?} -> {state:?}", self.state);
            self.state = state;
        }
    }

    /// Show `root`, run the loop until it ends and close all popups
    ///
    /// Returns the selected entry, if any.
    pub(crate) fn run(&mut self, root: PopupId) -> Result<Option<EntryId>> {
        self.open_root(root)?;

        let mut empty_polls = 0;
        while self.outcome.is_none() {
            let event = match self.backend.poll_event() {
                Ok(None) => {
                    empty_polls += 1;
                    if empty_polls < self.config.idle_poll_count {
                        continue;
                    }
                    empty_polls = 0;
                    self.timers.service(Instant::now());
                    self.backend.wait_event(self.config.idle_wait())
                }
                result => {
                    empty_polls = 0;
                    result
                }
            };

            match event {
                Ok(Some(event)) => {
                    if let Err(err) = self.handle(event) {
                        crate::util::warn_about_error_with_target(
                            "xpop_core::event",
                            "Interaction: failed to handle event",
                            &err,
                        );
                        self.outcome = Some(Outcome::Cancel);
                    }
                }
                Ok(None) => (),
                Err(err) => {
                    log::warn!(target: "xpop_core::event", "Interaction: {err}; closing popup");
                    self.outcome = Some(Outcome::Cancel);
                }
            }
        }

        let outcome = self.outcome.unwrap_or(Outcome::Cancel);
        self.finish(outcome)?;
        Ok(match outcome {
            Outcome::Select(entry) => Some(entry),
            Outcome::Cancel => None,
        })
    }

    fn open_root(&mut self, root: PopupId) -> Result<()> {
        self.popups.calculate_window_position(&*self.backend, root)?;
        self.popups.draw(self.backend, root)?;
        if let Err(err) = self.popups.grab(self.backend, root) {
            self.popups.close(self.backend, root, false)?;
            return Err(err);
        }
        log::debug!(target: "xpop_core::event", "Interaction: showing {root}");
        self.chain.push(root);
        self.update_state();
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome) -> Result<()> {
        let invoke_leave = outcome == Outcome::Cancel;
        log::debug!(target: "xpop_core::event", "Interaction: finished with {outcome:?}");
        // innermost first: a popup whose window was destroyed no longer
        // reaches its open sub-popups
        while let Some(popup) = self.chain.pop() {
            self.popups.close(self.backend, popup, invoke_leave)?;
        }
        self.update_state();
        Ok(())
    }

    fn depth_of_window(&self, window: WindowHandle) -> Option<usize> {
        self.chain
            .iter()
            .position(|p| self.popups.popups.get(p.0).and_then(|p| p.win) == Some(window))
    }

    /// Innermost popup of the chain containing screen position `root`
    fn depth_at(&self, root: Coord) -> Option<usize> {
        (0..self.chain.len()).rev().find(|d| {
            self.popups
                .popups
                .get(self.chain[*d].0)
                .is_some_and(|p| p.rect.contains(root))
        })
    }

    /// Entry under screen position `root`, if any
    fn hit(&self, root: Coord) -> Result<Option<(usize, Option<EntryId>)>> {
        let Some(depth) = self.depth_at(root) else {
            return Ok(None);
        };
        let popup = self.chain[depth];
        let local = self.popups.from_root(popup, root)?;
        Ok(Some((depth, self.popups.entry_at_laid_out(popup, local))))
    }

    fn is_activatable(&self, entry: EntryId) -> bool {
        self.popups.entries.get(entry.0).is_some_and(|e| e.is_activatable())
    }

    fn handle(&mut self, event: Event) -> Result<()> {
        log::trace!(target: "xpop_core::event", "Interaction::handle: {event:?}");
        match event {
            Event::Expose { window } => {
                if let Some(depth) = self.depth_of_window(window) {
                    self.popups.draw(self.backend, self.chain[depth])?;
                }
            }
            Event::Motion { window, pos, time } => {
                self.moved = true;
                if let Some(depth) = self.depth_of_window(window) {
                    let root = self.popups.to_root(self.chain[depth], pos)?;
                    self.motion(root, time)?;
                }
            }
            Event::ButtonPress { window, pos, button, .. } => {
                self.seen_press = true;
                if let Some(depth) = self.depth_of_window(window) {
                    let root = self.popups.to_root(self.chain[depth], pos)?;
                    if self.depth_at(root).is_none() {
                        log::debug!(target: "xpop_core::event", "Interaction: {button:?} pressed outside");
                        self.outcome = Some(Outcome::Cancel);
                    }
                }
            }
            Event::ButtonRelease { window, pos, .. } => {
                if let Some(depth) = self.depth_of_window(window) {
                    let root = self.popups.to_root(self.chain[depth], pos)?;
                    self.release(root)?;
                }
            }
            Event::KeyPress { key, modifiers, .. } => self.key(key, modifiers)?,
            Event::Destroyed { window } => {
                if let Some(depth) = self.depth_of_window(window) {
                    let popup = self.chain[depth];
                    log::warn!(target: "xpop_core::event", "Interaction: window {window} of {popup} was destroyed");
                    self.popups.forget_window(self.backend, popup);
                    self.outcome = Some(Outcome::Cancel);
                }
            }
        }
        self.update_state();
        Ok(())
    }

    fn motion(&mut self, root: Coord, time: u32) -> Result<()> {
        if let Some(depth) = self.depth_at(root) {
            let popup = self.chain[depth];
            self.popups
                .motion_shift_window(self.backend, self.config, popup, root, time)?;
        }

        let Some((depth, entry)) = self.hit(root)? else {
            // outside every popup: deactivate the innermost, keeping it open
            if let Some(popup) = self.chain.last().copied() {
                self.popups.set_active(self.backend, popup, None)?;
            }
            return Ok(());
        };
        let popup = self.chain[depth];
        if let (Some(entry), Some(next)) = (entry, self.chain.get(depth + 1)) {
            if self.popups.entry(entry)?.sub == Some(*next) {
                return Ok(());
            }
        }

        self.close_from(depth + 1, true)?;
        let entry = entry.filter(|e| self.is_activatable(*e));
        self.popups.set_active(self.backend, popup, entry)?;
        if let Some(entry) = entry {
            if self.popups.entry(entry)?.kind == EntryKind::Sub {
                self.open_sub(entry, false)?;
            }
        }
        Ok(())
    }

    fn release(&mut self, root: Coord) -> Result<()> {
        if !self.moved && !self.seen_press {
            // the release of the button which opened the popup
            return Ok(());
        }
        if let Some((_, Some(entry))) = self.hit(root)? {
            let e = self.popups.entry(entry)?;
            if e.is_selectable() {
                self.outcome = Some(Outcome::Select(entry));
                return Ok(());
            } else if e.is_activatable() {
                return Ok(());
            }
        }

        let policy = self.popups.style(self.chain[0])?.policy;
        if policy == Policy::DragSelect {
            self.outcome = Some(Outcome::Cancel);
        }
        Ok(())
    }

    fn key(&mut self, key: Key, modifiers: Modifiers) -> Result<()> {
        let Some(depth) = self.chain.len().checked_sub(1) else {
            return Ok(());
        };
        let popup = self.chain[depth];
        let active = self.popups.popup(popup)?.active;

        if (modifiers - Modifiers::SHIFT).is_empty() {
            match key {
                Key::Escape | Key::Cancel => {
                    if depth == 0 {
                        self.outcome = Some(Outcome::Cancel);
                    } else {
                        self.close_from(depth, true)?;
                    }
                    return Ok(());
                }
                Key::Return => {
                    if let Some(entry) = active {
                        let e = self.popups.entry(entry)?;
                        if e.kind == EntryKind::Sub {
                            self.open_sub(entry, true)?;
                        } else if e.is_selectable() {
                            self.outcome = Some(Outcome::Select(entry));
                        }
                    }
                    return Ok(());
                }
                Key::Up | Key::Down | Key::Home | Key::End => {
                    return self.step(popup, key);
                }
                Key::Right => {
                    if let Some(entry) = active {
                        if self.popups.entry(entry)?.kind == EntryKind::Sub {
                            self.open_sub(entry, true)?;
                        }
                    }
                    return Ok(());
                }
                Key::Left => {
                    if depth > 0 {
                        self.close_from(depth, true)?;
                    }
                    return Ok(());
                }
                _ => (),
            }
        }

        self.shortcut(key, modifiers)
    }

    /// Move the active marker of `popup` for a navigation key
    fn step(&mut self, popup: PopupId, key: Key) -> Result<()> {
        let candidates: Vec<EntryId> = self
            .popups
            .popup(popup)?
            .entries
            .iter()
            .copied()
            .filter(|e| self.is_activatable(*e))
            .collect();
        let n = candidates.len();
        if n == 0 {
            return Ok(());
        }

        let current = self
            .popups
            .popup(popup)?
            .active
            .and_then(|a| candidates.iter().position(|e| *e == a));
        let index = match (key, current) {
            (Key::Down, Some(i)) => (i + 1) % n,
            (Key::Up, Some(i)) => (i + n - 1) % n,
            (Key::Up | Key::End, _) => n - 1,
            _ => 0,
        };
        let entry = candidates[index];
        self.popups.set_active(self.backend, popup, Some(entry))?;
        self.popups.key_shift_window(self.backend, popup, entry)?;
        Ok(())
    }

    /// Find a shortcut, innermost popup first
    fn shortcut(&mut self, key: Key, modifiers: Modifiers) -> Result<()> {
        let found = (0..self.chain.len()).rev().find_map(|depth| {
            let popup = self.popups.popups.get(self.chain[depth].0)?;
            popup
                .entries
                .iter()
                .copied()
                .find(|id| {
                    self.popups.entries.get(id.0).is_some_and(|e| {
                        e.is_activatable() && e.shortcuts.iter().any(|s| s.matches(key, modifiers))
                    })
                })
                .map(|entry| (depth, entry))
        });
        let Some((depth, entry)) = found else {
            return Ok(());
        };
        log::debug!(target: "xpop_core::event", "Interaction: shortcut {key:?} matches {entry}");

        if self.popups.entry(entry)?.kind == EntryKind::Sub {
            self.close_from(depth + 1, true)?;
            self.popups.set_active(self.backend, self.chain[depth], Some(entry))?;
            self.open_sub(entry, true)
        } else {
            self.outcome = Some(Outcome::Select(entry));
            Ok(())
        }
    }

    /// Open the sub-popup linked by `entry` of the innermost popup
    fn open_sub(&mut self, entry: EntryId, preselect: bool) -> Result<()> {
        let Some(sub) = self.popups.entry(entry)?.sub else {
            return Ok(());
        };
        if self.chain.contains(&sub) {
            if preselect && self.popups.popup(sub)?.active.is_none() {
                self.preselect(sub)?;
            }
            return Ok(());
        }

        self.popups.calculate_window_position(&*self.backend, sub)?;
        self.popups.draw(self.backend, sub)?;
        if let Err(err) = self.popups.grab(self.backend, sub) {
            crate::util::warn_about_error_with_target("xpop_core::event", "Interaction: cannot open sub-popup", &err);
            return self.popups.close(self.backend, sub, false);
        }
        self.chain.push(sub);
        self.update_state();

        if preselect {
            self.preselect(sub)?;
        }
        Ok(())
    }

    /// Activate the first activatable entry of `popup`
    fn preselect(&mut self, popup: PopupId) -> Result<()> {
        let first = self
            .popups
            .popup(popup)?
            .entries
            .iter()
            .copied()
            .find(|e| self.is_activatable(*e));
        if let Some(first) = first {
            self.popups.set_active(self.backend, popup, Some(first))?;
        }
        Ok(())
    }

    /// Close all popups at `depth` and deeper
    fn close_from(&mut self, depth: usize, invoke_leave: bool) -> Result<()> {
        if let Some(popup) = self.chain.get(depth).copied() {
            self.popups.close(self.backend, popup, invoke_leave)?;
            self.chain.truncate(depth);
            self.update_state();
        }
        Ok(())
    }
}
