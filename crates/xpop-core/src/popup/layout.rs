// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Popup geometry
//!
//! Layout of a popup (its size and the box of each entry) is a pure function
//! of its entries, fonts, border width, title and minimum width. It is
//! cached until one of these changes.
//!
//! A popup's layout, from the outside in:
//!
//! -   a border of `|bw|` pixels
//! -   the title box (when titled): a line of title text plus
//!     [`TITLE_PADDING_Y`] above and below
//! -   [`OUTER_PADDING`] on every side of the entry area
//! -   entries, each a line of entry text plus [`ENTRY_PADDING_Y`] above and
//!     below, or [`LINE_HEIGHT`] for separators. Within each entry:
//!     [`INNER_PADDING_LEFT`], a check gutter of [`SYMBOL_WIDTH`] (if any
//!     entry is a toggle or radio button), the label, [`ACCEL_GAP`] and the
//!     accelerator text (if any entry has one), a sub-popup arrow gutter
//!     (if any entry links a sub-popup) and [`INNER_PADDING_RIGHT`].
//!
//! # Coordinate frames
//!
//! Positions are either *root* (screen) coordinates or *local* to one popup
//! (origin at its top-left corner, including the border). The only
//! conversions are [`Popups::to_root`] and [`Popups::from_root`].

use super::{EntryId, EntryKind, PopupId, Popups, Result};
use crate::backend::Backend;
use crate::config::EventConfig;
use crate::geom::{Coord, Offset, Rect, Size};

/// Padding around the entry area
pub const OUTER_PADDING: i32 = 2;
/// Padding left of the check gutter
pub const INNER_PADDING_LEFT: i32 = 6;
/// Padding right of the arrow gutter
pub const INNER_PADDING_RIGHT: i32 = 6;
/// Width of check and arrow gutters
pub const SYMBOL_WIDTH: i32 = 16;
/// Minimum space between label and accelerator text
pub const ACCEL_GAP: i32 = 16;
/// Vertical padding of each entry
pub const ENTRY_PADDING_Y: i32 = 2;
/// Horizontal padding of the title
pub const TITLE_PADDING_X: i32 = 6;
/// Vertical padding of the title
pub const TITLE_PADDING_Y: i32 = 3;
/// Height of a separator line entry
pub const LINE_HEIGHT: i32 = 6;

impl Popups {
    /// Height of one (non-separator) entry of `popup`
    pub(crate) fn entry_height(&self, popup: PopupId) -> Result<i32> {
        let font = self.style(popup)?.entry_font;
        Ok(self.metrics.line_height(font) + 2 * ENTRY_PADDING_Y)
    }

    /// Lay out a popup, if required
    ///
    /// Computes the popup size and the box of every entry. Visible entries
    /// lie within the popup, below the title box; hidden entries get an
    /// empty box and take no space.
    pub fn recalc(&mut self, id: PopupId) -> Result<()> {
        let popup = self.popup(id)?;
        if !popup.need_recalc {
            return Ok(());
        }

        let style = self.style(id)?;
        let (title_font, entry_font) = (style.title_font, style.entry_font);
        let bw = style.border();
        let metrics = self.metrics.clone();

        let entry_h = metrics.line_height(entry_font) + 2 * ENTRY_PADDING_Y;
        let (title_w, title_h) = match popup.title.as_deref() {
            Some(title) => (
                metrics.text_width(title_font, title) + 2 * TITLE_PADDING_X,
                metrics.line_height(title_font) + 2 * TITLE_PADDING_Y,
            ),
            None => (0, 0),
        };

        let (mut label_w, mut accel_w) = (0, 0);
        let (mut has_check, mut has_sub) = (false, false);
        for entry in popup.entries.iter().filter_map(|e| self.entries.get(e.0)) {
            if entry.kind == EntryKind::Line || entry.is_hidden() {
                continue;
            }
            label_w = label_w.max(metrics.text_width(entry_font, &entry.label));
            if let Some(accel) = entry.accel.as_deref() {
                accel_w = accel_w.max(metrics.text_width(entry_font, accel));
            }
            has_check |= matches!(entry.kind, EntryKind::Toggle | EntryKind::Radio);
            has_sub |= entry.kind == EntryKind::Sub;
        }

        let gutter_left = if has_check { SYMBOL_WIDTH } else { 0 };
        let gutter_right = if has_sub { SYMBOL_WIDTH } else { 0 };
        let text_w = if accel_w > 0 {
            label_w + ACCEL_GAP + accel_w
        } else {
            label_w
        };
        let content_w = 2 * OUTER_PADDING
            + INNER_PADDING_LEFT
            + gutter_left
            + text_w
            + gutter_right
            + INNER_PADDING_RIGHT;
        let w = content_w.max(title_w).max(popup.min_width - 2 * bw) + 2 * bw;

        let x = bw + OUTER_PADDING;
        let entry_w = w - 2 * x;
        let mut y = bw + title_h + OUTER_PADDING;
        let ids = popup.entries.clone();
        for id in ids {
            let Some(entry) = self.entries.get_mut(id.0) else {
                continue;
            };
            if entry.is_hidden() {
                entry.rect = Rect::ZERO;
                continue;
            }
            let h = match entry.kind {
                EntryKind::Line => LINE_HEIGHT,
                _ => entry_h,
            };
            entry.rect = Rect::new(Coord(x, y), Size(entry_w, h));
            y += h;
        }
        let h = y + OUTER_PADDING + bw;

        let popup = self.popup_mut(id)?;
        popup.rect.size = Size(w, h);
        popup.title_box = Rect::new(Coord(bw, bw), Size(w - 2 * bw, title_h));
        popup.gutter_left = gutter_left;
        popup.gutter_right = gutter_right;
        popup.need_recalc = false;
        log::trace!(target: "xpop_core::popup", "recalc: {id} size={:?}", popup.rect.size);
        Ok(())
    }

    /// Convert a position local to `popup` to root coordinates
    pub fn to_root(&self, popup: PopupId, local: Coord) -> Result<Coord> {
        Ok(local + Offset::from(self.popup(popup)?.rect.pos))
    }

    /// Convert a root position to coordinates local to `popup`
    pub fn from_root(&self, popup: PopupId, root: Coord) -> Result<Coord> {
        Ok(root - Offset::from(self.popup(popup)?.rect.pos))
    }

    /// Choose the screen position of a popup about to be shown
    ///
    /// A top-level popup is placed at its requested position (see
    /// [`Self::set_position`]) or else at the pointer. A sub-popup is placed
    /// right of its parent, top-aligned with the linking entry. The result
    /// is adjusted to fit the screen:
    ///
    /// -   on vertical overflow, the popup flips above the anchor (for a
    ///     sub-popup, bottom-aligned with the linking entry) if that fits,
    ///     else is moved up to the bottom screen edge
    /// -   on horizontal overflow, a sub-popup flips to the left of its
    ///     parent if that fits; otherwise the popup moves left to the right
    ///     screen edge
    /// -   finally `x` and `y` are clamped to be non-negative
    pub fn calculate_window_position(&mut self, backend: &dyn Backend, id: PopupId) -> Result<Coord> {
        self.recalc(id)?;
        let screen = backend.screen_size();
        let popup = self.popup(id)?;
        let Size(w, h) = popup.rect.size;

        let link = popup
            .link
            .and_then(|e| self.entries.get(e.0))
            .and_then(|e| self.popups.get(e.popup.0).map(|p| (p.rect, e.rect)));

        let (mut x, mut y) = match link {
            Some((parent, entry)) => {
                let (top, bottom) = (parent.pos.1 + entry.pos.1, parent.pos.1 + entry.pos2().1);
                let mut y = top;
                if y + h > screen.1 {
                    y = if bottom - h >= 0 { bottom - h } else { screen.1 - h };
                }
                let mut x = parent.pos2().0;
                if x + w > screen.0 {
                    let left = parent.pos.0 - w;
                    x = if left >= 0 { left } else { screen.0 - w };
                }
                (x, y)
            }
            None => {
                let anchor = match popup.req_pos {
                    Some(Coord(x, y)) => Coord(
                        if x < 0 { screen.0 + x - w } else { x },
                        if y < 0 { screen.1 + y - h } else { y },
                    ),
                    None => backend.pointer_position(),
                };
                let Coord(mut x, mut y) = anchor;
                if y + h > screen.1 {
                    y = if anchor.1 - h >= 0 { anchor.1 - h } else { screen.1 - h };
                }
                if x + w > screen.0 {
                    x = screen.0 - w;
                }
                (x, y)
            }
        };
        x = x.max(0);
        y = y.max(0);

        let pos = Coord(x, y);
        self.popup_mut(id)?.rect.pos = pos;
        log::trace!(target: "xpop_core::popup", "calculate_window_position: {id} at {pos:?}");
        Ok(pos)
    }

    /// Move a popup (and its live window)
    fn move_window(&mut self, backend: &mut dyn Backend, id: PopupId, pos: Coord) -> Result<()> {
        let popup = self.popup_mut(id)?;
        popup.rect.pos = pos;
        if let Some(win) = popup.win {
            popup.configured = popup.rect;
            let rect = popup.rect;
            backend.configure_window(win, rect)?;
        }
        Ok(())
    }

    /// Shift a partially off-screen popup towards the pointer
    ///
    /// When the pointer (`root`) touches a screen edge beyond which the popup
    /// is clipped, the popup moves by up to one entry height in the opposite
    /// direction. Shifts are at least [`EventConfig::shift_interval_ms`]
    /// apart (`time` is the event time). Returns true if the popup moved.
    pub fn motion_shift_window(
        &mut self,
        backend: &mut dyn Backend,
        config: &EventConfig,
        id: PopupId,
        root: Coord,
        time: u32,
    ) -> Result<bool> {
        let step = self.entry_height(id)?;
        let screen = backend.screen_size();
        let popup = self.popup(id)?;
        if popup.win.is_none() || !config.shift_allowed(popup.last_shift, time) {
            return Ok(false);
        }

        let rect = popup.rect;
        let mut delta = Offset::ZERO;
        if root.1 <= 0 && rect.pos.1 < 0 {
            delta.1 = step.min(-rect.pos.1);
        } else if root.1 >= screen.1 - 1 && rect.pos2().1 > screen.1 {
            delta.1 = -step.min(rect.pos2().1 - screen.1);
        }
        if root.0 <= 0 && rect.pos.0 < 0 {
            delta.0 = step.min(-rect.pos.0);
        } else if root.0 >= screen.0 - 1 && rect.pos2().0 > screen.0 {
            delta.0 = -step.min(rect.pos2().0 - screen.0);
        }
        if delta == Offset::ZERO {
            return Ok(false);
        }

        log::trace!(target: "xpop_core::popup", "motion_shift_window: {id} by {delta:?}");
        self.move_window(backend, id, rect.pos + delta)?;
        self.popup_mut(id)?.last_shift = Some(time);
        Ok(true)
    }

    /// Shift a popup vertically so that `entry` is fully on-screen
    ///
    /// Returns true if the popup moved.
    pub fn key_shift_window(&mut self, backend: &mut dyn Backend, id: PopupId, entry: EntryId) -> Result<bool> {
        let screen = backend.screen_size();
        let rect = self.entry(entry)?.rect;
        let popup = self.popup(id)?;
        if popup.win.is_none() || rect.size.is_empty() {
            return Ok(false);
        }

        let top = popup.rect.pos.1 + rect.pos.1;
        let bottom = top + rect.size.1;
        let dy = if top < 0 {
            -top
        } else if bottom > screen.1 {
            screen.1 - bottom
        } else {
            return Ok(false);
        };

        let pos = popup.rect.pos + Offset(0, dy);
        log::trace!(target: "xpop_core::popup", "key_shift_window: {id} by {dy}");
        self.move_window(backend, id, pos)?;
        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::headless::Headless;
    use crate::popup::{EntryArg, EntryState};
    use crate::text::{FixedMetrics, TextMetrics};

    // FixedMetrics at size 12: 8 pixels per grapheme, line height 15
    const ENTRY_H: i32 = 15 + 2 * ENTRY_PADDING_Y;

    #[test]
    fn scenario_title_and_separator() {
        let mut popups = Popups::new();
        let p = popups.create(None, Some("File"));
        let e = popups.add_entries(p, "New|Open|%lClose", &[]).unwrap();
        popups.recalc(p).unwrap();

        let popup = popups.popup(p).unwrap();
        let title_h = 15 + 2 * TITLE_PADDING_Y;
        assert_eq!(popup.title_box(), Rect::new(Coord(1, 1), Size(popup.size().0 - 2, title_h)));
        let expected_h = 1 + title_h + OUTER_PADDING + 3 * ENTRY_H + LINE_HEIGHT + OUTER_PADDING + 1;
        assert_eq!(popup.size().1, expected_h);

        let first = popups.entry(e[0]).unwrap().rect();
        assert_eq!(first.pos, Coord(1 + OUTER_PADDING, 1 + title_h + OUTER_PADDING));

        // no entry in the title box
        for y in 0..(1 + title_h) {
            assert_eq!(popups.entry_at(p, Coord(10, y)).unwrap(), None);
        }
        assert_eq!(popups.entry_at(p, first.pos).unwrap(), Some(e[0]));
        // the separator is not hit
        let close = popups.entry(e[2]).unwrap().rect();
        assert_eq!(popups.entry_at(p, close.pos - Offset(0, 1)).unwrap(), None);
    }

    #[test]
    fn width() {
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        popups.add_entries(p, "Quit%S^Q", &[]).unwrap();
        let font = popups.entry_font(p).unwrap();
        let text_w = FixedMetrics.text_width(font, "Quit") + ACCEL_GAP + FixedMetrics.text_width(font, "^Q");
        let base = 2 * OUTER_PADDING + INNER_PADDING_LEFT + INNER_PADDING_RIGHT + 2;
        assert_eq!(popups.size(p).unwrap().0, base + text_w);

        popups.add_entries(p, "Opt%t", &[]).unwrap();
        assert_eq!(popups.size(p).unwrap().0, base + text_w + SYMBOL_WIDTH);

        popups.set_min_width(p, 500).unwrap();
        assert_eq!(popups.size(p).unwrap().0, 500);
    }

    #[test]
    fn bounds_and_idempotence() {
        let mut popups = Popups::new();
        let sub = popups.create(None, None);
        let p = popups.create(None, Some("A fairly long title"));
        popups.set_bw(p, -3).unwrap();
        let e = popups
            .add_entries(p, "One%t|%lTwo%h|Three%m|Four%S^F", &[EntryArg::Popup(sub)])
            .unwrap();
        popups.recalc(p).unwrap();

        let size = popups.popup(p).unwrap().size();
        let title_h = popups.popup(p).unwrap().title_box().size.1;
        let bounds = Rect::new(Coord(0, title_h), Size(size.0, size.1 - title_h));
        for id in popups.entries(p).unwrap() {
            let entry = popups.entry(*id).unwrap();
            if entry.is_hidden() {
                assert_eq!(entry.rect(), Rect::ZERO);
            } else {
                assert!(bounds.contains_rect(&entry.rect()), "{entry:?}");
            }
        }

        let rects: Vec<Rect> = e.iter().map(|e| popups.entry(*e).unwrap().rect()).collect();
        popups.popup_mut(p).unwrap().need_recalc = true;
        popups.recalc(p).unwrap();
        assert_eq!(popups.popup(p).unwrap().size(), size);
        let again: Vec<Rect> = e.iter().map(|e| popups.entry(*e).unwrap().rect()).collect();
        assert_eq!(rects, again);

        // hiding an entry shrinks the popup by one entry height
        popups.entry_raise_state(e[0], EntryState::HIDDEN).unwrap();
        assert_eq!(popups.size(p).unwrap().1, size.1 - ENTRY_H);
    }

    #[test]
    fn clamp_to_screen() {
        let backend = Headless::new(Size(100, 100));
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        popups.set_min_width(p, 200).unwrap();
        popups.add_entries(p, "A", &[]).unwrap();
        popups.set_position(p, Some(Coord(10, 10))).unwrap();
        let size = popups.size(p).unwrap();
        assert_eq!(size.0, 200);
        assert!(size.1 + 10 <= 100);

        let pos = popups.calculate_window_position(&backend, p).unwrap();
        assert_eq!(pos, Coord(0, 10));
    }

    #[test]
    fn fits_on_screen() {
        let mut backend = Headless::new(Size(300, 200));
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        popups.add_entries(p, "Alpha|Beta|Gamma", &[]).unwrap();
        let size = popups.size(p).unwrap();

        for pos in [Coord(290, 10), Coord(10, 190), Coord(299, 199), Coord(-5, -5)] {
            backend.set_pointer(pos);
            let Coord(x, y) = popups.calculate_window_position(&backend, p).unwrap();
            assert!(x >= 0 && y >= 0);
            assert!(x + size.0 <= 300 && y + size.1 <= 200, "{pos:?}");
        }

        // flip above the pointer
        backend.set_pointer(Coord(20, 190));
        let pos = popups.calculate_window_position(&backend, p).unwrap();
        assert_eq!(pos, Coord(20, 190 - size.1));

        // negative positions measure from the far edges
        popups.set_position(p, Some(Coord(-1, -1))).unwrap();
        let pos = popups.calculate_window_position(&backend, p).unwrap();
        assert_eq!(pos, Coord(300 - 1 - size.0, 200 - 1 - size.1));
    }

    #[test]
    fn frames() {
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        popups.popup_mut(p).unwrap().rect.pos = Coord(40, 30);
        assert_eq!(popups.to_root(p, Coord(5, 6)).unwrap(), Coord(45, 36));
        assert_eq!(popups.from_root(p, Coord(45, 36)).unwrap(), Coord(5, 6));
    }
}
