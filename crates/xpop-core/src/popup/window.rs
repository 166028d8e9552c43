// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Popup windows and input grabs

use super::layout::{ENTRY_PADDING_Y, INNER_PADDING_LEFT, INNER_PADDING_RIGHT, LINE_HEIGHT, SYMBOL_WIDTH};
use super::{EntryId, EntryKind, Error, PopupId, Popups, Response, Result};
use crate::backend::{Backend, WindowAttributes};
use crate::draw::DrawCmd;
use crate::geom::{Coord, Rect, Size};

impl Popups {
    /// Show (or repaint) a popup
    ///
    /// The popup is laid out if required. Its window is created if absent
    /// (at the position last chosen by
    /// [`Self::calculate_window_position`]) and resized when its geometry
    /// changed. Finally its display list is painted.
    pub fn draw(&mut self, backend: &mut dyn Backend, id: PopupId) -> Result<()> {
        self.recalc(id)?;
        let popup = self.popup(id)?;
        let (rect, owner, configured) = (popup.rect, popup.owner, popup.configured);
        match popup.win {
            None => {
                let win = backend
                    .create_window(owner, rect, &WindowAttributes::POPUP)
                    .map_err(|err| {
                        log::error!(target: "xpop_core::popup", "draw: failed to create window for {id}: {err}");
                        Error::Backend(err)
                    })?;
                log::debug!(target: "xpop_core::popup", "draw: {id} window {win} at {rect:?}");
                let popup = self.popup_mut(id)?;
                popup.win = Some(win);
                popup.configured = rect;
            }
            Some(win) if configured != rect => {
                backend.configure_window(win, rect)?;
                self.popup_mut(id)?.configured = rect;
            }
            Some(_) => (),
        }

        let cmds = self.display_list(id)?;
        if let Some(win) = self.popup(id)?.win {
            backend.paint(win, &cmds);
        }
        Ok(())
    }

    /// Build the display list of a laid-out popup
    pub(crate) fn display_list(&self, id: PopupId) -> Result<Vec<DrawCmd>> {
        let popup = self.popup(id)?;
        let style = self.style(id)?;
        let colors = &style.colors;
        let bw = style.border();
        let size = popup.rect.size;
        let mut cmds = vec![
            DrawCmd::Fill {
                rect: Rect::new(Coord::ZERO, size),
                color: colors.background,
            },
            DrawCmd::Frame {
                rect: Rect::new(Coord::ZERO, size),
                bw: style.frame_bw(),
                color: colors.background,
            },
        ];

        if let Some(title) = popup.title.as_deref() {
            let tb = popup.title_box;
            let text_w = self.metrics.text_width(style.title_font, title);
            cmds.push(DrawCmd::Text {
                pos: Coord(tb.pos.0 + (tb.size.0 - text_w) / 2, tb.pos.1 + (tb.size.1 - self.metrics.line_height(style.title_font)) / 2),
                text: title.to_string(),
                font: style.title_font,
                color: colors.title,
                underline: None,
            });
            cmds.push(DrawCmd::Separator {
                from: Coord(bw, tb.pos2().1),
                width: size.0 - 2 * bw,
                color: colors.disabled_text,
            });
        }

        let font = style.entry_font;
        for eid in popup.entries.iter() {
            let Some(entry) = self.entries.get(eid.0) else {
                continue;
            };
            if entry.is_hidden() {
                continue;
            }
            let r = entry.rect;
            if entry.kind == EntryKind::Line {
                cmds.push(DrawCmd::Separator {
                    from: Coord(r.pos.0, r.pos.1 + LINE_HEIGHT / 2),
                    width: r.size.0,
                    color: colors.disabled_text,
                });
                continue;
            }

            let active = popup.active == Some(*eid);
            if active {
                cmds.push(DrawCmd::Fill {
                    rect: r,
                    color: colors.highlight,
                });
            }
            let color = if entry.is_disabled() {
                colors.disabled_text
            } else if active {
                colors.highlight_text
            } else {
                colors.text
            };

            let text_y = r.pos.1 + ENTRY_PADDING_Y;
            let left = r.pos.0 + INNER_PADDING_LEFT;
            let symbol = |x: i32| Rect::new(Coord(x, r.pos.1), Size(SYMBOL_WIDTH, r.size.1));
            match entry.kind {
                EntryKind::Toggle => cmds.push(DrawCmd::CheckMark {
                    rect: symbol(left),
                    checked: entry.is_checked(),
                    color: colors.radio,
                }),
                EntryKind::Radio => cmds.push(DrawCmd::RadioMark {
                    rect: symbol(left),
                    checked: entry.is_checked(),
                    color: colors.radio,
                }),
                _ => (),
            }

            cmds.push(DrawCmd::Text {
                pos: Coord(left + popup.gutter_left, text_y),
                text: entry.label.clone(),
                font,
                color,
                underline: entry.ulpos,
            });

            let right = r.pos2().0 - INNER_PADDING_RIGHT - popup.gutter_right;
            if let Some(accel) = entry.accel.as_deref() {
                let w = self.metrics.text_width(font, accel);
                cmds.push(DrawCmd::Text {
                    pos: Coord(right - w, text_y),
                    text: accel.to_string(),
                    font,
                    color,
                    underline: None,
                });
            }

            if entry.kind == EntryKind::Sub {
                cmds.push(DrawCmd::SubArrow {
                    rect: symbol(right),
                    color,
                });
            }
        }

        Ok(cmds)
    }

    /// Grab pointer and keyboard for a shown popup
    ///
    /// If the keyboard grab fails, the pointer grab is released again.
    pub fn grab(&mut self, backend: &mut dyn Backend, id: PopupId) -> Result<()> {
        let Some(win) = self.popup(id)?.win else {
            log::error!(target: "xpop_core::popup", "grab: {id} is not shown");
            return Err(Error::NotShown);
        };

        if let Err(err) = backend.grab_pointer(win) {
            log::error!(target: "xpop_core::popup", "grab: {id}: {err}");
            return Err(err.into());
        }
        if let Err(err) = backend.grab_keyboard(win) {
            log::error!(target: "xpop_core::popup", "grab: {id}: {err}");
            backend.ungrab_pointer();
            return Err(err.into());
        }
        log::debug!(target: "xpop_core::popup", "grab: {id} window {win}");
        Ok(())
    }

    /// Close a popup
    ///
    /// Open sub-popups are closed first. With `invoke_leave`, the active
    /// entry's leave callback runs. The parent popup (if shown) is re-grabbed
    /// before the window is destroyed. When the backend cannot save the
    /// screen under windows, the application and all still-shown popups are
    /// redrawn.
    pub fn close(&mut self, backend: &mut dyn Backend, id: PopupId, invoke_leave: bool) -> Result<()> {
        let subs: Vec<PopupId> = self
            .popup(id)?
            .entries
            .iter()
            .filter_map(|e| self.entries.get(e.0).and_then(|e| e.sub))
            .filter(|sub| self.popups.get(sub.0).is_some_and(|p| p.win.is_some()))
            .collect();
        for sub in subs {
            self.close(backend, sub, invoke_leave)?;
        }

        let popup = self.popup(id)?;
        if popup.win.is_none() {
            return Ok(());
        }
        let active = popup.active;
        if let Some(active) = active.filter(|_| invoke_leave) {
            self.invoke_leave(active);
        }

        // callbacks may have deleted anything except shown popups
        let popup = self.popup_mut(id)?;
        popup.active = None;
        popup.last_shift = None;
        let parent = popup.parent;
        let Some(win) = popup.win.take() else {
            return Ok(());
        };

        self.hand_back_grab(backend, parent);
        backend.destroy_window(win);
        log::debug!(target: "xpop_core::popup", "close: {id} window {win}");

        if !backend.supports_save_under() {
            backend.redraw_application();
            let shown: Vec<PopupId> = self
                .order
                .iter()
                .copied()
                .filter(|p| self.popups.get(p.0).is_some_and(|p| p.win.is_some()))
                .collect();
            for p in shown {
                self.draw(backend, p)?;
            }
        }
        Ok(())
    }

    /// Forget the window of a popup which was destroyed externally
    ///
    /// Input is handed back as by [`Self::close`].
    pub(crate) fn forget_window(&mut self, backend: &mut dyn Backend, id: PopupId) {
        let Some(popup) = self.popups.get_mut(id.0) else {
            return;
        };
        popup.active = None;
        popup.last_shift = None;
        let parent = popup.parent;
        if popup.win.take().is_some() {
            self.hand_back_grab(backend, parent);
        }
    }

    /// Re-grab for `parent` if it is shown, otherwise release all grabs
    fn hand_back_grab(&mut self, backend: &mut dyn Backend, parent: Option<PopupId>) {
        match parent.filter(|p| self.popups.get(p.0).is_some_and(|p| p.win.is_some())) {
            Some(parent) => {
                if let Err(err) = self.grab(backend, parent) {
                    crate::util::warn_about_error_with_target(
                        "xpop_core::popup",
                        "failed to re-grab parent popup",
                        &err,
                    );
                }
            }
            None => backend.ungrab(),
        }
    }

    /// Change the active (highlighted) entry of a shown popup
    ///
    /// The leave callback of the previous entry and the enter callback of
    /// the new one run, and the popup is repainted.
    pub(crate) fn set_active(
        &mut self,
        backend: &mut dyn Backend,
        id: PopupId,
        entry: Option<EntryId>,
    ) -> Result<()> {
        let old = self.popup(id)?.active;
        if old == entry {
            return Ok(());
        }
        if let Some(old) = old {
            self.invoke_leave(old);
        }

        // the popup may no longer be shown if a callback misbehaved
        let entry = entry.filter(|e| self.entries.get(e.0).is_some_and(|e| e.is_activatable()));
        self.popup_mut(id)?.active = entry;
        if let Some(entry) = entry {
            log::trace!(target: "xpop_core::popup", "set_active: {id} entry {entry}");
            self.fill_ret(entry);
            self.invoke_enter(entry);
        }
        if self.popup(id)?.win.is_some() {
            self.draw(backend, id)?;
        }
        Ok(())
    }

    pub(crate) fn invoke_enter(&mut self, entry: EntryId) -> Response {
        let cb = self.entries.get(entry.0).and_then(|e| e.enter.clone());
        match (cb, self.make_return(entry)) {
            (Some(cb), Some(ret)) => cb(&ret, self),
            _ => Response::Continue,
        }
    }

    pub(crate) fn invoke_leave(&mut self, entry: EntryId) -> Response {
        let cb = self.entries.get(entry.0).and_then(|e| e.leave.clone());
        match (cb, self.make_return(entry)) {
            (Some(cb), Some(ret)) => cb(&ret, self),
            _ => Response::Continue,
        }
    }
}
