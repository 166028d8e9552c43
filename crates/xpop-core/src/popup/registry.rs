// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! The popup registry

use super::arena::Arena;
use super::{Callback, Entry, EntryId, EntryKind, EntryState, Error, Popup, PopupId};
use super::{Policy, PopupReturn, Result};
use crate::backend::WindowHandle;
use crate::config::PopupConfig;
use crate::draw::color::{Color, ColorRole};
use crate::geom::{Coord, Size};
use crate::text::{FixedMetrics, Font, TextMetrics};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Registry of all popups and their entries
///
/// Every operation validates the handles it is given; failures are logged
/// (target `xpop_core::popup`) and reported as [`Error`].
pub struct Popups {
    pub(crate) popups: Arena<Popup>,
    pub(crate) entries: Arena<Entry>,
    /// All popups, in creation order
    pub(crate) order: Vec<PopupId>,
    defaults: PopupConfig,
    pub(crate) metrics: Rc<dyn TextMetrics>,
}

impl fmt::Debug for Popups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popups")
            .field("popups", &self.order)
            .field("num_entries", &self.entries.len())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl Default for Popups {
    fn default() -> Self {
        Popups::new()
    }
}

impl Popups {
    /// Construct with default styling and [`FixedMetrics`]
    pub fn new() -> Self {
        Popups::with_metrics(PopupConfig::default(), Rc::new(FixedMetrics))
    }

    /// Construct with the given defaults and text metrics
    pub fn with_metrics(defaults: PopupConfig, metrics: Rc<dyn TextMetrics>) -> Self {
        Popups {
            popups: Arena::default(),
            entries: Arena::default(),
            order: vec![],
            defaults,
            metrics,
        }
    }

    /// Styling copied into new popups
    pub fn defaults(&self) -> &PopupConfig {
        &self.defaults
    }

    /// Access styling copied into new popups
    ///
    /// This does not affect existing popups.
    pub fn defaults_mut(&mut self) -> &mut PopupConfig {
        &mut self.defaults
    }

    /// Number of popups
    pub fn len(&self) -> usize {
        self.popups.len()
    }

    /// True if there are no popups
    pub fn is_empty(&self) -> bool {
        self.popups.len() == 0
    }

    /// Iterate over all popups, in creation order
    pub fn iter(&self) -> impl Iterator<Item = PopupId> + '_ {
        self.order.iter().copied()
    }

    /// Create an empty popup
    ///
    /// `owner` is the application window the popup belongs to (if any).
    pub fn create(&mut self, owner: Option<WindowHandle>, title: Option<&str>) -> PopupId {
        let style = self.defaults.clone();
        let key = self
            .popups
            .insert_with(|key| Popup::new(PopupId(key), owner, title, style));
        let id = PopupId(key);
        self.order.push(id);
        log::debug!(target: "xpop_core::popup", "create: {id} {title:?}");
        id
    }

    /// Access a popup
    pub fn popup(&self, id: PopupId) -> Result<&Popup> {
        self.popups.get(id.0).ok_or_else(|| {
            log::error!(target: "xpop_core::popup", "invalid popup handle {id}");
            Error::InvalidPopup
        })
    }

    pub(crate) fn popup_mut(&mut self, id: PopupId) -> Result<&mut Popup> {
        self.popups.get_mut(id.0).ok_or_else(|| {
            log::error!(target: "xpop_core::popup", "invalid popup handle {id}");
            Error::InvalidPopup
        })
    }

    /// Access an entry
    pub fn entry(&self, id: EntryId) -> Result<&Entry> {
        self.entries.get(id.0).ok_or_else(|| {
            log::error!(target: "xpop_core::popup", "invalid entry handle {id}");
            Error::InvalidEntry
        })
    }

    pub(crate) fn entry_mut(&mut self, id: EntryId) -> Result<&mut Entry> {
        self.entries.get_mut(id.0).ok_or_else(|| {
            log::error!(target: "xpop_core::popup", "invalid entry handle {id}");
            Error::InvalidEntry
        })
    }

    /// True if `id` refers to a live popup
    #[inline]
    pub fn contains_popup(&self, id: PopupId) -> bool {
        self.popups.contains(id.0)
    }

    /// True if `id` refers to a live entry
    #[inline]
    pub fn contains_entry(&self, id: EntryId) -> bool {
        self.entries.contains(id.0)
    }

    /// Effective styling: that of the top parent
    pub(crate) fn style(&self, id: PopupId) -> Result<&PopupConfig> {
        let top = self.popup(id)?.top_parent;
        Ok(&self.popup(top)?.style)
    }

    /// Mark `id` and all popups linked beneath it for layout
    pub(crate) fn mark_dirty_tree(&mut self, id: PopupId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(popup) = self.popups.get_mut(id.0) else {
                continue;
            };
            popup.need_recalc = true;
            let entries = popup.entries.clone();
            stack.extend(
                entries
                    .iter()
                    .filter_map(|e| self.entries.get(e.0).and_then(|e| e.sub)),
            );
        }
    }

    /// Recompute `top_parent` for `id` and the popups linked beneath it
    pub(crate) fn update_top_parent(&mut self, id: PopupId) {
        let top = match self.popups.get(id.0).and_then(|p| p.parent) {
            Some(parent) => self
                .popups
                .get(parent.0)
                .map(|p| p.top_parent)
                .unwrap_or(id),
            None => id,
        };

        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(popup) = self.popups.get_mut(id.0) else {
                continue;
            };
            popup.top_parent = top;
            popup.need_recalc = true;
            let entries = popup.entries.clone();
            stack.extend(
                entries
                    .iter()
                    .filter_map(|e| self.entries.get(e.0).and_then(|e| e.sub)),
            );
        }
    }

    /// True if `ancestor` is `id` or one of its parents
    pub(crate) fn is_ancestor(&self, ancestor: PopupId, mut id: PopupId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.popups.get(id.0).and_then(|p| p.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// The popup containing the entry linking to `id`
    pub fn parent(&self, id: PopupId) -> Result<Option<PopupId>> {
        Ok(self.popup(id)?.parent)
    }

    /// The root of the chain `id` belongs to
    pub fn top_parent(&self, id: PopupId) -> Result<PopupId> {
        Ok(self.popup(id)?.top_parent)
    }

    /// Entries of `id`, in display order (separator lines included)
    pub fn entries(&self, id: PopupId) -> Result<&[EntryId]> {
        Ok(&self.popup(id)?.entries)
    }

    /// True while the popup's window exists
    pub fn is_shown(&self, id: PopupId) -> Result<bool> {
        Ok(self.popup(id)?.win.is_some())
    }

    /// The chain's result record (kept by the top parent)
    pub fn popup_return(&self, id: PopupId) -> Result<Option<&PopupReturn>> {
        let top = self.popup(id)?.top_parent;
        Ok(self.popup(top)?.ret.as_ref())
    }

    pub fn title(&self, id: PopupId) -> Result<Option<&str>> {
        Ok(self.popup(id)?.title.as_deref())
    }

    /// Set or clear the title, returning the old title
    pub fn set_title(&mut self, id: PopupId, title: Option<&str>) -> Result<Option<String>> {
        let popup = self.popup_mut(id)?;
        popup.need_recalc = true;
        let title = title.map(super::entry::clean_text);
        Ok(std::mem::replace(&mut popup.title, title))
    }

    pub fn title_font(&self, id: PopupId) -> Result<Font> {
        Ok(self.popup(id)?.style.title_font)
    }

    /// Set the title font, returning the old font
    ///
    /// Sub-popups are drawn with their top parent's fonts.
    pub fn set_title_font(&mut self, id: PopupId, font: Font) -> Result<Font> {
        let old = std::mem::replace(&mut self.popup_mut(id)?.style.title_font, font);
        self.mark_dirty_tree(id);
        Ok(old)
    }

    pub fn entry_font(&self, id: PopupId) -> Result<Font> {
        Ok(self.popup(id)?.style.entry_font)
    }

    /// Set the entry font, returning the old font
    pub fn set_entry_font(&mut self, id: PopupId, font: Font) -> Result<Font> {
        let old = std::mem::replace(&mut self.popup_mut(id)?.style.entry_font, font);
        self.mark_dirty_tree(id);
        Ok(old)
    }

    pub fn color(&self, id: PopupId, role: ColorRole) -> Result<Color> {
        Ok(self.popup(id)?.style.colors.get(role))
    }

    /// Set the colour of `role`, returning the old colour
    pub fn set_color(&mut self, id: PopupId, role: ColorRole, color: Color) -> Result<Color> {
        Ok(self.popup_mut(id)?.style.colors.set(role, color))
    }

    /// Border width
    pub fn bw(&self, id: PopupId) -> Result<i32> {
        Ok(self.popup(id)?.style.bw)
    }

    /// Set the border width, returning the old value
    ///
    /// Only the magnitude is used for layout; it is clamped to
    /// [`MAX_BW`](crate::config::MAX_BW).
    pub fn set_bw(&mut self, id: PopupId, bw: i32) -> Result<i32> {
        let max = crate::config::MAX_BW;
        if !(-max..=max).contains(&bw) {
            log::warn!(target: "xpop_core::popup", "set_bw: {id}: width {bw} clamped to {max}");
        }
        let old = std::mem::replace(&mut self.popup_mut(id)?.style.bw, bw.clamp(-max, max));
        self.mark_dirty_tree(id);
        Ok(old)
    }

    pub fn policy(&self, id: PopupId) -> Result<Policy> {
        Ok(self.popup(id)?.style.policy)
    }

    /// Set the button policy, returning the old one
    pub fn set_policy(&mut self, id: PopupId, policy: Policy) -> Result<Policy> {
        Ok(std::mem::replace(
            &mut self.popup_mut(id)?.style.policy,
            policy,
        ))
    }

    pub fn min_width(&self, id: PopupId) -> Result<i32> {
        Ok(self.popup(id)?.min_width)
    }

    /// Set the minimum width, returning the old value
    pub fn set_min_width(&mut self, id: PopupId, width: i32) -> Result<i32> {
        let popup = self.popup_mut(id)?;
        popup.need_recalc = true;
        Ok(std::mem::replace(&mut popup.min_width, width.max(0)))
    }

    /// Request a screen position for the next showing
    ///
    /// Negative values are measured from the right or bottom screen edge:
    /// `x = -1` places the popup's right edge one pixel left of the screen's.
    /// Pass `None` to position at the pointer. Ignored for sub-popups.
    pub fn set_position(&mut self, id: PopupId, pos: Option<Coord>) -> Result<()> {
        self.popup_mut(id)?.req_pos = pos;
        Ok(())
    }

    /// Size of the popup, laying it out first if required
    pub fn size(&mut self, id: PopupId) -> Result<Size> {
        self.recalc(id)?;
        Ok(self.popup(id)?.rect.size)
    }

    /// Set the popup-level callback, returning the old one
    pub fn set_callback(&mut self, id: PopupId, cb: Option<Callback>) -> Result<Option<Callback>> {
        Ok(std::mem::replace(&mut self.popup_mut(id)?.callback, cb))
    }

    /// Set the selection callback of an entry, returning the old one
    pub fn entry_set_callback(&mut self, id: EntryId, cb: Option<Callback>) -> Result<Option<Callback>> {
        Ok(std::mem::replace(&mut self.entry_mut(id)?.callback, cb))
    }

    /// Set the enter callback of an entry, returning the old one
    pub fn entry_set_enter_callback(
        &mut self,
        id: EntryId,
        cb: Option<Callback>,
    ) -> Result<Option<Callback>> {
        Ok(std::mem::replace(&mut self.entry_mut(id)?.enter, cb))
    }

    /// Set the leave callback of an entry, returning the old one
    pub fn entry_set_leave_callback(
        &mut self,
        id: EntryId,
        cb: Option<Callback>,
    ) -> Result<Option<Callback>> {
        Ok(std::mem::replace(&mut self.entry_mut(id)?.leave, cb))
    }

    pub fn entry_state(&self, id: EntryId) -> Result<EntryState> {
        Ok(self.entry(id)?.state)
    }

    /// Replace the state of an entry, returning the old state
    ///
    /// Checking a radio entry unchecks the other entries of its group.
    pub fn entry_set_state(&mut self, id: EntryId, state: EntryState) -> Result<EntryState> {
        let entry = self.entry_mut(id)?;
        let old = std::mem::replace(&mut entry.state, state);
        self.state_changed(id, old);
        Ok(old)
    }

    /// Set flags of an entry, returning the old state
    pub fn entry_raise_state(&mut self, id: EntryId, flags: EntryState) -> Result<EntryState> {
        let state = self.entry(id)?.state | flags;
        self.entry_set_state(id, state)
    }

    /// Clear flags of an entry, returning the old state
    pub fn entry_clear_state(&mut self, id: EntryId, flags: EntryState) -> Result<EntryState> {
        let state = self.entry(id)?.state - flags;
        self.entry_set_state(id, state)
    }

    /// Toggle flags of an entry, returning the old state
    pub fn entry_toggle_state(&mut self, id: EntryId, flags: EntryState) -> Result<EntryState> {
        let state = self.entry(id)?.state ^ flags;
        self.entry_set_state(id, state)
    }

    fn state_changed(&mut self, id: EntryId, old: EntryState) {
        let Some(entry) = self.entries.get(id.0) else {
            return;
        };
        let (popup, state, group) = (entry.popup, entry.state, entry.group);
        if entry.kind == EntryKind::Radio && entry.is_checked() {
            self.uncheck_group(popup, group, id);
        }
        if (old ^ state).intersects(EntryState::HIDDEN) {
            if let Some(p) = self.popups.get_mut(popup.0) {
                p.need_recalc = true;
            }
        }
        if !self.entries.get(id.0).is_some_and(|e| e.is_activatable()) {
            if let Some(p) = self.popups.get_mut(popup.0) {
                if p.active == Some(id) {
                    p.active = None;
                }
            }
        }
    }

    /// Uncheck all radio entries of `group` in `popup` except `keep`
    pub(crate) fn uncheck_group(&mut self, popup: PopupId, group: i32, keep: EntryId) {
        let Some(p) = self.popups.get(popup.0) else {
            return;
        };
        for id in p.entries.iter() {
            if *id == keep {
                continue;
            }
            if let Some(e) = self.entries.get_mut(id.0) {
                if e.kind == EntryKind::Radio && e.group == group {
                    e.state.remove(EntryState::CHECKED);
                }
            }
        }
    }

    /// Replace the text of an entry
    ///
    /// `text` may contain `%S` (label/accelerator splitter) and `%%`; other
    /// directives are not interpreted.
    pub fn entry_set_text(&mut self, id: EntryId, text: &str) -> Result<()> {
        let (label, accel) = super::entry::split_plain_text(text);
        let entry = self.entry_mut(id)?;
        entry.set_text_parts(&label, accel.as_deref());
        entry.ulpos = crate::event::underline_pos(&entry.label, &entry.shortcuts);
        let popup = entry.popup;
        self.popup_mut(popup)?.need_recalc = true;
        Ok(())
    }

    /// Replace the shortcuts of an entry (see [`crate::event::Shortcut::parse_list`])
    pub fn entry_set_shortcut(&mut self, id: EntryId, shortcut: &str) -> Result<()> {
        let entry = self.entry_mut(id)?;
        entry.shortcut_text = shortcut.to_string();
        entry.shortcuts = crate::event::Shortcut::parse_list(shortcut);
        entry.ulpos = crate::event::underline_pos(&entry.label, &entry.shortcuts);
        Ok(())
    }

    /// Set the value of an entry, returning the old value
    pub fn entry_set_value(&mut self, id: EntryId, value: i64) -> Result<i64> {
        Ok(std::mem::replace(&mut self.entry_mut(id)?.value, value))
    }

    /// Set the user data of an entry, returning the old data
    pub fn entry_set_user_data(
        &mut self,
        id: EntryId,
        data: Option<Rc<dyn Any>>,
    ) -> Result<Option<Rc<dyn Any>>> {
        Ok(std::mem::replace(&mut self.entry_mut(id)?.user_data, data))
    }

    /// Set the radio group of an entry, returning the old group
    ///
    /// If the entry is a checked radio entry, the rest of its new group is
    /// unchecked.
    pub fn entry_set_group(&mut self, id: EntryId, group: i32) -> Result<i32> {
        let entry = self.entry_mut(id)?;
        let old = std::mem::replace(&mut entry.group, group);
        let state = entry.state;
        self.state_changed(id, state);
        Ok(old)
    }

    /// The sub-popup linked by an entry
    pub fn entry_subpopup(&self, id: EntryId) -> Result<Option<PopupId>> {
        Ok(self.entry(id)?.sub)
    }

    /// Link (or with `None` unlink) a sub-popup, returning the old one
    ///
    /// The entry becomes (or stops being) a [`EntryKind::Sub`] entry. An
    /// unlinked sub-popup is not deleted: it becomes a top-level popup.
    pub fn entry_set_subpopup(&mut self, id: EntryId, sub: Option<PopupId>) -> Result<Option<PopupId>> {
        let entry = self.entry(id)?;
        let popup = entry.popup;
        let old = entry.sub;
        if old == sub {
            return Ok(old);
        }
        if self.popup(popup)?.win.is_some() {
            log::error!(target: "xpop_core::popup", "entry_set_subpopup: {popup} is shown");
            return Err(Error::PopupShown);
        }
        if let Some(sub) = sub {
            self.validate_sub(popup, sub)?;
        }

        if let Some(old) = old {
            self.unlink_sub(old);
        }
        let entry = self.entry_mut(id)?;
        entry.sub = sub;
        match sub {
            Some(sub) => {
                entry.kind = EntryKind::Sub;
                self.link_sub(popup, id, sub);
            }
            None => entry.kind = EntryKind::Normal,
        }
        self.popup_mut(popup)?.need_recalc = true;
        Ok(old)
    }

    /// Check that `sub` may be linked from an entry of `popup`
    pub(crate) fn validate_sub(&self, popup: PopupId, sub: PopupId) -> Result<()> {
        let fail = |msg: &'static str| {
            log::error!(target: "xpop_core::popup", "cannot link {sub} from {popup}: {msg}");
            Err(Error::BadSubPopup(msg))
        };
        let Some(target) = self.popups.get(sub.0) else {
            return fail("popup does not exist");
        };
        if target.parent.is_some() {
            return fail("popup already has a parent");
        }
        if sub == popup {
            return fail("popup would be its own sub-popup");
        }
        if self.is_ancestor(sub, popup) {
            return fail("popup is an ancestor");
        }
        if target.win.is_some() {
            return fail("popup is shown");
        }
        Ok(())
    }

    pub(crate) fn link_sub(&mut self, popup: PopupId, entry: EntryId, sub: PopupId) {
        if let Some(target) = self.popups.get_mut(sub.0) {
            target.parent = Some(popup);
            target.link = Some(entry);
        }
        self.update_top_parent(sub);
    }

    pub(crate) fn unlink_sub(&mut self, sub: PopupId) {
        if let Some(target) = self.popups.get_mut(sub.0) {
            target.parent = None;
            target.link = None;
        }
        self.update_top_parent(sub);
    }
}
