// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Popup entries

use super::{Callback, PopupId};
use crate::event::Shortcuts;
use crate::geom::Rect;
use bitflags::bitflags;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Kind of an entry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A plain, selectable entry
    #[default]
    Normal,
    /// A check box: selecting it flips [`EntryState::CHECKED`]
    Toggle,
    /// A radio button: selecting it checks it and unchecks its group
    Radio,
    /// Opens a sub-popup; cannot be selected itself
    Sub,
    /// A separator line
    Line,
}

bitflags! {
    /// State flags of an entry
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntryState: u8 {
        /// Shown greyed out; cannot be activated
        const DISABLED = 1 << 0;
        /// Not shown and takes no space
        const HIDDEN = 1 << 1;
        /// Check or radio mark is set
        const CHECKED = 1 << 2;
    }
}

/// One line of a popup
///
/// Entries are owned by [`Popups`](super::Popups) and are read through
/// [`Popups::entry`](super::Popups::entry).
pub struct Entry {
    pub(crate) popup: PopupId,
    pub(crate) text: String,
    pub(crate) label: String,
    pub(crate) accel: Option<String>,
    pub(crate) kind: EntryKind,
    pub(crate) state: EntryState,
    pub(crate) value: i64,
    pub(crate) user_data: Option<Rc<dyn Any>>,
    pub(crate) group: i32,
    pub(crate) shortcut_text: String,
    pub(crate) shortcuts: Shortcuts,
    pub(crate) ulpos: Option<usize>,
    pub(crate) callback: Option<Callback>,
    pub(crate) enter: Option<Callback>,
    pub(crate) leave: Option<Callback>,
    pub(crate) sub: Option<PopupId>,
    pub(crate) rect: Rect,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("popup", &self.popup)
            .field("text", &self.text)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("value", &self.value)
            .field("group", &self.group)
            .field("sub", &self.sub)
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

impl Entry {
    pub(crate) fn new(popup: PopupId, kind: EntryKind) -> Self {
        Entry {
            popup,
            text: String::new(),
            label: String::new(),
            accel: None,
            kind,
            state: EntryState::empty(),
            value: 0,
            user_data: None,
            group: 0,
            shortcut_text: String::new(),
            shortcuts: Shortcuts::new(),
            ulpos: None,
            callback: None,
            enter: None,
            leave: None,
            sub: None,
            rect: Rect::ZERO,
        }
    }

    /// Set `text`, `label` and `accel` from label and accelerator parts
    ///
    /// Backspace characters are removed and tabs replaced by spaces.
    pub(crate) fn set_text_parts(&mut self, label: &str, accel: Option<&str>) {
        self.label = clean_text(label);
        self.accel = accel.map(clean_text);
        self.text = match &self.accel {
            Some(accel) => format!("{}%S{}", self.label.replace('%', "%%"), accel.replace('%', "%%")),
            None => self.label.replace('%', "%%"),
        };
    }

    /// The popup this entry belongs to
    #[inline]
    pub fn popup(&self) -> PopupId {
        self.popup
    }

    /// Entry text, in the form accepted by
    /// [`Popups::entry_set_text`](super::Popups::entry_set_text)
    ///
    /// This is the label followed by `%S` and the accelerator text, if any.
    /// Literal `%` characters are doubled.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The label: text left of the `%S` splitter
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The accelerator text: right of the `%S` splitter
    #[inline]
    pub fn accel(&self) -> Option<&str> {
        self.accel.as_deref()
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> EntryState {
        self.state
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    #[inline]
    pub fn user_data(&self) -> Option<&Rc<dyn Any>> {
        self.user_data.as_ref()
    }

    /// Radio group (only meaningful for [`EntryKind::Radio`])
    #[inline]
    pub fn group(&self) -> i32 {
        self.group
    }

    /// The shortcut string, as given
    #[inline]
    pub fn shortcut_text(&self) -> &str {
        &self.shortcut_text
    }

    /// Parsed shortcuts
    #[inline]
    pub fn shortcuts(&self) -> &[crate::event::Shortcut] {
        &self.shortcuts
    }

    /// Index of the underlined grapheme of the label
    #[inline]
    pub fn underline(&self) -> Option<usize> {
        self.ulpos
    }

    /// The linked sub-popup
    #[inline]
    pub fn sub(&self) -> Option<PopupId> {
        self.sub
    }

    /// Layout box, relative to the popup (valid after layout)
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn is_checked(&self) -> bool {
        self.state.contains(EntryState::CHECKED)
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.state.contains(EntryState::HIDDEN)
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.state.contains(EntryState::DISABLED)
    }

    /// True unless a separator, hidden or disabled
    pub fn is_activatable(&self) -> bool {
        self.kind != EntryKind::Line
            && !self
                .state
                .intersects(EntryState::HIDDEN | EntryState::DISABLED)
    }

    /// True if activatable and not a sub-popup link
    pub fn is_selectable(&self) -> bool {
        self.is_activatable() && self.kind != EntryKind::Sub
    }
}

pub(crate) fn clean_text(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '\u{8}')
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect()
}

/// Split `%S`, unescape `%%`; other `%` sequences are kept literally
pub(crate) fn split_plain_text(text: &str) -> (String, Option<String>) {
    let mut parts = [String::new(), String::new()];
    let mut split = false;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        let out = &mut parts[usize::from(split)];
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('S') if !split => split = true,
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    let [label, accel] = parts;
    (label, split.then_some(accel))
}
