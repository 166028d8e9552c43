// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! The popup record

use super::{Callback, EntryId, PopupId, PopupReturn};
use crate::backend::WindowHandle;
use crate::config::PopupConfig;
use crate::geom::{Coord, Rect, Size};
use std::fmt;

/// A popup: a titled, ordered list of entries
///
/// Popups are owned by [`Popups`](super::Popups) and are read through
/// [`Popups::popup`](super::Popups::popup).
pub struct Popup {
    pub(crate) owner: Option<WindowHandle>,
    pub(crate) title: Option<String>,
    pub(crate) entries: Vec<EntryId>,
    /// Popup holding the entry which links to this one
    pub(crate) parent: Option<PopupId>,
    /// The linking entry (in `parent`)
    pub(crate) link: Option<EntryId>,
    pub(crate) top_parent: PopupId,
    pub(crate) style: PopupConfig,
    pub(crate) min_width: i32,
    pub(crate) req_pos: Option<Coord>,
    pub(crate) callback: Option<Callback>,
    pub(crate) counter: i64,

    pub(crate) need_recalc: bool,
    /// Screen rect (size valid after layout, position while shown)
    pub(crate) rect: Rect,
    pub(crate) title_box: Rect,
    pub(crate) gutter_left: i32,
    pub(crate) gutter_right: i32,

    /// The realized window, while shown
    pub(crate) win: Option<WindowHandle>,
    /// Rect last sent to the window system
    pub(crate) configured: Rect,
    pub(crate) active: Option<EntryId>,
    pub(crate) last_shift: Option<u32>,
    /// Chain result record; only used on top parents
    pub(crate) ret: Option<PopupReturn>,
}

impl fmt::Debug for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popup")
            .field("title", &self.title)
            .field("entries", &self.entries)
            .field("parent", &self.parent)
            .field("top_parent", &self.top_parent)
            .field("rect", &self.rect)
            .field("win", &self.win)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Popup {
    pub(crate) fn new(
        id: PopupId,
        owner: Option<WindowHandle>,
        title: Option<&str>,
        style: PopupConfig,
    ) -> Self {
        Popup {
            owner,
            title: title.map(super::entry::clean_text),
            entries: vec![],
            parent: None,
            link: None,
            top_parent: id,
            style,
            min_width: 0,
            req_pos: None,
            callback: None,
            counter: 0,
            need_recalc: true,
            rect: Rect::ZERO,
            title_box: Rect::ZERO,
            gutter_left: 0,
            gutter_right: 0,
            win: None,
            configured: Rect::ZERO,
            active: None,
            last_shift: None,
            ret: None,
        }
    }

    /// The application window this popup belongs to
    #[inline]
    pub fn owner(&self) -> Option<WindowHandle> {
        self.owner
    }

    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Entries, in display order
    #[inline]
    pub fn entries(&self) -> &[EntryId] {
        &self.entries
    }

    /// The popup containing the entry linking to this one
    #[inline]
    pub fn parent(&self) -> Option<PopupId> {
        self.parent
    }

    /// The entry linking to this popup
    #[inline]
    pub fn link(&self) -> Option<EntryId> {
        self.link
    }

    /// The root of this popup's chain (itself when not a sub-popup)
    #[inline]
    pub fn top_parent(&self) -> PopupId {
        self.top_parent
    }

    /// Own styling
    ///
    /// A sub-popup is drawn using its top parent's styling.
    #[inline]
    pub fn style(&self) -> &PopupConfig {
        &self.style
    }

    /// Screen rect
    ///
    /// The size is valid after layout; the position while shown.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.rect.size
    }

    /// Title box, relative to the popup
    #[inline]
    pub fn title_box(&self) -> Rect {
        self.title_box
    }

    /// The realized window
    #[inline]
    pub fn window(&self) -> Option<WindowHandle> {
        self.win
    }

    #[inline]
    pub fn is_shown(&self) -> bool {
        self.win.is_some()
    }

    /// The active (highlighted) entry
    #[inline]
    pub fn active(&self) -> Option<EntryId> {
        self.active
    }
}
