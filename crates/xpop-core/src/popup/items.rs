// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Structured entry definitions

use super::entry::split_plain_text;
use super::parse::EntrySpec;
use super::{Callback, EntryId, EntryKind, EntryState, PopupId, Popups, Result};
use crate::backend::WindowHandle;
use std::fmt;

/// A structured entry definition
///
/// This is the alternative to the directive strings of
/// [`Popups::add_entries`]. A leading `_` in `text` puts a separator line
/// above the entry; `%S` splits label from accelerator text and `%%` is a
/// literal `%`. Items of kind [`EntryKind::Sub`] become a new sub-popup
/// holding their `items`.
///
/// ```
/// use xpop_core::popup::{PopupItem, Popups};
///
/// let mut popups = Popups::new();
/// let p = popups
///     .create_from_items(None, Some("File"), &[
///         PopupItem::new("Open%S^O").shortcut("^O"),
///         PopupItem::new("Recent").sub(vec![PopupItem::new("a.txt"), PopupItem::new("b.txt")]),
///         PopupItem::new("_Quit"),
///     ])
///     .unwrap();
/// assert_eq!(popups.entries(p).unwrap().len(), 4);
/// ```
#[derive(Clone, Default)]
pub struct PopupItem {
    pub text: String,
    pub callback: Option<Callback>,
    pub shortcut: Option<String>,
    pub kind: EntryKind,
    pub state: EntryState,
    /// Radio group
    pub group: i32,
    /// Items of the sub-popup (for [`EntryKind::Sub`])
    pub items: Vec<PopupItem>,
}

impl fmt::Debug for PopupItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupItem")
            .field("text", &self.text)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .field("shortcut", &self.shortcut)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("group", &self.group)
            .field("items", &self.items)
            .finish()
    }
}

impl PopupItem {
    /// A normal entry
    pub fn new(text: impl ToString) -> Self {
        PopupItem {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn callback(mut self, cb: Callback) -> Self {
        self.callback = Some(cb);
        self
    }

    #[must_use]
    pub fn shortcut(mut self, shortcut: impl ToString) -> Self {
        self.shortcut = Some(shortcut.to_string());
        self
    }

    /// Make this a toggle entry
    #[must_use]
    pub fn toggle(mut self) -> Self {
        self.kind = EntryKind::Toggle;
        self
    }

    /// Make this a radio entry of `group`
    #[must_use]
    pub fn radio(mut self, group: i32) -> Self {
        self.kind = EntryKind::Radio;
        self.group = group;
        self
    }

    #[must_use]
    pub fn checked(mut self) -> Self {
        self.state.insert(EntryState::CHECKED);
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.state.insert(EntryState::DISABLED);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.state.insert(EntryState::HIDDEN);
        self
    }

    /// Make this a sub-popup entry holding `items`
    #[must_use]
    pub fn sub(mut self, items: Vec<PopupItem>) -> Self {
        self.kind = EntryKind::Sub;
        self.items = items;
        self
    }
}

impl Popups {
    /// Create a popup holding `items`
    pub fn create_from_items(
        &mut self,
        owner: Option<WindowHandle>,
        title: Option<&str>,
        items: &[PopupItem],
    ) -> Result<PopupId> {
        let popup = self.create(owner, title);
        if let Err(err) = self.add_items(popup, items) {
            self.delete_popup(popup).ok();
            return Err(err);
        }
        Ok(popup)
    }

    /// Append entries defined by `items`
    ///
    /// As with [`Self::add_entries`], nothing is changed on error. Returns
    /// the new entries (excluding separator lines) of `popup` itself.
    pub fn add_items(&mut self, popup: PopupId, items: &[PopupItem]) -> Result<Vec<EntryId>> {
        let index = self.popup(popup)?.entries.len();
        self.commit_items(popup, index, items)
    }

    /// Insert entries defined by `items` after `after` (or at the front)
    pub fn insert_items(
        &mut self,
        popup: PopupId,
        after: Option<EntryId>,
        items: &[PopupItem],
    ) -> Result<Vec<EntryId>> {
        let index = self.insert_index(popup, after)?;
        self.commit_items(popup, index, items)
    }

    fn commit_items(&mut self, popup: PopupId, index: usize, items: &[PopupItem]) -> Result<Vec<EntryId>> {
        let owner = self.popup(popup)?.owner;
        let mut children = vec![];
        let result = self
            .item_specs(owner, items, &mut children)
            .and_then(|specs| self.commit(popup, index, specs));
        if result.is_err() {
            self.discard(children);
        }
        result
    }

    /// Build entry specs, creating a sub-popup for each sub item
    ///
    /// New sub-popups are pushed to `children`, still unlinked.
    fn item_specs(
        &mut self,
        owner: Option<WindowHandle>,
        items: &[PopupItem],
        children: &mut Vec<PopupId>,
    ) -> Result<Vec<EntrySpec>> {
        let mut specs = Vec::with_capacity(items.len());
        for item in items {
            if item.kind == EntryKind::Line {
                log::warn!(target: "xpop_core::popup", "add_items: ignoring item of kind Line; use a '_' prefix");
                continue;
            }

            let (line_above, text) = match item.text.strip_prefix('_') {
                Some(rest) => (true, rest),
                None => (false, item.text.as_str()),
            };
            let (label, accel) = split_plain_text(text);

            let sub = if item.kind == EntryKind::Sub {
                let child = self.create(owner, None);
                children.push(child);
                let mut grandchildren = vec![];
                let result = self
                    .item_specs(owner, &item.items, &mut grandchildren)
                    .and_then(|specs| self.commit(child, 0, specs));
                if let Err(err) = result {
                    self.discard(grandchildren);
                    return Err(err);
                }
                Some(child)
            } else {
                None
            };

            specs.push(EntrySpec {
                line_above,
                label,
                accel,
                kind: item.kind,
                state: item.state,
                group: item.group,
                shortcut: item.shortcut.clone(),
                callback: item.callback.clone(),
                sub,
                ..Default::default()
            });
        }
        Ok(specs)
    }

    fn discard(&mut self, children: Vec<PopupId>) {
        for child in children {
            self.delete_popup(child).ok();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nested_items() {
        let mut popups = Popups::new();
        let p = popups
            .create_from_items(None, Some("Edit"), &[
                PopupItem::new("Undo%S^Z").shortcut("^Z"),
                PopupItem::new("_Wrap").toggle().checked(),
                PopupItem::new("Mode").sub(vec![
                    PopupItem::new("Insert").radio(1).checked(),
                    PopupItem::new("Overwrite").radio(1).checked(),
                    PopupItem::new("More").sub(vec![PopupItem::new("Deep")]),
                ]),
            ])
            .unwrap();
        assert_eq!(popups.len(), 3);

        let undo = popups.entry_by_label(p, "Undo").unwrap().unwrap();
        assert_eq!(popups.entry(undo).unwrap().accel(), Some("^Z"));
        assert_eq!(popups.entry(undo).unwrap().shortcuts().len(), 1);

        let entries = popups.entries(p).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(popups.entry(entries[1]).unwrap().kind(), EntryKind::Line);

        let mode = popups.entry_by_label(p, "Mode").unwrap().unwrap();
        let sub = popups.entry_subpopup(mode).unwrap().unwrap();
        assert_eq!(popups.parent(sub).unwrap(), Some(p));
        let insert = popups.entry_by_label(p, "Insert").unwrap().unwrap();
        let overwrite = popups.entry_by_label(p, "Overwrite").unwrap().unwrap();
        assert!(!popups.entry(insert).unwrap().is_checked());
        assert!(popups.entry(overwrite).unwrap().is_checked());

        let deep = popups.entry_by_label(p, "Deep").unwrap().unwrap();
        let deep_popup = popups.entry(deep).unwrap().popup();
        assert_eq!(popups.top_parent(deep_popup).unwrap(), p);
    }

    #[test]
    fn insert_and_errors() {
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        let keep = popups.add_items(p, &[PopupItem::new("Keep")]).unwrap()[0];

        let line = PopupItem {
            kind: EntryKind::Line,
            ..PopupItem::new("ignored")
        };
        let ids = popups
            .insert_items(p, None, &[line, PopupItem::new("First").disabled()])
            .unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(popups.entries(p).unwrap(), &[ids[0], keep]);
        assert!(popups.entry(ids[0]).unwrap().is_disabled());

        let other = popups.create(None, None);
        let foreign = popups.add_entries(other, "Foreign", &[]).unwrap()[0];
        let bad = PopupItem::new("Bad").sub(vec![PopupItem::new("Nested")]);
        assert!(popups.insert_items(p, Some(foreign), &[bad.clone()]).is_err());
        assert_eq!(popups.len(), 2);

        popups.add_items(p, &[bad]).unwrap();
        assert_eq!(popups.len(), 3);
    }
}
