// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Entry lookup

use super::{Entry, EntryId, EntryKind, PopupId, Popups, Result};
use crate::geom::Coord;
use std::any::Any;
use std::rc::Rc;

impl Popups {
    /// Depth-first search of `popup` and its sub-popups
    ///
    /// Each entry is tested before descending into its sub-popup.
    fn find_entry(&self, popup: PopupId, f: &dyn Fn(&Entry) -> bool) -> Result<Option<EntryId>> {
        let mut stack = vec![self.popup(popup)?.entries.iter()];
        while let Some(iter) = stack.last_mut() {
            let Some(id) = iter.next() else {
                stack.pop();
                continue;
            };
            let Some(entry) = self.entries.get(id.0) else {
                continue;
            };
            if entry.kind != EntryKind::Line && f(entry) {
                return Ok(Some(*id));
            }
            if let Some(sub) = entry.sub.and_then(|sub| self.popups.get(sub.0)) {
                stack.push(sub.entries.iter());
            }
        }
        Ok(None)
    }

    /// Find the `n`-th entry of `popup`
    ///
    /// Separator lines are not counted; hidden entries are. Sub-popups are
    /// not searched.
    pub fn entry_by_position(&self, popup: PopupId, n: usize) -> Result<Option<EntryId>> {
        Ok(self
            .popup(popup)?
            .entries
            .iter()
            .filter(|id| {
                self.entries
                    .get(id.0)
                    .is_some_and(|e| e.kind != EntryKind::Line)
            })
            .nth(n)
            .copied())
    }

    /// Find the first entry with the given value, searching sub-popups
    pub fn entry_by_value(&self, popup: PopupId, value: i64) -> Result<Option<EntryId>> {
        self.find_entry(popup, &|e| e.value == value)
    }

    /// Find the first entry with the given user data (compared by pointer)
    pub fn entry_by_user_data(&self, popup: PopupId, data: &Rc<dyn Any>) -> Result<Option<EntryId>> {
        self.find_entry(popup, &|e| {
            e.user_data.as_ref().is_some_and(|u| Rc::ptr_eq(u, data))
        })
    }

    /// Find the first entry with the given text (see [`Entry::text`])
    pub fn entry_by_text(&self, popup: PopupId, text: &str) -> Result<Option<EntryId>> {
        self.find_entry(popup, &|e| e.text == text)
    }

    /// Find the first entry with the given label
    pub fn entry_by_label(&self, popup: PopupId, label: &str) -> Result<Option<EntryId>> {
        self.find_entry(popup, &|e| e.label == label)
    }

    /// Find the visible entry at `pos` (relative to the popup)
    ///
    /// Separator lines are never returned; disabled entries are. The popup
    /// is laid out first if required.
    pub fn entry_at(&mut self, popup: PopupId, pos: Coord) -> Result<Option<EntryId>> {
        self.recalc(popup)?;
        Ok(self.entry_at_laid_out(popup, pos))
    }

    pub(crate) fn entry_at_laid_out(&self, popup: PopupId, pos: Coord) -> Option<EntryId> {
        let popup = self.popups.get(popup.0)?;
        popup.entries.iter().copied().find(|id| {
            self.entries.get(id.0).is_some_and(|e| {
                e.kind != EntryKind::Line && !e.is_hidden() && e.rect.contains(pos)
            })
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::popup::EntryArg;

    #[test]
    fn search_recurses() {
        let mut popups = Popups::new();
        let root = popups.create(None, None);
        let sub = popups.create(None, None);
        let data: Rc<dyn Any> = Rc::new(1u8);
        let deep = popups
            .add_entries(sub, "Deep%x%u|Other", &[
                EntryArg::Value(7),
                EntryArg::UserData(data.clone()),
            ])
            .unwrap()[0];
        let e = popups
            .add_entries(root, "A|%lB%m|C%SX", &[EntryArg::Popup(sub)])
            .unwrap();

        assert_eq!(popups.entry_by_value(root, 7).unwrap(), Some(deep));
        assert_eq!(popups.entry_by_user_data(root, &data).unwrap(), Some(deep));
        assert!(popups.entry_by_label(root, "Other").unwrap().is_some());
        assert_eq!(popups.entry_by_text(root, "C%SX").unwrap(), Some(e[2]));
        assert_eq!(popups.entry_by_label(root, "C").unwrap(), Some(e[2]));
        assert_eq!(popups.entry_by_label(root, "Missing").unwrap(), None);

        // position skips the separator and does not recurse
        assert_eq!(popups.entry_by_position(root, 1).unwrap(), Some(e[1]));
        assert_eq!(popups.entry_by_position(root, 2).unwrap(), Some(e[2]));
        assert_eq!(popups.entry_by_position(root, 3).unwrap(), None);
        // the value counter of `root` starts at zero: A is 0
        assert_eq!(popups.entry_by_value(root, 0).unwrap(), Some(e[0]));
    }
}
