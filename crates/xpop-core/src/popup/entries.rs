// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Adding and deleting entries

use super::parse::{EntrySpec, parse_entries};
use super::{Entry, EntryArg, EntryId, EntryKind, Error, PopupId, Popups, Result};
use crate::event::{Shortcut, underline_pos};
use std::collections::HashSet;

impl Popups {
    /// Append entries to a popup
    ///
    /// `text` lists entries separated by `|`. Within an entry's text, `%`
    /// starts a directive; directives marked † consume the next value of
    /// `args`, which must be of the given [`EntryArg`] variant:
    ///
    /// | Directive | Effect |
    /// |-----------|--------|
    /// | `%x` † | set the value ([`EntryArg::Value`]) |
    /// | `%u` † | set user data ([`EntryArg::UserData`]) |
    /// | `%f` † | set the selection callback ([`EntryArg::Callback`]) |
    /// | `%E` † | set the enter callback ([`EntryArg::Callback`]) |
    /// | `%L` † | set the leave callback ([`EntryArg::Callback`]) |
    /// | `%m` † | link a sub-popup ([`EntryArg::Popup`]) |
    /// | `%l` | add a separator line above the entry |
    /// | `%t`, `%T` | toggle entry, unchecked / checked |
    /// | `%r`, `%R` † | radio entry, unchecked / checked ([`EntryArg::Group`]) |
    /// | `%d` | disabled |
    /// | `%h` | hidden |
    /// | `%s` † | shortcut string ([`EntryArg::Shortcut`]) |
    /// | `%S` | split label (left) from accelerator text (right) |
    /// | `%%` | a literal `%` |
    ///
    /// Without `%x` an entry's value is that of the popup's counter, which
    /// starts at 0 and is set to one past each new entry's value.
    ///
    /// On any error, nothing is changed. Returns the new entries (excluding
    /// separator lines).
    pub fn add_entries(&mut self, popup: PopupId, text: &str, args: &[EntryArg]) -> Result<Vec<EntryId>> {
        let index = self.popup(popup)?.entries.len();
        self.add_parsed(popup, index, text, args)
    }

    /// Insert entries after `after` (or at the front, with `None`)
    ///
    /// See [`Self::add_entries`].
    pub fn insert_entries(
        &mut self,
        popup: PopupId,
        after: Option<EntryId>,
        text: &str,
        args: &[EntryArg],
    ) -> Result<Vec<EntryId>> {
        let index = self.insert_index(popup, after)?;
        self.add_parsed(popup, index, text, args)
    }

    pub(crate) fn insert_index(&self, popup: PopupId, after: Option<EntryId>) -> Result<usize> {
        let entries = &self.popup(popup)?.entries;
        match after {
            None => Ok(0),
            Some(after) => match entries.iter().position(|e| *e == after) {
                Some(pos) => Ok(pos + 1),
                None => {
                    log::error!(target: "xpop_core::popup", "insert_entries: {after} is not in {popup}");
                    Err(Error::InvalidEntry)
                }
            },
        }
    }

    fn add_parsed(&mut self, popup: PopupId, index: usize, text: &str, args: &[EntryArg]) -> Result<Vec<EntryId>> {
        let specs = parse_entries(text, args).map_err(|err| {
            log::error!(target: "xpop_core::popup", "add_entries: {err} in {text:?}");
            Error::Parse(err)
        })?;
        self.commit(popup, index, specs)
    }

    /// Add parsed entries at `index`
    ///
    /// Sub-popup links are validated before any change is made.
    pub(crate) fn commit(&mut self, popup: PopupId, mut index: usize, specs: Vec<EntrySpec>) -> Result<Vec<EntryId>> {
        self.popup(popup)?;
        let mut seen = HashSet::new();
        for sub in specs.iter().filter_map(|s| s.sub) {
            self.validate_sub(popup, sub)?;
            if !seen.insert(sub) {
                log::error!(target: "xpop_core::popup", "add_entries: {sub} linked twice");
                return Err(Error::BadSubPopup("popup linked twice"));
            }
        }

        let mut added = Vec::with_capacity(specs.len());
        let mut checked_radio = vec![];
        for spec in specs {
            if spec.line_above {
                let line = EntryId(self.entries.insert(Entry::new(popup, EntryKind::Line)));
                self.insert_entry_at(popup, index, line)?;
                index += 1;
            }

            let id = self.create_entry(popup, spec)?;
            self.insert_entry_at(popup, index, id)?;
            index += 1;

            if let Some(sub) = self.entries.get(id.0).and_then(|e| e.sub) {
                self.link_sub(popup, id, sub);
            }
            if let Some(e) = self.entries.get(id.0) {
                if e.kind == EntryKind::Radio && e.is_checked() {
                    checked_radio.push((e.group, id));
                }
            }
            added.push(id);
        }

        // the last checked entry of each group wins
        let mut groups = HashSet::new();
        for (group, id) in checked_radio.into_iter().rev() {
            if groups.insert(group) {
                self.uncheck_group(popup, group, id);
            }
        }

        self.popup_mut(popup)?.need_recalc = true;
        log::trace!(target: "xpop_core::popup", "add_entries: {} entries to {popup}", added.len());
        Ok(added)
    }

    fn create_entry(&mut self, popup: PopupId, spec: EntrySpec) -> Result<EntryId> {
        let p = self.popup_mut(popup)?;
        let value = spec.value.unwrap_or(p.counter);
        p.counter = value.wrapping_add(1);

        let mut entry = Entry::new(popup, spec.kind);
        entry.set_text_parts(&spec.label, spec.accel.as_deref());
        entry.state = spec.state;
        entry.value = value;
        entry.user_data = spec.user_data;
        entry.group = spec.group;
        if let Some(shortcut) = spec.shortcut {
            entry.shortcuts = Shortcut::parse_list(&shortcut);
            entry.ulpos = underline_pos(&entry.label, &entry.shortcuts);
            entry.shortcut_text = shortcut;
        }
        entry.callback = spec.callback;
        entry.enter = spec.enter;
        entry.leave = spec.leave;
        entry.sub = spec.sub;
        Ok(EntryId(self.entries.insert(entry)))
    }

    fn insert_entry_at(&mut self, popup: PopupId, index: usize, id: EntryId) -> Result<()> {
        let entries = &mut self.popup_mut(popup)?.entries;
        let index = index.min(entries.len());
        entries.insert(index, id);
        Ok(())
    }

    /// Delete an entry
    ///
    /// A linked sub-popup is deleted too. Refused while the entry's popup is
    /// shown.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<()> {
        let popup = self.entry(id)?.popup;
        if self.popup(popup)?.win.is_some() {
            log::error!(target: "xpop_core::popup", "delete_entry: {popup} is shown");
            return Err(Error::PopupShown);
        }
        if let Some(sub) = self.entry(id)?.sub {
            if self.popups.get(sub.0).is_some_and(|p| p.win.is_some()) {
                log::error!(target: "xpop_core::popup", "delete_entry: sub-popup {sub} is shown");
                return Err(Error::PopupShown);
            }
        }

        self.remove_entry(id);
        Ok(())
    }

    fn remove_entry(&mut self, id: EntryId) {
        let Some(entry) = self.entries.remove(id.0) else {
            return;
        };
        if let Some(popup) = self.popups.get_mut(entry.popup.0) {
            popup.entries.retain(|e| *e != id);
            if popup.active == Some(id) {
                popup.active = None;
            }
            popup.need_recalc = true;
        }
        if let Some(sub) = entry.sub {
            self.unlink_sub(sub);
            self.remove_popup(sub);
        }
    }

    /// Delete a popup, its entries and their sub-popups
    ///
    /// Refused while shown, and for a popup linked as a sub-popup (delete or
    /// unlink the linking entry instead).
    pub fn delete_popup(&mut self, id: PopupId) -> Result<()> {
        let popup = self.popup(id)?;
        if popup.win.is_some() {
            log::error!(target: "xpop_core::popup", "delete_popup: {id} is shown");
            return Err(Error::PopupShown);
        }
        if popup.parent.is_some() {
            log::error!(target: "xpop_core::popup", "delete_popup: {id} is a sub-popup");
            return Err(Error::IsSubPopup);
        }
        let mut stack = vec![id];
        while let Some(p) = stack.pop() {
            if self.popups.get(p.0).is_some_and(|p| p.win.is_some()) {
                log::error!(target: "xpop_core::popup", "delete_popup: sub-popup {p} is shown");
                return Err(Error::PopupShown);
            }
            let entries = self.popups.get(p.0).map(|p| p.entries.clone()).unwrap_or_default();
            stack.extend(entries.iter().filter_map(|e| self.entries.get(e.0).and_then(|e| e.sub)));
        }

        self.remove_popup(id);
        Ok(())
    }

    fn remove_popup(&mut self, id: PopupId) {
        let entries = match self.popups.get(id.0) {
            Some(popup) => popup.entries.clone(),
            None => return,
        };
        for entry in entries {
            self.remove_entry(entry);
        }
        self.popups.remove(id.0);
        self.order.retain(|p| *p != id);
        log::debug!(target: "xpop_core::popup", "delete_popup: {id}");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::any::Any;
    use std::rc::Rc;

    fn labels(popups: &Popups, popup: PopupId) -> Vec<String> {
        popups
            .entries(popup)
            .unwrap()
            .iter()
            .map(|e| {
                let e = popups.entry(*e).unwrap();
                match e.kind() {
                    EntryKind::Line => "---".to_string(),
                    _ => e.label().to_string(),
                }
            })
            .collect()
    }

    #[test]
    fn add_and_insert() {
        let mut popups = Popups::new();
        let p = popups.create(None, Some("File"));
        let e = popups.add_entries(p, "New|Open|%lClose", &[]).unwrap();
        assert_eq!(e.len(), 3);
        assert_eq!(labels(&popups, p), ["New", "Open", "---", "Close"]);

        popups.insert_entries(p, Some(e[0]), "Save", &[]).unwrap();
        popups.insert_entries(p, None, "First", &[]).unwrap();
        assert_eq!(labels(&popups, p), [
            "First", "New", "Save", "Open", "---", "Close"
        ]);

        let q = popups.create(None, None);
        assert!(matches!(
            popups.insert_entries(q, Some(e[0]), "X", &[]),
            Err(Error::InvalidEntry)
        ));
    }

    #[test]
    fn values_count_up() {
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        let e = popups
            .add_entries(p, "A|%lB%x|C|D", &[EntryArg::Value(10)])
            .unwrap();
        let values: Vec<i64> = e.iter().map(|e| popups.entry(*e).unwrap().value()).collect();
        assert_eq!(values, [0, 10, 11, 12]);
        let e = popups.add_entries(p, "E", &[]).unwrap();
        assert_eq!(popups.entry(e[0]).unwrap().value(), 13);
    }

    #[test]
    fn batch_is_atomic() {
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        let sub = popups.create(None, None);
        popups.add_entries(p, "Keep", &[]).unwrap();
        let before = popups.entries(p).unwrap().to_vec();

        let r = popups.add_entries(p, "A|%lB%m|C%q", &[EntryArg::Popup(sub)]);
        assert!(matches!(r, Err(Error::Parse(_))));
        assert_eq!(popups.entries(p).unwrap(), &before[..]);
        assert_eq!(popups.parent(sub).unwrap(), None);

        // an invalid link fails before anything is added
        let r = popups.add_entries(p, "A|B%m", &[EntryArg::Popup(p)]);
        assert!(matches!(r, Err(Error::BadSubPopup(_))));
        let r = popups.add_entries(p, "A%m|B%m", &[EntryArg::Popup(sub), EntryArg::Popup(sub)]);
        assert!(matches!(r, Err(Error::BadSubPopup(_))));
        assert_eq!(popups.entries(p).unwrap(), &before[..]);
        assert_eq!(popups.parent(sub).unwrap(), None);
    }

    #[test]
    fn radio_fixup() {
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        let g = [EntryArg::Group(1), EntryArg::Group(1)];
        let e = popups.add_entries(p, "One%r|Two%R", &g).unwrap();
        assert!(!popups.entry(e[0]).unwrap().is_checked());
        assert!(popups.entry(e[1]).unwrap().is_checked());

        let e2 = popups.add_entries(p, "Three%R|Four%R", &g).unwrap();
        assert!(!popups.entry(e[1]).unwrap().is_checked());
        assert!(!popups.entry(e2[0]).unwrap().is_checked());
        assert!(popups.entry(e2[1]).unwrap().is_checked());
    }

    #[test]
    fn label_accel_round_trip() {
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        let e = popups
            .add_entries(p, "Sa\u{8}ve\tas%SCtrl+\tS|Plain", &[])
            .unwrap();
        let entry = popups.entry(e[0]).unwrap();
        assert_eq!(entry.label(), "Save as");
        assert_eq!(entry.accel(), Some("Ctrl+ S"));
        assert_eq!(popups.entry(e[1]).unwrap().accel(), None);
    }

    #[test]
    fn user_data_and_shortcut() {
        let mut popups = Popups::new();
        let p = popups.create(None, None);
        let data: Rc<dyn Any> = Rc::new("payload");
        let e = popups
            .add_entries(p, "Exit%u%s", &[
                EntryArg::UserData(data.clone()),
                EntryArg::Shortcut("#x".into()),
            ])
            .unwrap()[0];
        let entry = popups.entry(e).unwrap();
        assert!(Rc::ptr_eq(entry.user_data().unwrap(), &data));
        assert_eq!(entry.shortcut_text(), "#x");
        assert_eq!(entry.underline(), Some(1));
    }

    #[test]
    fn delete_cascades() {
        let mut popups = Popups::new();
        let root = popups.create(None, None);
        let sub = popups.create(None, None);
        let leaf = popups.create(None, None);
        popups.add_entries(sub, "Leaf%m", &[EntryArg::Popup(leaf)]).unwrap();
        let link = popups.add_entries(root, "A|Sub%m", &[EntryArg::Popup(sub)]).unwrap()[1];

        assert!(matches!(popups.delete_popup(sub), Err(Error::IsSubPopup)));

        popups.delete_entry(link).unwrap();
        assert!(!popups.contains_popup(sub));
        assert!(!popups.contains_popup(leaf));
        assert_eq!(popups.entries(root).unwrap().len(), 1);
        assert_eq!(popups.len(), 1);

        popups.delete_popup(root).unwrap();
        assert!(popups.is_empty());
        assert!(popups.iter().next().is_none());
    }
}
