// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Selection side effects and callback propagation

use super::{Callback, EntryId, EntryKind, EntryState, Error, PopupId, PopupReturn, Popups};
use super::{Response, Result};

impl Popups {
    /// Describe `entry` as a return record
    pub(crate) fn make_return(&self, entry: EntryId) -> Option<PopupReturn> {
        let e = self.entries.get(entry.0)?;
        Some(PopupReturn {
            value: e.value,
            user_data: e.user_data.clone(),
            text: e.text.clone(),
            label: e.label.clone(),
            accel: e.accel.clone(),
            entry,
            popup: e.popup,
        })
    }

    /// Overwrite the shared return record of the chain holding `entry`
    pub(crate) fn fill_ret(&mut self, entry: EntryId) -> Option<PopupReturn> {
        let ret = self.make_return(entry)?;
        self.store_ret(&ret);
        Some(ret)
    }

    fn store_ret(&mut self, ret: &PopupReturn) {
        let top = self.popups.get(ret.popup.0).map(|p| p.top_parent);
        if let Some(p) = top.and_then(|top| self.popups.get_mut(top.0)) {
            p.ret = Some(ret.clone());
        }
    }

    fn run_callback(&mut self, cb: Option<Callback>, ret: &mut PopupReturn, popup: PopupId) -> Response {
        let Some(cb) = cb else {
            return Response::Continue;
        };
        ret.popup = popup;
        self.store_ret(ret);
        log::trace!(target: "xpop_core::popup", "dispatch: callback of {popup} for {}", ret.entry);
        cb(ret, self)
    }

    /// Apply the selection of `entry`
    ///
    /// Toggle entries flip their check mark; radio entries become checked
    /// (unchecking the rest of their group). Then callbacks run from the
    /// entry outward: the entry's own callback, then for each popup up the
    /// chain its popup callback followed by the callback of the entry
    /// linking it into its parent. [`PopupReturn::popup`] names the popup
    /// whose callback is running.
    ///
    /// Returns `None` if a callback answered [`Response::Ignore`].
    pub(crate) fn dispatch(&mut self, entry: EntryId) -> Result<Option<PopupReturn>> {
        let e = self.entry(entry)?;
        let (popup, kind, callback) = (e.popup, e.kind, e.callback.clone());
        match kind {
            EntryKind::Toggle => {
                self.entry_toggle_state(entry, EntryState::CHECKED)?;
            }
            EntryKind::Radio => {
                self.entry_raise_state(entry, EntryState::CHECKED)?;
            }
            _ => (),
        }

        let Some(mut ret) = self.fill_ret(entry) else {
            return Err(Error::InvalidEntry);
        };
        log::debug!(target: "xpop_core::popup", "dispatch: selected {entry} ({:?}) of {popup}", ret.label);

        if self.run_callback(callback, &mut ret, popup) == Response::Ignore {
            return Ok(None);
        }

        // callbacks may delete anything; stop where the chain is broken
        let mut current = popup;
        while let Some(p) = self.popups.get(current.0) {
            let (cb, parent, link) = (p.callback.clone(), p.parent, p.link);
            if self.run_callback(cb, &mut ret, current) == Response::Ignore {
                return Ok(None);
            }

            let Some(parent) = parent else {
                break;
            };
            let link_cb = link.and_then(|l| self.entries.get(l.0)).and_then(|l| l.callback.clone());
            if self.run_callback(link_cb, &mut ret, parent) == Response::Ignore {
                return Ok(None);
            }
            current = parent;
        }

        ret.popup = popup;
        self.store_ret(&ret);
        Ok(Some(ret))
    }
}
