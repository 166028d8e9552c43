// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Selection result

use super::{EntryId, PopupId};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Details of an activated or selected entry
///
/// One record exists per popup chain (it is kept by the chain's top parent,
/// see [`Popups::popup_return`](super::Popups::popup_return)). It is
/// overwritten whenever an entry becomes active and when an entry is
/// selected, and is passed to every callback.
#[derive(Clone)]
pub struct PopupReturn {
    pub value: i64,
    pub user_data: Option<Rc<dyn Any>>,
    pub text: String,
    pub label: String,
    pub accel: Option<String>,
    /// The entry
    pub entry: EntryId,
    /// The popup whose callback is running
    ///
    /// Outside of callbacks, this is the popup of [`Self::entry`].
    pub popup: PopupId,
}

impl fmt::Debug for PopupReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupReturn")
            .field("value", &self.value)
            .field("user_data", &self.user_data.as_ref().map(|_| ".."))
            .field("text", &self.text)
            .field("label", &self.label)
            .field("accel", &self.accel)
            .field("entry", &self.entry)
            .field("popup", &self.popup)
            .finish()
    }
}

impl PopupReturn {
    /// Downcast the user data
    pub fn user_data<T: 'static>(&self) -> Option<&T> {
        self.user_data.as_ref().and_then(|u| u.downcast_ref())
    }
}
