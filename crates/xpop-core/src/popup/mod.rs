// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Popups (menus)
//!
//! A popup is a transient, override-redirect window showing a title and an
//! ordered list of entries. Entries may be plain, toggles, radio buttons,
//! separator lines, or links to sub-popups, which together form a *chain*
//! rooted at the *top parent*.
//!
//! [`Popups`] is the registry holding all popups and entries, addressed by
//! generation-checked [`PopupId`] and [`EntryId`] handles. The modal
//! interaction itself is run by [`Runner`](crate::Runner).
//!
//! ```
//! use xpop_core::popup::{EntryArg, Popups};
//!
//! let mut popups = Popups::new();
//! let file = popups.create(None, Some("File"));
//! let entries = popups
//!     .add_entries(file, "New|Open%S^O%s|%lQuit%x", &[
//!         EntryArg::Shortcut("^O".into()),
//!         EntryArg::Value(99),
//!     ])
//!     .unwrap();
//! // three entries plus one separator line
//! assert_eq!(entries.len(), 3);
//! assert_eq!(popups.entries(file).unwrap().len(), 4);
//! assert_eq!(popups.entry(entries[1]).unwrap().accel(), Some("^O"));
//! assert_eq!(popups.entry(entries[2]).unwrap().value(), 99);
//! ```

mod arena;
mod dispatch;
mod entries;
mod entry;
mod find;
mod interact;
mod items;
pub mod layout;
mod parse;
mod popup;
mod registry;
mod ret;
mod window;

use crate::backend::{BackendError, GrabError};
use std::rc::Rc;
use thiserror::Error;

pub use crate::config::Policy;
pub use arena::{EntryId, PopupId};
pub use entry::{Entry, EntryKind, EntryState};
pub(crate) use interact::Interaction;
pub use interact::State;
pub use items::PopupItem;
pub use parse::{EntryArg, ParseError, ParseErrorKind};
pub use popup::Popup;
pub use registry::Popups;
pub use ret::PopupReturn;

/// Result of a callback
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Response {
    /// Carry on: run the next callback up the chain
    #[default]
    Continue,
    /// Stop propagation; a selection resolves to "nothing selected"
    Ignore,
}

/// A callback
///
/// Callbacks receive the chain's [`PopupReturn`] and the registry, which
/// they may modify (even deleting popups). Construct with [`callback`].
pub type Callback = Rc<dyn Fn(&PopupReturn, &mut Popups) -> Response>;

/// Construct a [`Callback`]
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&PopupReturn, &mut Popups) -> Response + 'static,
{
    Rc::new(f)
}

/// Popup errors
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid popup handle")]
    InvalidPopup,
    #[error("invalid entry handle")]
    InvalidEntry,
    #[error("failed to parse entries")]
    Parse(#[from] ParseError),
    #[error("bad sub-popup link: {0}")]
    BadSubPopup(&'static str),
    #[error("popup is shown")]
    PopupShown,
    #[error("popup is not shown")]
    NotShown,
    #[error("popup is linked as a sub-popup")]
    IsSubPopup,
    #[error("failed to grab input")]
    Grab(#[from] GrabError),
    #[error("backend failure")]
    Backend(#[from] BackendError),
}

/// Popup result type
pub type Result<T, E = Error> = std::result::Result<T, E>;
