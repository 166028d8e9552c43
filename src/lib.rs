// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! xpop: popup menus for X11-style toolkits
//!
//! This, the main xpop crate, is merely a wrapper over [`xpop_core`]. All
//! items from [`xpop_core`] are directly re-exported from this crate
//! (e.g. [`xpop::geom::Size`](crate::geom::Size)).
//!
//! A popup is a (possibly titled) list of entries, built through
//! [`Popups`] from directive strings or [`popup::PopupItem`] trees. A
//! [`Runner`] shows a popup on a [`backend::Backend`], grabs input and
//! blocks until an entry is selected or the popup is cancelled.
//!
//! The [easy-cast](https://docs.rs/easy-cast/0.5/easy_cast) library is
//! re-exported as `xpop::cast`.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod prelude;

pub use xpop_core::*;
