// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! xpop core
//!
//! This crate implements the popup (menu) engine:
//!
//! -   [`popup::Popups`] is the registry of popups and their entries
//! -   [`runner::Runner`] owns a registry plus a [`backend::Backend`] and
//!     runs the modal interaction ([`runner::Runner::do_popup`])
//! -   [`backend::headless`] provides a scripted backend for tests and demos
//!
//! The [easy-cast](https://docs.rs/easy-cast/0.5/easy_cast) library is
//! re-exported as `cast`.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub extern crate easy_cast as cast;

pub mod backend;
pub mod config;
pub mod draw;
pub mod event;
pub mod geom;
pub mod popup;
pub mod runner;
pub mod text;
pub mod util;

pub use popup::{EntryId, PopupId, Popups};
pub use runner::Runner;
