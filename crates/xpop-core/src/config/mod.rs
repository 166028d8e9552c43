// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Configuration items and utilities
//!
//! [`Config`] holds the default styling of new popups ([`PopupConfig`]) and
//! the tuning of the modal loop ([`EventConfig`]). With feature `serde` it
//! may be read from and written to a file, see [`Options::from_env`].

mod config;
pub use config::Config;

mod event;
pub use event::EventConfig;

mod format;
pub use format::{Error, Format};

mod options;
pub use options::{ConfigMode, Options};

mod popup;
pub use popup::{MAX_BW, Policy, PopupConfig};
