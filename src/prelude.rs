// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! xpop prelude
//!
//! This module allows convenient importation of common unambiguous items:
//! ```
//! use xpop::prelude::*;
//! ```

#[doc(no_inline)]
pub use xpop_core::backend::Backend;
#[doc(no_inline)]
pub use xpop_core::event::{Key, Modifiers};
#[doc(no_inline)]
pub use xpop_core::geom::{Coord, Rect, Size};
#[doc(no_inline)]
pub use xpop_core::popup::{
    callback, EntryArg, EntryId, EntryKind, EntryState, Policy, PopupId, PopupItem, PopupReturn,
    Popups, Response,
};
#[doc(no_inline)]
pub use xpop_core::Runner;
