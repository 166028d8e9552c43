// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Drawing
//!
//! Popups are painted by building a display list of [`DrawCmd`] values in
//! popup-local coordinates which is handed to
//! [`Backend::paint`](crate::backend::Backend::paint). How each command is
//! rasterised is up to the backend.

pub mod color;

use crate::geom::{Coord, Rect};
use crate::text::Font;
use color::Color;

/// A single drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// Fill a rect with a solid colour
    Fill { rect: Rect, color: Color },
    /// Draw a raised bevelled frame of width `bw` inside `rect`
    Frame { rect: Rect, bw: i32, color: Color },
    /// Draw a horizontal separator
    Separator { from: Coord, width: i32, color: Color },
    /// Draw text with its top-left corner at `pos`
    ///
    /// When `underline` is set, the grapheme with that index is underlined.
    Text {
        pos: Coord,
        text: String,
        font: Font,
        color: Color,
        underline: Option<usize>,
    },
    /// A check box mark for toggle entries
    CheckMark {
        rect: Rect,
        checked: bool,
        color: Color,
    },
    /// A diamond mark for radio entries
    RadioMark {
        rect: Rect,
        checked: bool,
        color: Color,
    },
    /// A right-pointing arrow for sub-popup entries
    SubArrow { rect: Rect, color: Color },
}
