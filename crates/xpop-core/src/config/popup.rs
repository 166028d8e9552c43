// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Popup style defaults

use crate::draw::color::Palette;
use crate::text::Font;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Button handling policy of a popup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Policy {
    /// A button release away from any entry is ignored
    ///
    /// The popup stays open, allowing click-then-click selection.
    #[default]
    NormalSelect,
    /// A button release away from any entry closes the popup
    ///
    /// This suits press-drag-release menus.
    DragSelect,
}

/// Largest border width magnitude; wider borders are clamped
pub const MAX_BW: i32 = 64;

/// Styling copied into each new popup
///
/// This is serializable (using `feature = "serde"`) with the following fields:
///
/// > `policy`: [`Policy`] \
/// > `bw`: `i32` (border width, pixels) \
/// > `colors`: [`Palette`] \
/// > `title_font`: [`Font`] \
/// > `entry_font`: [`Font`]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PopupConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy: Policy,

    #[cfg_attr(feature = "serde", serde(default = "defaults::bw"))]
    pub bw: i32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub colors: Palette,

    #[cfg_attr(feature = "serde", serde(default = "defaults::title_font"))]
    pub title_font: Font,

    #[cfg_attr(feature = "serde", serde(default))]
    pub entry_font: Font,
}

impl Default for PopupConfig {
    fn default() -> Self {
        PopupConfig {
            policy: Policy::default(),
            bw: defaults::bw(),
            colors: Palette::default(),
            title_font: defaults::title_font(),
            entry_font: Font::default(),
        }
    }
}

impl PopupConfig {
    /// `bw`, clamped to `-MAX_BW..=MAX_BW`
    ///
    /// A negative width draws a sunken frame.
    pub fn frame_bw(&self) -> i32 {
        self.bw.clamp(-MAX_BW, MAX_BW)
    }

    /// Border thickness in pixels
    pub fn border(&self) -> i32 {
        self.frame_bw().abs()
    }
}

mod defaults {
    use crate::text::{Font, FontStyle};

    pub fn bw() -> i32 {
        1
    }
    pub fn title_font() -> Font {
        Font::new(FontStyle::Bold, Font::NORMAL_SIZE)
    }
}
