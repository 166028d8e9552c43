// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Colours and the popup palette

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An opaque 8-bit sRGB colour
///
/// Parses from the X11 colour-spec forms `#RGB`, `#RRGGBB` and
/// `rgb:R/G/B` (each component one or two hex digits), and displays as
/// `#RRGGBB`:
/// ```
/// use xpop_core::draw::color::Color;
///
/// let c: Color = "rgb:ff/80/0".parse().unwrap();
/// assert_eq!(c, Color::rgb(255, 128, 0));
/// assert_eq!("#f80".parse::<Color>().unwrap(), Color::rgb(255, 136, 0));
/// assert_eq!(c.to_string(), "#FF8000");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::grey(255);
    pub const BLACK: Self = Self::grey(0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub const fn grey(v: u8) -> Self {
        Color { r: v, g: v, b: v }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Colour parse failure
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected `#RGB`, `#RRGGBB` or `rgb:R/G/B`")]
    Syntax,
    #[error("invalid hex digit")]
    InvalidHex,
}

/// Parse a component of one or two hex digits; one digit `x` means `xx`
fn component(s: &str) -> Result<u8, ParseError> {
    if s.is_empty() || s.len() > 2 {
        return Err(ParseError::Syntax);
    }
    if !s.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseError::InvalidHex);
    }
    let v = u8::from_str_radix(s, 16).map_err(|_| ParseError::InvalidHex)?;
    Ok(if s.len() == 1 { v * 17 } else { v })
}

impl FromStr for Color {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: [&str; 3] = if let Some(rest) = s.strip_prefix("rgb:") {
            let mut iter = rest.split('/');
            match (iter.next(), iter.next(), iter.next(), iter.next()) {
                (Some(r), Some(g), Some(b), None) => [r, g, b],
                _ => return Err(ParseError::Syntax),
            }
        } else if let Some(hex) = s.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(ParseError::InvalidHex);
            }
            match hex.len() {
                3 => [&hex[0..1], &hex[1..2], &hex[2..3]],
                6 => [&hex[0..2], &hex[2..4], &hex[4..6]],
                _ => return Err(ParseError::Syntax),
            }
        } else {
            return Err(ParseError::Syntax);
        };

        Ok(Color {
            r: component(parts[0])?,
            g: component(parts[1])?,
            b: component(parts[2])?,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// The colour roles of a popup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorRole {
    Background,
    /// Background of the active entry
    Highlight,
    Title,
    Text,
    /// Text of the active entry
    HighlightText,
    DisabledText,
    /// Check and radio marks
    Radio,
}

impl ColorRole {
    pub const ALL: [ColorRole; 7] = [
        ColorRole::Background,
        ColorRole::Highlight,
        ColorRole::Title,
        ColorRole::Text,
        ColorRole::HighlightText,
        ColorRole::DisabledText,
        ColorRole::Radio,
    ];
}

/// One colour per [`ColorRole`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Palette {
    pub background: Color,
    pub highlight: Color,
    pub title: Color,
    pub text: Color,
    pub highlight_text: Color,
    pub disabled_text: Color,
    pub radio: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Color::grey(0xBE),
            highlight: Color::grey(0x70),
            title: Color::BLACK,
            text: Color::BLACK,
            highlight_text: Color::WHITE,
            disabled_text: Color::grey(0x6E),
            radio: Color::rgb(0x00, 0x00, 0xFF),
        }
    }
}

impl Palette {
    fn slot(&mut self, role: ColorRole) -> &mut Color {
        match role {
            ColorRole::Background => &mut self.background,
            ColorRole::Highlight => &mut self.highlight,
            ColorRole::Title => &mut self.title,
            ColorRole::Text => &mut self.text,
            ColorRole::HighlightText => &mut self.highlight_text,
            ColorRole::DisabledText => &mut self.disabled_text,
            ColorRole::Radio => &mut self.radio,
        }
    }

    pub fn get(&self, role: ColorRole) -> Color {
        let mut copy = *self;
        *copy.slot(role)
    }

    /// Set the colour for `role`, returning the previous value
    pub fn set(&mut self, role: ColorRole, color: Color) -> Color {
        std::mem::replace(self.slot(role), color)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_forms() {
        assert_eq!("#0a0B0c".parse::<Color>(), Ok(Color::rgb(10, 11, 12)));
        assert_eq!(" #abc ".parse::<Color>(), Ok(Color::rgb(0xAA, 0xBB, 0xCC)));
        assert_eq!("rgb:1/22/f".parse::<Color>(), Ok(Color::rgb(0x11, 0x22, 0xFF)));
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");

        assert_eq!("#12345".parse::<Color>(), Err(ParseError::Syntax));
        assert_eq!("".parse::<Color>(), Err(ParseError::Syntax));
        assert_eq!("rgb:1/2".parse::<Color>(), Err(ParseError::Syntax));
        assert_eq!("rgb:1/2/3/4".parse::<Color>(), Err(ParseError::Syntax));
        assert_eq!("rgb:123/0/0".parse::<Color>(), Err(ParseError::Syntax));
        assert_eq!("#12345G".parse::<Color>(), Err(ParseError::InvalidHex));
        assert_eq!("#+12".parse::<Color>(), Err(ParseError::InvalidHex));
    }

    #[test]
    fn palette_roles() {
        let mut p = Palette::default();
        for role in ColorRole::ALL {
            let old = p.set(role, Color::grey(1));
            assert_eq!(p.get(role), Color::grey(1));
            p.set(role, old);
        }
        assert_eq!(p, Palette::default());
    }
}
