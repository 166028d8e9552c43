// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Geometry data types
//!
//! All values are integer pixels. Screen ("root") coordinates and
//! popup-local coordinates use the same types; see [`crate::popup::layout`]
//! for conversions between the two.

use std::ops::{Add, AddAssign, Sub};

/// A position, on screen or relative to a popup's top-left corner
///
/// Positions may be negative: a popup taller than the screen is placed
/// partly above it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord(pub i32, pub i32);

impl Coord {
    /// The origin
    pub const ZERO: Self = Coord(0, 0);
}

impl Add<Offset> for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Offset) -> Self {
        Coord(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl AddAssign<Offset> for Coord {
    #[inline]
    fn add_assign(&mut self, rhs: Offset) {
        self.0 += rhs.0;
        self.1 += rhs.1;
    }
}

impl Sub<Offset> for Coord {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Offset) -> Self {
        Coord(self.0 - rhs.0, self.1 - rhs.1)
    }
}

/// The far corner of a box at `self` with extent `rhs`
impl Add<Size> for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Size) -> Self {
        Coord(self.0 + rhs.0, self.1 + rhs.1)
    }
}

/// A width and height
///
/// Sizes are non-negative in practice; a popup or entry with an empty size
/// is not drawn and cannot be hit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size(pub i32, pub i32);

impl Size {
    pub const ZERO: Self = Size(0, 0);

    /// True if either dimension is zero (or negative)
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 <= 0 || self.1 <= 0
    }
}

/// A relative move, as used when shifting a popup
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Offset(pub i32, pub i32);

impl Offset {
    /// No movement
    pub const ZERO: Self = Offset(0, 0);
}

/// The offset of a position from the origin
impl From<Coord> for Offset {
    #[inline]
    fn from(c: Coord) -> Self {
        Offset(c.0, c.1)
    }
}

/// An axis-aligned box: a popup's window, an entry's row or a title
///
/// The box covers `pos` up to but excluding `pos + size`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub pos: Coord,
    pub size: Size,
}

impl Rect {
    /// The empty box at the origin
    pub const ZERO: Self = Rect::new(Coord::ZERO, Size::ZERO);

    #[inline]
    pub const fn new(pos: Coord, size: Size) -> Self {
        Rect { pos, size }
    }

    /// The exclusive bottom-right corner
    #[inline]
    pub fn pos2(&self) -> Coord {
        self.pos + self.size
    }

    /// Hit test
    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        let end = self.pos2();
        (self.pos.0..end.0).contains(&c.0) && (self.pos.1..end.1).contains(&c.1)
    }

    /// True if `other` lies entirely inside `self`
    pub fn contains_rect(&self, other: &Rect) -> bool {
        let (a, b) = (self.pos2(), other.pos2());
        other.pos.0 >= self.pos.0 && other.pos.1 >= self.pos.1 && b.0 <= a.0 && b.1 <= a.1
    }
}

impl Add<Offset> for Rect {
    type Output = Self;

    #[inline]
    fn add(self, offset: Offset) -> Self {
        Rect::new(self.pos + offset, self.size)
    }
}
