// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Shortcut parsing and matching

use super::{Key, Modifiers};
use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

/// The maximum number of shortcuts per entry
pub const MAX_SHORTCUTS: usize = 8;

/// A list of shortcuts, as stored by an entry
pub type Shortcuts = SmallVec<[Shortcut; 4]>;

/// A keyboard shortcut
///
/// Only [`Modifiers::CONTROL`] and [`Modifiers::ALT`] are significant; the
/// shift state is already applied to [`Key::Char`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Shortcut {
    /// Construct a plain (unmodified) shortcut
    #[inline]
    pub const fn plain(key: Key) -> Self {
        Shortcut {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// Parse a shortcut string
    ///
    /// Each character of the string becomes one shortcut, with these
    /// exceptions:
    ///
    /// -   `^c` is <kbd>Ctrl</kbd>+`c` (case-insensitive)
    /// -   `#c` is <kbd>Alt</kbd>+`c` (case-insensitive)
    /// -   `&n` is function key `n` where `n` is one or two digits
    /// -   `&A`, `&B`, `&C` and `&D` are the <kbd>Up</kbd>, <kbd>Down</kbd>,
    ///     <kbd>Right</kbd> and <kbd>Left</kbd> arrow keys
    /// -   `^^`, `##` and `&&` (or a marker at the end of the string) stand
    ///     for the marker character itself
    ///
    /// At most [`MAX_SHORTCUTS`] shortcuts are kept; the rest are dropped with
    /// a warning.
    ///
    /// ```
    /// use xpop_core::event::{Key, Modifiers, Shortcut};
    ///
    /// let list = Shortcut::parse_list("Qq^Q");
    /// assert_eq!(list.len(), 3);
    /// assert_eq!(list[2].key, Key::Char('q'));
    /// assert_eq!(list[2].modifiers, Modifiers::CONTROL);
    /// ```
    pub fn parse_list(s: &str) -> Shortcuts {
        let mut list = Shortcuts::new();
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            let shortcut = match c {
                '^' | '#' => match chars.next() {
                    None => Shortcut::plain(Key::Char(c)),
                    Some(next) if next == c => Shortcut::plain(Key::Char(c)),
                    Some(next) => Shortcut {
                        key: Key::Char(next.to_ascii_lowercase()),
                        modifiers: if c == '^' {
                            Modifiers::CONTROL
                        } else {
                            Modifiers::ALT
                        },
                    },
                },
                '&' => match chars.peek().copied() {
                    Some(d) if d.is_ascii_digit() => {
                        let mut n = 0u8;
                        for _ in 0..2 {
                            match chars.peek().and_then(|d| d.to_digit(10)) {
                                Some(digit) => {
                                    n = n * 10 + digit as u8;
                                    chars.next();
                                }
                                None => break,
                            }
                        }
                        Shortcut::plain(Key::F(n))
                    }
                    Some(arrow @ ('A' | 'B' | 'C' | 'D')) => {
                        chars.next();
                        Shortcut::plain(match arrow {
                            'A' => Key::Up,
                            'B' => Key::Down,
                            'C' => Key::Right,
                            _ => Key::Left,
                        })
                    }
                    Some('&') => {
                        chars.next();
                        Shortcut::plain(Key::Char('&'))
                    }
                    _ => Shortcut::plain(Key::Char('&')),
                },
                c => Shortcut::plain(Key::Char(c)),
            };

            if list.len() == MAX_SHORTCUTS {
                log::warn!(
                    target: "xpop_core::event",
                    "Shortcut::parse_list: more than {MAX_SHORTCUTS} shortcuts in {s:?}; ignoring the rest"
                );
                break;
            }
            list.push(shortcut);
        }

        list
    }

    /// Check whether a key press matches this shortcut
    pub fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        let modifiers = modifiers & (Modifiers::CONTROL | Modifiers::ALT);
        if modifiers != self.modifiers {
            return false;
        }

        match (self.key, key) {
            (Key::Char(a), Key::Char(b)) if !self.modifiers.is_empty() => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

/// Find the grapheme of `label` to underline for `shortcuts`
///
/// This is the first grapheme (case-insensitively) equal to the character
/// of the first plain or <kbd>Alt</kbd> character shortcut which occurs in
/// the label.
pub fn underline_pos(label: &str, shortcuts: &[Shortcut]) -> Option<usize> {
    shortcuts
        .iter()
        .filter(|s| (s.modifiers - Modifiers::ALT).is_empty())
        .filter_map(|s| match s.key {
            Key::Char(c) => Some(c),
            _ => None,
        })
        .find_map(|c| {
            label.graphemes(true).position(|g| {
                let mut chars = g.chars();
                matches!((chars.next(), chars.next()), (Some(l), None) if l.to_lowercase().eq(c.to_lowercase()))
            })
        })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_markers() {
        let list = Shortcut::parse_list("^c#X&4&12&A&Dz");
        assert_eq!(list.as_slice(), &[
            Shortcut {
                key: Key::Char('c'),
                modifiers: Modifiers::CONTROL
            },
            Shortcut {
                key: Key::Char('x'),
                modifiers: Modifiers::ALT
            },
            Shortcut::plain(Key::F(4)),
            Shortcut::plain(Key::F(12)),
            Shortcut::plain(Key::Up),
            Shortcut::plain(Key::Left),
            Shortcut::plain(Key::Char('z')),
        ]);
    }

    #[test]
    fn parse_literal_markers() {
        let list = Shortcut::parse_list("^^##&&^");
        let keys: Vec<Key> = list.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec![
            Key::Char('^'),
            Key::Char('#'),
            Key::Char('&'),
            Key::Char('^')
        ]);
        assert!(list.iter().all(|s| s.modifiers.is_empty()));
    }

    #[test]
    fn parse_limit() {
        assert_eq!(Shortcut::parse_list("abcdefghijk").len(), MAX_SHORTCUTS);
    }

    #[test]
    fn matching() {
        let ctrl_c = Shortcut::parse_list("^C")[0];
        assert!(ctrl_c.matches(Key::Char('c'), Modifiers::CONTROL));
        assert!(ctrl_c.matches(Key::Char('C'), Modifiers::CONTROL | Modifiers::SHIFT));
        assert!(!ctrl_c.matches(Key::Char('c'), Modifiers::empty()));
        assert!(!ctrl_c.matches(Key::Char('c'), Modifiers::CONTROL | Modifiers::ALT));

        let plain = Shortcut::plain(Key::Char('C'));
        assert!(plain.matches(Key::Char('C'), Modifiers::SHIFT));
        assert!(!plain.matches(Key::Char('c'), Modifiers::empty()));
        assert!(!plain.matches(Key::Char('C'), Modifiers::ALT));
    }

    #[test]
    fn underline() {
        let list = Shortcut::parse_list("^Sx#O");
        assert_eq!(underline_pos("Open", &list), Some(0));
        assert_eq!(underline_pos("Exit", &list), Some(1));
        assert_eq!(underline_pos("Save", &Shortcut::parse_list("^S")), None);
    }
}
