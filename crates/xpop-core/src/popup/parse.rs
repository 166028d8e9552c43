// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Entry directive parser
//!
//! Entries are given as a string like `"Open%x|%lQuit%s"` plus a slice of
//! [`EntryArg`] values. Entries are separated by `|`; each `%` followed by a
//! character is a directive, some of which consume the next argument. See
//! [`Popups::add_entries`](super::Popups::add_entries) for the list.
//!
//! Parsing is complete before anything is modified: a batch is either fully
//! valid or rejected as a whole.

use super::entry::{EntryKind, EntryState};
use super::{Callback, PopupId};
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// An argument consumed by a directive
#[derive(Clone)]
pub enum EntryArg {
    /// For `%x`
    Value(i64),
    /// For `%u`
    UserData(Rc<dyn Any>),
    /// For `%f`, `%E` and `%L`
    Callback(Callback),
    /// For `%m`
    Popup(PopupId),
    /// For `%r` and `%R`
    Group(i32),
    /// For `%s`
    Shortcut(String),
}

impl EntryArg {
    fn name(&self) -> &'static str {
        match self {
            EntryArg::Value(_) => "Value",
            EntryArg::UserData(_) => "UserData",
            EntryArg::Callback(_) => "Callback",
            EntryArg::Popup(_) => "Popup",
            EntryArg::Group(_) => "Group",
            EntryArg::Shortcut(_) => "Shortcut",
        }
    }
}

impl fmt::Debug for EntryArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryArg::Value(v) => write!(f, "Value({v})"),
            EntryArg::Popup(p) => write!(f, "Popup({p})"),
            EntryArg::Group(g) => write!(f, "Group({g})"),
            EntryArg::Shortcut(s) => write!(f, "Shortcut({s:?})"),
            other => write!(f, "{}(..)", other.name()),
        }
    }
}

/// Reason for a [`ParseError`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unknown directive '%{0}'")]
    UnknownDirective(char),
    #[error("'%' at end of text")]
    TrailingPercent,
    #[error("directive '%{0}' is missing its argument")]
    MissingArgument(char),
    #[error("directive '%{directive}' expects a {expected} argument, found {found}")]
    WrongArgument {
        directive: char,
        expected: &'static str,
        found: &'static str,
    },
    #[error("directive '%{0}' conflicts with an earlier kind directive")]
    ConflictingKind(char),
}

/// A batch of entries failed to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("entry {entry}: {kind}")]
pub struct ParseError {
    /// Index of the entry within the batch
    pub entry: usize,
    pub kind: ParseErrorKind,
}

/// A parsed entry, not yet committed
#[derive(Default)]
pub(crate) struct EntrySpec {
    pub line_above: bool,
    pub label: String,
    pub accel: Option<String>,
    pub kind: EntryKind,
    pub state: EntryState,
    pub value: Option<i64>,
    pub user_data: Option<Rc<dyn Any>>,
    pub group: i32,
    pub shortcut: Option<String>,
    pub callback: Option<Callback>,
    pub enter: Option<Callback>,
    pub leave: Option<Callback>,
    pub sub: Option<PopupId>,
}

impl fmt::Debug for EntrySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntrySpec")
            .field("line_above", &self.line_above)
            .field("label", &self.label)
            .field("accel", &self.accel)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("value", &self.value)
            .field("group", &self.group)
            .field("shortcut", &self.shortcut)
            .field("sub", &self.sub)
            .finish_non_exhaustive()
    }
}

struct Args<'a> {
    args: std::slice::Iter<'a, EntryArg>,
    entry: usize,
}

impl<'a> Args<'a> {
    fn next(&mut self, directive: char, expected: &'static str) -> Result<&'a EntryArg, ParseError> {
        let arg = self.args.next().ok_or(ParseError {
            entry: self.entry,
            kind: ParseErrorKind::MissingArgument(directive),
        })?;
        if arg.name() != expected {
            return Err(ParseError {
                entry: self.entry,
                kind: ParseErrorKind::WrongArgument {
                    directive,
                    expected,
                    found: arg.name(),
                },
            });
        }
        Ok(arg)
    }
}

/// Parse a batch of entries
///
/// An empty `text` yields no entries.
pub(crate) fn parse_entries(text: &str, args: &[EntryArg]) -> Result<Vec<EntrySpec>, ParseError> {
    let mut specs = vec![];
    if text.is_empty() {
        return Ok(specs);
    }

    let mut args = Args {
        args: args.iter(),
        entry: 0,
    };
    let mut chars = text.chars();
    let mut spec = EntrySpec::default();
    let mut has_kind = false;
    // label and accel text; index 1 is used after %S
    let mut parts = [String::new(), String::new()];
    let mut split = false;

    loop {
        let Some(c) = chars.next() else {
            specs.push(finish(spec, parts, split));
            break;
        };

        if c == '|' {
            specs.push(finish(spec, parts, split));
            spec = EntrySpec::default();
            parts = [String::new(), String::new()];
            has_kind = false;
            split = false;
            args.entry += 1;
            continue;
        } else if c != '%' {
            parts[usize::from(split)].push(c);
            continue;
        }

        let entry = args.entry;
        let err = |kind| ParseError { entry, kind };
        let Some(d) = chars.next() else {
            return Err(err(ParseErrorKind::TrailingPercent));
        };

        let mut set_kind = |kind: EntryKind| {
            if has_kind {
                return Err(err(ParseErrorKind::ConflictingKind(d)));
            }
            has_kind = true;
            spec.kind = kind;
            Ok(())
        };

        match d {
            '%' => parts[usize::from(split)].push('%'),
            'S' if !split => split = true,
            'l' => spec.line_above = true,
            't' | 'T' => {
                set_kind(EntryKind::Toggle)?;
                spec.state.set(EntryState::CHECKED, d == 'T');
            }
            'r' | 'R' => {
                set_kind(EntryKind::Radio)?;
                spec.state.set(EntryState::CHECKED, d == 'R');
                if let EntryArg::Group(g) = args.next(d, "Group")? {
                    spec.group = *g;
                }
            }
            'm' => {
                set_kind(EntryKind::Sub)?;
                if let EntryArg::Popup(p) = args.next(d, "Popup")? {
                    spec.sub = Some(*p);
                }
            }
            'd' => spec.state.insert(EntryState::DISABLED),
            'h' => spec.state.insert(EntryState::HIDDEN),
            'x' => {
                if let EntryArg::Value(v) = args.next(d, "Value")? {
                    spec.value = Some(*v);
                }
            }
            'u' => {
                if let EntryArg::UserData(u) = args.next(d, "UserData")? {
                    spec.user_data = Some(u.clone());
                }
            }
            'f' | 'E' | 'L' => {
                if let EntryArg::Callback(cb) = args.next(d, "Callback")? {
                    let slot = match d {
                        'f' => &mut spec.callback,
                        'E' => &mut spec.enter,
                        _ => &mut spec.leave,
                    };
                    *slot = Some(cb.clone());
                }
            }
            's' => {
                if let EntryArg::Shortcut(s) = args.next(d, "Shortcut")? {
                    spec.shortcut = Some(s.clone());
                }
            }
            other => return Err(err(ParseErrorKind::UnknownDirective(other))),
        }
    }

    let unused = args.args.len();
    if unused > 0 {
        log::warn!(target: "xpop_core::popup", "parse_entries: {unused} unused argument(s) for {text:?}");
    }

    Ok(specs)
}

fn finish(mut spec: EntrySpec, parts: [String; 2], split: bool) -> EntrySpec {
    let [label, accel] = parts;
    if split {
        spec.label = label.trim_start_matches(' ').to_string();
        spec.accel = Some(accel.trim_end_matches(' ').to_string());
    } else {
        spec.label = label.trim_matches(' ').to_string();
    }
    spec
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(specs: &[EntrySpec]) -> Vec<EntryKind> {
        specs.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn simple() {
        let specs = parse_entries("New|Open| %lClose ", &[]).unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].label, "New");
        assert_eq!(specs[2].label, "Close");
        assert!(specs[2].line_above);
        assert!(!specs[1].line_above);
        assert!(parse_entries("", &[]).unwrap().is_empty());
    }

    #[test]
    fn directives_and_args() {
        let data: Rc<dyn Any> = Rc::new(7u32);
        let args = [
            EntryArg::Value(42),
            EntryArg::Group(3),
            EntryArg::UserData(data),
            EntryArg::Shortcut("^Q".into()),
        ];
        let specs = parse_entries("A%x%t|B%R%u|Quit%S^Q%s%d", &args).unwrap();
        assert_eq!(kinds(&specs), vec![
            EntryKind::Toggle,
            EntryKind::Radio,
            EntryKind::Normal
        ]);
        assert_eq!(specs[0].value, Some(42));
        assert!(!specs[0].state.contains(EntryState::CHECKED));
        assert_eq!(specs[1].group, 3);
        assert!(specs[1].state.contains(EntryState::CHECKED));
        let u = specs[1].user_data.as_ref().unwrap();
        assert_eq!(u.downcast_ref::<u32>(), Some(&7));
        assert_eq!(specs[2].label, "Quit");
        assert_eq!(specs[2].accel.as_deref(), Some("^Q"));
        assert_eq!(specs[2].shortcut.as_deref(), Some("^Q"));
        assert_eq!(specs[2].state, EntryState::DISABLED);
    }

    #[test]
    fn percent_literals() {
        let specs = parse_entries("100%%|a %S b", &[]).unwrap();
        assert_eq!(specs[0].label, "100%");
        assert_eq!(specs[1].label, "a ");
        assert_eq!(specs[1].accel.as_deref(), Some(" b"));

        // a second splitter is not a directive
        assert_eq!(
            parse_entries("a%Sb%Sc", &[]).unwrap_err().kind,
            ParseErrorKind::UnknownDirective('S')
        );
    }

    #[test]
    fn errors() {
        let e = parse_entries("A|B%q", &[]).unwrap_err();
        assert_eq!(e, ParseError {
            entry: 1,
            kind: ParseErrorKind::UnknownDirective('q')
        });

        let e = parse_entries("A%", &[]).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::TrailingPercent);

        let e = parse_entries("A|B|C%x", &[]).unwrap_err();
        assert_eq!(e, ParseError {
            entry: 2,
            kind: ParseErrorKind::MissingArgument('x')
        });

        let e = parse_entries("A%x", &[EntryArg::Group(1)]).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::WrongArgument {
            directive: 'x',
            expected: "Value",
            found: "Group"
        });

        let e = parse_entries("A%t%r", &[EntryArg::Group(1)]).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::ConflictingKind('r'));

        // '|' after '%' is not a separator
        let e = parse_entries("A%|B", &[]).unwrap_err();
        assert_eq!(e.kind, ParseErrorKind::UnknownDirective('|'));
    }
}
