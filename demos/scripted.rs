// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! A file menu driven by scripted input
//!
//! Run with `RUST_LOG=xpop_core=debug` to follow windows and grabs.

use xpop::backend::headless::{Headless, Script};
use xpop::prelude::*;

fn main() {
    env_logger::init();

    let mut runner = Runner::new(Headless::new(Size(800, 600)));
    let popups = runner.popups_mut();
    let file = popups.create(None, Some("File"));
    let report = callback(|ret, _| {
        println!("selected {:?} (value {})", ret.label, ret.value);
        Response::Continue
    });
    popups.set_callback(file, Some(report)).unwrap();
    popups
        .add_entries(file, "New%S^N%s|Open...%S^O%s|%lAuto save%t|%lQuit%S^Q%s%x", &[
            EntryArg::Shortcut("Nn^N".into()),
            EntryArg::Shortcut("Oo^O".into()),
            EntryArg::Shortcut("Qq^Q".into()),
            EntryArg::Value(-1),
        ])
        .unwrap();
    popups.set_position(file, Some(Coord(20, 20))).unwrap();

    let sessions = [
        Script::new().motion(40, 50).click(),
        Script::new().key(Key::Down).key(Key::Down).key(Key::Down).key(Key::Return),
        Script::new().key_with(Key::Char('q'), Modifiers::CONTROL),
        Script::new().key(Key::Down).key(Key::Escape),
    ];
    for script in sessions {
        runner.backend_mut().push_script(script);
        match runner.do_popup(file) {
            Some(ret) => println!("do_popup: {}", ret.text),
            None => println!("do_popup: cancelled"),
        }
    }

    let auto_save = runner.popups().entry_by_label(file, "Auto save").unwrap();
    if let Some(entry) = auto_save {
        println!("auto save: {}", runner.popups().entry(entry).unwrap().is_checked());
    }
}
