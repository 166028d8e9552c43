// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Nested popups built from items, navigated with the keyboard

use xpop::backend::headless::{Headless, Script};
use xpop::prelude::*;

fn main() {
    env_logger::init();

    let mut runner = Runner::new(Headless::new(Size(320, 240)));
    let popups = runner.popups_mut();
    popups.defaults_mut().policy = Policy::DragSelect;

    let log_link = callback(|ret, popups| {
        let parent = popups.parent(ret.popup).ok().flatten();
        println!("  via {:?} (parent {parent:?})", ret.popup);
        Response::Continue
    });
    let view = popups
        .create_from_items(None, Some("View"), &[
            PopupItem::new("Zoom").callback(log_link).sub(vec![
                PopupItem::new("50%%").radio(1),
                PopupItem::new("100%%").radio(1).checked(),
                PopupItem::new("200%%").radio(1),
            ]),
            PopupItem::new("Panels").sub(vec![
                PopupItem::new("Sidebar").toggle().checked(),
                PopupItem::new("Status bar").toggle(),
                PopupItem::new("_Reset").disabled(),
            ]),
            PopupItem::new("_Full screen%SF11").shortcut("&11"),
        ])
        .unwrap();

    let sessions = [
        Script::new().key(Key::Down).key(Key::Right).key(Key::End).key(Key::Return),
        Script::new().key(Key::End).key(Key::Up).key(Key::Return).key(Key::Down).key(Key::Return),
        Script::new().key(Key::F(11)),
        Script::new().key(Key::Down).key(Key::Right).key(Key::Left).key(Key::Escape),
    ];
    for script in sessions {
        runner.backend_mut().push_script(script);
        let ret = runner.do_popup(view);
        println!("{:?} -> {:?}", runner.state(), ret.map(|r| r.label));
    }

    for label in ["50%", "100%", "200%", "Sidebar", "Status bar"] {
        if let Ok(Some(entry)) = runner.popups().entry_by_label(view, label) {
            println!("{label}: {}", runner.popups().entry(entry).unwrap().is_checked());
        }
    }
}
