use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use xpop::backend::headless::{Headless, Op, Script};
use xpop::backend::GrabError;
use xpop::config::Config;
use xpop::event::Button;
use xpop::popup::{Error, State};
use xpop::prelude::*;

const ORIGIN: Coord = Coord(100, 100);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn runner() -> Runner<Headless> {
    init_logger();
    Runner::with_config(Headless::new(Size(640, 480)), Config::default())
}

/// A root popup shown at [`ORIGIN`]
fn root(runner: &mut Runner<Headless>, title: Option<&str>) -> PopupId {
    let p = runner.popups_mut().create(None, title);
    runner.popups_mut().set_position(p, Some(ORIGIN)).unwrap();
    p
}

/// Screen position of the centre of `entry`, given its popup's origin
fn centre(runner: &mut Runner<Headless>, origin: Coord, entry: EntryId) -> (i32, i32) {
    let popup = runner.popups().entry(entry).unwrap().popup();
    runner.popups_mut().size(popup).unwrap();
    let r = runner.popups().entry(entry).unwrap().rect();
    (origin.0 + r.pos.0 + r.size.0 / 2, origin.1 + r.pos.1 + r.size.1 / 2)
}

/// Screen origin of the sub-popup opened from `link` of a popup at `origin`
fn sub_origin(runner: &mut Runner<Headless>, origin: Coord, link: EntryId) -> Coord {
    let popup = runner.popups().entry(link).unwrap().popup();
    let size = runner.popups_mut().size(popup).unwrap();
    let r = runner.popups().entry(link).unwrap().rect();
    Coord(origin.0 + size.0, origin.1 + r.pos.1)
}

type Log = Rc<RefCell<Vec<String>>>;

fn record(log: &Log, tag: &'static str) -> xpop::popup::Callback {
    let log = log.clone();
    callback(move |ret, _| {
        log.borrow_mut().push(format!("{tag}:{}", ret.label));
        Response::Continue
    })
}

#[test]
fn title_and_separator_layout() {
    let mut runner = runner();
    let p = root(&mut runner, Some("File"));
    let ids = runner.popups_mut().add_entries(p, "New|Open|%lClose", &[]).unwrap();
    assert_eq!(ids.len(), 3);

    let size = runner.popups_mut().size(p).unwrap();
    let popups = runner.popups_mut();
    let entries = popups.entries(p).unwrap().to_vec();
    assert_eq!(entries.len(), 4);
    let lines = entries
        .iter()
        .filter(|e| popups.entry(**e).unwrap().kind() == EntryKind::Line)
        .count();
    assert_eq!(lines, 1);

    let title = popups.popup(p).unwrap().title_box();
    assert!(title.size.1 > 0);
    for y in title.pos.1..title.pos2().1 {
        assert_eq!(popups.entry_at(p, Coord(size.0 / 2, y)).unwrap(), None);
    }
    for e in entries {
        let r = popups.entry(e).unwrap().rect();
        assert!(r.pos.1 >= title.pos2().1);
        assert!(r.pos2().0 <= size.0 && r.pos2().1 <= size.1);
    }
}

#[test]
fn radio_insertion_keeps_last_checked() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let ids = runner
        .popups_mut()
        .add_entries(p, "One%r|Two%R", &[EntryArg::Group(1), EntryArg::Group(1)])
        .unwrap();
    assert!(!runner.popups().entry(ids[0]).unwrap().is_checked());
    assert!(runner.popups().entry(ids[1]).unwrap().is_checked());

    runner
        .popups_mut()
        .entry_raise_state(ids[0], EntryState::CHECKED)
        .unwrap();
    assert!(runner.popups().entry(ids[0]).unwrap().is_checked());
    assert!(!runner.popups().entry(ids[1]).unwrap().is_checked());
}

#[test]
fn oversized_popup_clamps_to_screen() {
    init_logger();
    let backend = Headless::new(Size(100, 100));
    let mut popups = Popups::new();
    let p = popups.create(None, None);
    popups.add_entries(p, "A|%lB", &[]).unwrap();
    popups.set_min_width(p, 200).unwrap();
    popups.set_position(p, Some(Coord(10, 10))).unwrap();
    assert_eq!(popups.size(p).unwrap(), Size(200, 50));
    assert_eq!(
        popups.calculate_window_position(&backend, p).unwrap(),
        Coord(0, 10)
    );
}

#[test]
fn down_key_wraps() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let log = Log::default();
    let enter = record(&log, "enter");
    let ids = runner
        .popups_mut()
        .add_entries(p, "One%E|Two%d|%lThree%E", &[EntryArg::Callback(enter.clone()), EntryArg::Callback(enter)])
        .unwrap();

    runner.backend_mut().push_script(
        Script::new()
            .key(Key::Down)
            .key(Key::Down)
            .key(Key::Down)
            .key(Key::Return),
    );
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.entry, ids[0]);
    assert_eq!(*log.borrow(), ["enter:One", "enter:Three", "enter:One"]);
}

#[test]
fn sub_link_callback_only_on_leaf_selection() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let sub = runner.popups_mut().create(None, None);
    let log = Log::default();
    let save = runner
        .popups_mut()
        .add_entries(sub, "Save%f", &[EntryArg::Callback(record(&log, "leaf"))])
        .unwrap()[0];
    let link = runner
        .popups_mut()
        .add_entries(p, "File%m%f", &[EntryArg::Popup(sub), EntryArg::Callback(record(&log, "link"))])
        .unwrap()[0];

    // open the sub-popup, then leave without selecting
    let (x, y) = centre(&mut runner, ORIGIN, link);
    runner
        .backend_mut()
        .push_script(Script::new().motion(x, y).key(Key::Escape).key(Key::Escape));
    assert!(runner.do_popup(p).is_none());
    assert!(log.borrow().is_empty());

    let origin = sub_origin(&mut runner, ORIGIN, link);
    let (sx, sy) = centre(&mut runner, origin, save);
    runner
        .backend_mut()
        .push_script(Script::new().motion(x, y).motion(sx, sy).click());
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.entry, save);
    assert_eq!(ret.popup, sub);
    assert_eq!(*log.borrow(), ["leaf:Save", "link:Save"]);
}

#[test]
fn motion_between_popups() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let sub = runner.popups_mut().create(None, None);
    let log = Log::default();
    let leave = record(&log, "leave");
    runner
        .popups_mut()
        .add_entries(sub, "Inner%L", &[EntryArg::Callback(leave.clone())])
        .unwrap();
    let ids = runner
        .popups_mut()
        .add_entries(p, "Menu%m%L|Plain", &[EntryArg::Popup(sub), EntryArg::Callback(leave)])
        .unwrap();

    let (mx, my) = centre(&mut runner, ORIGIN, ids[0]);
    let (px, py) = centre(&mut runner, ORIGIN, ids[1]);
    let origin = sub_origin(&mut runner, ORIGIN, ids[0]);
    let inner = runner.popups().entries(sub).unwrap()[0];
    let (ix, iy) = centre(&mut runner, origin, inner);
    runner.backend_mut().push_script(
        Script::new()
            .motion(mx, my)
            .motion(ix, iy)
            // back onto the link: the open sub-popup stays
            .motion(mx, my)
            .motion(ix, iy)
            .motion(px, py)
            .click(),
    );
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.entry, ids[1]);
    assert_eq!(*log.borrow(), ["leave:Inner", "leave:Menu"]);
    assert!(!runner.popups().is_shown(sub).unwrap());
}

#[test]
fn external_destroy_cancels() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let sub = runner.popups_mut().create(None, None);
    runner.popups_mut().add_entries(sub, "Leaf", &[]).unwrap();
    runner
        .popups_mut()
        .add_entries(p, "Sub%m|Other", &[EntryArg::Popup(sub)])
        .unwrap();

    runner.backend_mut().push_script(
        Script::new()
            .key(Key::Down)
            .key(Key::Right)
            .destroy_grabbed()
            .key(Key::Return),
    );
    assert!(runner.do_popup(p).is_none());
    assert_eq!(runner.state(), State::Closed { selected: false });
    assert_eq!(runner.backend().remaining(), 1);
    assert_eq!(runner.backend().windows().count(), 0);
    assert_eq!(runner.backend().pointer_grab(), None);
    assert!(!runner.popups().is_shown(p).unwrap());
    assert!(!runner.popups().is_shown(sub).unwrap());

    // the popup may be shown again; the left-over Return finds no active entry
    runner
        .backend_mut()
        .push_script(Script::new().key(Key::End).key(Key::Return));
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.label, "Other");
}

#[test]
fn grab_failures() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    runner.popups_mut().add_entries(p, "A", &[]).unwrap();

    runner.backend_mut().fail_pointer_grab = true;
    assert!(matches!(
        runner.run_modal(p),
        Err(Error::Grab(GrabError::Pointer))
    ));
    assert_eq!(runner.backend().windows().count(), 0);

    runner.backend_mut().fail_pointer_grab = false;
    runner.backend_mut().fail_keyboard_grab = true;
    assert!(matches!(
        runner.run_modal(p),
        Err(Error::Grab(GrabError::Keyboard))
    ));
    assert_eq!(runner.backend().windows().count(), 0);
    assert_eq!(runner.backend().pointer_grab(), None);
    assert!(!runner.popups().is_shown(p).unwrap());
}

#[test]
fn closing_without_save_under_redraws() {
    let mut runner = runner();
    runner.backend_mut().set_save_under(false);
    let p = root(&mut runner, None);
    let sub = runner.popups_mut().create(None, None);
    runner.popups_mut().add_entries(sub, "Leaf", &[]).unwrap();
    runner
        .popups_mut()
        .add_entries(p, "Sub%m", &[EntryArg::Popup(sub)])
        .unwrap();

    runner
        .backend_mut()
        .push_script(Script::new().key(Key::Down).key(Key::Right).key(Key::Left));
    assert!(runner.do_popup(p).is_none());
    // closing the sub-popup, then the root
    assert_eq!(runner.backend().app_redraws(), 2);
}

#[test]
fn release_policies() {
    let mut runner = runner();
    let p = root(&mut runner, Some("Title"));
    runner.popups_mut().add_entries(p, "A|B", &[]).unwrap();
    runner.popups_mut().size(p).unwrap();
    let title = runner.popups().popup(p).unwrap().title_box();
    let (tx, ty) = (ORIGIN.0 + title.pos.0 + 5, ORIGIN.1 + title.pos.1 + 2);

    let script = Script::new()
        .motion(tx, ty)
        .press(Button::Left)
        .release(Button::Left)
        .key(Key::Down)
        .key(Key::Return);

    runner.backend_mut().push_script(script.clone());
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.label, "A");

    runner.popups_mut().set_policy(p, Policy::DragSelect).unwrap();
    runner.backend_mut().push_script(script);
    assert!(runner.do_popup(p).is_none());
    assert_eq!(runner.backend().remaining(), 2);
}

#[test]
fn shortcuts_search_outward() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let sub = runner.popups_mut().create(None, None);
    runner
        .popups_mut()
        .add_entries(sub, "Inner%s", &[EntryArg::Shortcut("i".into())])
        .unwrap();
    let ids = runner
        .popups_mut()
        .add_entries(p, "Open%s|Quit%s|More%m%s", &[
            EntryArg::Shortcut("Oo".into()),
            EntryArg::Shortcut("^Q".into()),
            EntryArg::Popup(sub),
            EntryArg::Shortcut("m".into()),
        ])
        .unwrap();
    assert_eq!(runner.popups().entry(ids[0]).unwrap().underline(), Some(0));

    runner
        .backend_mut()
        .push_script(Script::new().key_with(Key::Char('q'), Modifiers::CONTROL));
    assert_eq!(runner.do_popup(p).unwrap().entry, ids[1]);

    // "m" opens the sub-popup; "o" is found in the parent
    runner
        .backend_mut()
        .push_script(Script::new().key(Key::Char('m')).key(Key::Char('o')));
    assert_eq!(runner.do_popup(p).unwrap().entry, ids[0]);

    runner
        .backend_mut()
        .push_script(Script::new().key(Key::Char('m')).key(Key::Char('i')));
    assert_eq!(runner.do_popup(p).unwrap().label, "Inner");
}

#[test]
fn timers_fire_while_shown() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    runner.popups_mut().add_entries(p, "A", &[]).unwrap();

    let fired = Rc::new(RefCell::new(0));
    let f = fired.clone();
    runner
        .timers_mut()
        .add_timeout(Duration::ZERO, move || *f.borrow_mut() += 1);
    let idle = Rc::new(RefCell::new(0));
    let i = idle.clone();
    runner
        .timers_mut()
        .set_idle(Some(Box::new(move || *i.borrow_mut() += 1)));

    runner
        .backend_mut()
        .push_script(Script::new().idle(25).key(Key::Escape));
    assert!(runner.do_popup(p).is_none());
    assert_eq!(*fired.borrow(), 1);
    assert!(*idle.borrow() >= 2);
}

#[test]
fn tall_popup_shifts() {
    init_logger();
    let mut runner = Runner::with_config(Headless::new(Size(640, 100)), Config::default());
    let p = runner.popups_mut().create(None, None);
    runner
        .popups_mut()
        .add_entries(p, "0|1|2|3|4|5|6|7|8|9", &[])
        .unwrap();
    runner.popups_mut().set_position(p, Some(Coord(0, 0))).unwrap();

    runner
        .backend_mut()
        .push_script(Script::new().motion(10, 99).key(Key::End).key(Key::Escape));
    assert!(runner.do_popup(p).is_none());
    let shifts: Vec<i32> = runner
        .backend()
        .ops()
        .iter()
        .filter_map(|op| match op {
            Op::Configure(_, rect) => Some(rect.pos.1),
            _ => None,
        })
        .collect();
    assert_eq!(shifts, [-19, -93]);
}

#[test]
fn struct_items_and_radio_selection() {
    let mut runner = runner();
    let p = runner
        .popups_mut()
        .create_from_items(None, None, &[
            PopupItem::new("Mode").sub(vec![
                PopupItem::new("Insert").radio(1),
                PopupItem::new("Overwrite").radio(1).checked(),
            ]),
            PopupItem::new("_Wrap").toggle(),
        ])
        .unwrap();

    runner
        .backend_mut()
        .push_script(Script::new().key(Key::Down).key(Key::Right).key(Key::Return));
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.label, "Insert");
    let overwrite = runner.popups().entry_by_label(p, "Overwrite").unwrap().unwrap();
    assert!(runner.popups().entry(ret.entry).unwrap().is_checked());
    assert!(!runner.popups().entry(overwrite).unwrap().is_checked());

    runner
        .backend_mut()
        .push_script(Script::new().key(Key::End).key(Key::Return));
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.label, "Wrap");
    assert!(runner.popups().entry(ret.entry).unwrap().is_checked());
}

#[test]
fn callbacks_may_delete_popups() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let cb = callback(move |ret, popups| {
        popups.delete_popup(ret.popup).unwrap();
        Response::Continue
    });
    runner.popups_mut().set_callback(p, Some(cb)).unwrap();
    runner.popups_mut().add_entries(p, "Bye", &[]).unwrap();

    runner
        .backend_mut()
        .push_script(Script::new().key(Key::Down).key(Key::Return));
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.label, "Bye");
    assert!(runner.popups().is_empty());
    assert!(runner.do_popup(p).is_none());
}

#[test]
fn ignore_response_yields_none() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let ignore = callback(|_, _| Response::Ignore);
    runner
        .popups_mut()
        .add_entries(p, "Skip%f%t", &[EntryArg::Callback(ignore)])
        .unwrap();
    runner
        .backend_mut()
        .push_script(Script::new().key(Key::Down).key(Key::Return));
    assert!(runner.do_popup(p).is_none());
    // the side effect happened before the callback
    let e = runner.popups().entries(p).unwrap()[0];
    assert!(runner.popups().entry(e).unwrap().is_checked());
    assert_eq!(runner.state(), State::Closed { selected: true });
}

#[test]
fn leaving_all_popups_deactivates() {
    let mut runner = runner();
    let p = root(&mut runner, None);
    let log = Log::default();
    let leave = record(&log, "leave");
    let ids = runner
        .popups_mut()
        .add_entries(p, "One%L|Two", &[EntryArg::Callback(leave.clone())])
        .unwrap();

    let (x, y) = centre(&mut runner, ORIGIN, ids[0]);
    runner.backend_mut().push_script(
        Script::new()
            .motion(x, y)
            .motion(500, 400)
            .release(Button::Left)
            .key(Key::Return)
            .key(Key::Escape),
    );
    assert!(runner.do_popup(p).is_none());
    assert_eq!(*log.borrow(), ["leave:One"]);
    assert_eq!(runner.backend().remaining(), 0);

    // an open sub-popup stays open, only its active entry is cleared
    log.borrow_mut().clear();
    let sub = runner.popups_mut().create(None, None);
    let inner = runner
        .popups_mut()
        .add_entries(sub, "Inner%L", &[EntryArg::Callback(leave)])
        .unwrap()[0];
    let link = runner
        .popups_mut()
        .add_entries(p, "Sub%m", &[EntryArg::Popup(sub)])
        .unwrap()[0];
    let (lx, ly) = centre(&mut runner, ORIGIN, link);
    let origin = sub_origin(&mut runner, ORIGIN, link);
    let (ix, iy) = centre(&mut runner, origin, inner);
    runner.backend_mut().push_script(
        Script::new()
            .motion(lx, ly)
            .motion(ix, iy)
            .motion(600, 470)
            .key(Key::Return)
            .key(Key::Down)
            .key(Key::Return),
    );
    let ret = runner.do_popup(p).unwrap();
    assert_eq!(ret.entry, inner);
    assert_eq!(*log.borrow(), ["leave:Inner"]);
}

#[test]
fn shown_popup_refuses_deletion() {
    let mut runner = runner();
    let p = root(&mut runner, Some("Edit"));
    let refused: Rc<RefCell<Vec<bool>>> = Default::default();
    let seen = refused.clone();
    let enter = callback(move |ret, popups| {
        let mut seen = seen.borrow_mut();
        seen.push(matches!(popups.delete_entry(ret.entry), Err(Error::PopupShown)));
        seen.push(matches!(popups.delete_popup(ret.popup), Err(Error::PopupShown)));
        Response::Continue
    });
    let ids = runner
        .popups_mut()
        .add_entries(p, "Cut%E|Paste", &[EntryArg::Callback(enter)])
        .unwrap();
    let entries = runner.popups().entries(p).unwrap().to_vec();
    let count = runner.popups().len();

    runner
        .backend_mut()
        .push_script(Script::new().key(Key::Down).key(Key::Escape));
    assert!(runner.do_popup(p).is_none());
    assert_eq!(*refused.borrow(), [true, true]);

    assert_eq!(runner.popups().len(), count);
    assert_eq!(runner.popups().entries(p).unwrap(), &entries[..]);
    assert_eq!(runner.popups().entry(ids[0]).unwrap().label(), "Cut");

    // closed again, so deletion goes through
    runner.popups_mut().delete_entry(ids[0]).unwrap();
    runner.popups_mut().delete_popup(p).unwrap();
    assert!(runner.popups().is_empty());
}
