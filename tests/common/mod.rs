//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use keywatch::config::WatchConfig;
use keywatch::keywatch::{reaction, DetachedSource, KeyEvent, Keywatch, Modifiers, Platform, Reaction};

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Reaction that appends `name` to the log
pub fn recorder(log: &Log, name: &str) -> Reaction {
    let log = log.clone();
    let name = name.to_string();
    reaction(move |_, _| log.borrow_mut().push(name.clone()))
}

/// Watcher pinned to `platform` so marker tests behave the same everywhere
pub fn watcher_on(platform: Platform) -> Keywatch {
    let config = WatchConfig {
        platform: Some(platform),
        ..WatchConfig::default()
    };
    Keywatch::new(&config, DetachedSource)
}

/// Press and release a key
pub fn tap(watch: &mut Keywatch, code: &str, key: &str, mods: Modifiers) {
    watch.handle_event(&mut KeyEvent::down(code, key).with_mods(mods));
    watch.handle_event(&mut KeyEvent::up(code, key).with_mods(mods));
}
