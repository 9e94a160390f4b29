//! Benchmarks for definition parsing and per-event dispatch
//!
//! Run with: cargo bench matching

use keywatch::config::WatchConfig;
use keywatch::keywatch::{
    reaction, DetachedSource, Key, KeyEvent, KeySequence, Keywatch, Modifiers, Platform,
};

fn main() {
    divan::main();
}

fn watcher_with(shortcuts: usize) -> Keywatch {
    let config = WatchConfig {
        platform: Some(Platform::Unix),
        ..WatchConfig::default()
    };
    let mut watch = Keywatch::new(&config, DetachedSource);
    for i in 0..shortcuts {
        let letter = (b'a' + (i % 26) as u8) as char;
        watch.watch(format!("^{letter},{letter},+{letter}"), reaction(|_, _| {}));
    }
    watch
}

// ============================================================================
// Parsing
// ============================================================================

#[divan::bench(args = ["^s", ":@#+KeyK up", "⌘⇧↑"])]
fn parse_key(definition: &str) -> Key {
    Key::parse(divan::black_box(definition)).unwrap()
}

#[divan::bench(args = ["ESC,w,+1,ENTER", "!onlymac @s", "↑,↑,↓,↓,←,→,←,→,b,a"])]
fn parse_sequence(definition: &str) -> KeySequence {
    KeySequence::parse(divan::black_box(definition)).unwrap()
}

// ============================================================================
// Dispatch
// ============================================================================

#[divan::bench(args = [1, 10, 100])]
fn handle_unmatched_tap(bencher: divan::Bencher, shortcuts: usize) {
    let mut watch = watcher_with(shortcuts);
    bencher.bench_local(|| {
        watch.handle_event(&mut KeyEvent::down("Digit1", "1"));
        watch.handle_event(&mut KeyEvent::up("Digit1", "1"));
    });
}

#[divan::bench(args = [1, 10, 100])]
fn handle_matching_sequence(bencher: divan::Bencher, shortcuts: usize) {
    let mut watch = watcher_with(shortcuts);
    bencher.bench_local(|| {
        let mut ctrl = KeyEvent::down("KeyA", "a").with_mods(Modifiers::CTRL);
        watch.handle_event(&mut ctrl);
        watch.handle_event(&mut KeyEvent::down("KeyA", "a"));
        watch.handle_event(&mut KeyEvent::up("KeyA", "a"));
        watch.handle_event(&mut KeyEvent::up("KeyA", "a").with_mods(Modifiers::SHIFT));
    });
}
