//! Human-readable rendering of raw keyboard events, for logs and debugging

use super::key::alias_for_code;
use super::types::{EventKind, KeyEvent, Platform};

/// Describe an event, e.g. `Control Shift KeyS Down` or `^+s`
///
/// Long form spells out the modifiers and uses the event code. Short form uses
/// the modifier glyphs, the alias glyph of the code if there is one, and the
/// key value when the code is just `Key<letter>`. Key-up events get no suffix.
pub fn format_key_event(event: &KeyEvent, short: bool, platform: Platform) -> String {
    let mac = platform.is_mac();
    let mut out = String::new();

    if event.mods.shift() {
        out.push_str(match (short, mac) {
            (false, _) => "Shift ",
            (true, true) => "⇧",
            (true, false) => "+",
        });
    }
    if event.mods.ctrl() {
        out.push_str(if short { "^" } else { "Control " });
    }
    if event.mods.alt() {
        out.push_str(match (short, mac) {
            (false, _) => "Alt ",
            (true, true) => "⌥",
            (true, false) => "#",
        });
    }
    if event.mods.meta() {
        out.push_str(match (short, mac) {
            (false, true) => "Meta ",
            (false, false) => "Command ",
            (true, true) => "⌘",
            (true, false) => "@",
        });
    }

    match alias_for_code(&event.code) {
        Some(glyph) if short => out.push_str(glyph),
        _ if short && is_letter_code(&event.code, &event.key) => out.push_str(&event.key),
        _ => out.push_str(&event.code),
    }

    match event.kind {
        EventKind::Down => out.push_str(" Down"),
        EventKind::Press => out.push_str(" Press"),
        EventKind::Up => {}
    }
    out
}

/// `KeyS` paired with key `s` (or `S`)
fn is_letter_code(code: &str, key: &str) -> bool {
    code.to_lowercase() == format!("key{}", key.to_lowercase())
}
