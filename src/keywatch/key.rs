//! A single matchable key and the tokenizer that parses key definitions
//!
//! Grammar of one key definition (whitespace optional around symbols):
//!
//! ```text
//! [modifiers...] <significant> [up|down]
//!
//! :            NoInput (ignore events targeting input elements)
//! @ ⌘ Command  Meta
//! ^ ctrl       Control
//! # ⌥          Alt
//! + ⇧          Shift
//! ```
//!
//! The significant token is a platform key code when it is longer than one
//! character (`KeyN`, `Escape`) and a literal character otherwise (`s`, `1`).

use std::fmt;

use super::error::ParseError;
use super::types::{EventKind, KeyEvent, Modifiers, Platform};

/// Glyph shorthands for named keys. The variation-selector spellings of
/// Home/End come first so they win over the bare arrows.
const CODE_ALIASES: [(&str, &str); 17] = [
    ("↑", "ArrowUp"),
    ("↓", "ArrowDown"),
    ("←", "ArrowLeft"),
    ("→", "ArrowRight"),
    ("⎋", "Escape"),
    ("⇥", "Tab"),
    ("⏎", "Enter"),
    ("⌤", "NumpadEnter"),
    ("⇞", "PageUp"),
    ("⇟", "PageDown"),
    ("↖\u{FE0E}", "Home"),
    ("↘\u{FE0E}", "End"),
    ("↖", "Home"),
    ("↘", "End"),
    ("⌫", "Backspace"),
    ("⌦", "Delete"),
    ("␣", "Space"),
];

const NO_INPUT: &str = "NoInput";
const META: &str = "Meta";
const CONTROL: &str = "Control";
const ALT: &str = "Alt";
const SHIFT: &str = "Shift";

/// Glyph used to display a platform code in short form, if there is one
pub fn alias_for_code(code: &str) -> Option<&'static str> {
    CODE_ALIASES
        .iter()
        .find(|(_, name)| *name == code)
        .map(|(glyph, _)| *glyph)
}

/// A single key press/release description
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    identifier: String,
    is_code: bool,
    mods: Modifiers,
    allow_in_input: bool,
    kind: EventKind,
}

impl Key {
    pub fn new(
        identifier: impl Into<String>,
        is_code: bool,
        mods: Modifiers,
        allow_in_input: bool,
        kind: EventKind,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            is_code,
            mods,
            allow_in_input,
            kind,
        }
    }

    /// Parse a single key definition such as `^s`, `:Control KeyN` or `+1 down`
    pub fn parse(definition: &str) -> Result<Key, ParseError> {
        if definition.trim().is_empty() {
            return Err(ParseError::EmptyKey);
        }

        let mut tokens = tokenize(definition);
        let kind = match tokens.last().map(|t| EventKind::from_word(t)) {
            Some(Some(kind)) => kind,
            Some(None) => {
                // Combos with Meta/Control fire on key-down, plain keys on key-up
                let combo = tokens.iter().any(|t| t == META || t == CONTROL);
                let kind = if combo { EventKind::Down } else { EventKind::Up };
                tokens.push(kind.to_string());
                kind
            }
            None => return Err(ParseError::EmptyKey),
        };

        let significant = &tokens[tokens.len().saturating_sub(2)];
        let is_code = significant.chars().count() > 1;
        let modifiers = &tokens[..tokens.len().saturating_sub(2)];
        let has = |word: &str| modifiers.iter().any(|m| m.eq_ignore_ascii_case(word));

        Ok(Key {
            identifier: significant.clone(),
            is_code,
            mods: Modifiers::new(has(SHIFT), has(CONTROL), has(ALT), has(META)),
            allow_in_input: !has(NO_INPUT),
            kind,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// True when the identifier is a platform code rather than a character
    pub fn is_code(&self) -> bool {
        self.is_code
    }

    pub fn mods(&self) -> Modifiers {
        self.mods
    }

    pub fn allow_in_input(&self) -> bool {
        self.allow_in_input
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Check whether a raw event satisfies this key
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.kind != self.kind {
            return false;
        }
        if !self.allow_in_input && event.in_input {
            return false;
        }
        if event.mods != self.mods {
            return false;
        }
        let actual = if self.is_code { &event.code } else { &event.key };
        *actual == self.identifier
    }

    /// Render the key as a definition string
    ///
    /// The short form uses modifier symbols (`^s`), the long form spelled out
    /// words (`Control s Down`). Neither is guaranteed to be stable.
    pub fn to_string_with(&self, short: bool, platform: Platform) -> String {
        let mac = platform.is_mac();
        if short {
            let mut out = String::new();
            if !self.allow_in_input {
                out.push(':');
            }
            if self.mods.meta() {
                out.push(if mac { '⌘' } else { '@' });
            }
            if self.mods.ctrl() {
                out.push('^');
            }
            if self.mods.alt() {
                out.push(if mac { '⌥' } else { '#' });
            }
            if self.mods.shift() {
                out.push('+');
            }
            match alias_for_code(&self.identifier).filter(|_| self.is_code) {
                Some(glyph) => out.push_str(glyph),
                None => out.push_str(&self.identifier),
            }
            if self.kind != default_kind(self.mods) {
                out.push(' ');
                out.push_str(&self.kind.to_string());
            }
            return out;
        }

        let mut parts: Vec<String> = Vec::new();
        if !self.allow_in_input {
            parts.push(NO_INPUT.to_string());
        }
        if self.mods.meta() {
            parts.push(if mac { "Command" } else { META }.to_string());
        }
        if self.mods.ctrl() {
            parts.push(CONTROL.to_string());
        }
        if self.mods.alt() {
            parts.push(ALT.to_string());
        }
        if self.mods.shift() {
            parts.push(SHIFT.to_string());
        }
        parts.push(self.identifier.clone());
        parts.push(self.kind.to_string());
        parts.join(" ")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with(false, Platform::current()))
    }
}

/// Event type a rendered key gets when none is written out
fn default_kind(mods: Modifiers) -> EventKind {
    if mods.meta() || mods.ctrl() {
        EventKind::Down
    } else {
        EventKind::Up
    }
}

/// Split a definition into canonical words: aliases and modifier symbols
/// become standalone words, underscores join multi-word names
fn tokenize(definition: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut rest = definition;

    fn flush(word: &mut String, tokens: &mut Vec<String>) {
        if !word.is_empty() {
            tokens.push(std::mem::take(word));
        }
    }

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            flush(&mut word, &mut tokens);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        if let Some((glyph, name)) = CODE_ALIASES.iter().find(|(g, _)| rest.starts_with(g)) {
            flush(&mut word, &mut tokens);
            tokens.push((*name).to_string());
            rest = &rest[glyph.len()..];
            continue;
        }

        if let Some((len, modifier)) = modifier_at(rest) {
            flush(&mut word, &mut tokens);
            tokens.push(modifier.to_string());
            rest = &rest[len..];
            continue;
        }

        if c == '_' {
            let after = rest.trim_start_matches('_');
            if after.chars().next().is_some_and(char::is_alphanumeric) {
                flush(&mut word, &mut tokens);
            } else {
                word.push_str(&rest[..rest.len() - after.len()]);
            }
            rest = after;
            continue;
        }

        word.push(c);
        rest = &rest[c.len_utf8()..];
    }
    flush(&mut word, &mut tokens);

    tokens
}

/// Recognize a modifier symbol or word at the start of `rest`, returning its
/// byte length and canonical word
fn modifier_at(rest: &str) -> Option<(usize, &'static str)> {
    let starts_with_word = |word: &str| {
        rest.get(..word.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(word))
    };
    let run_of = |symbols: &[char]| {
        let tail = rest.trim_start_matches(symbols);
        rest.len() - tail.len()
    };

    let c = rest.chars().next()?;
    match c {
        ':' => Some((1, NO_INPUT)),
        '@' | '⌘' => Some((c.len_utf8(), META)),
        '^' => Some((1, CONTROL)),
        '#' | '⌥' => Some((run_of(&['#', '⌥']), ALT)),
        '+' | '⇧' => Some((run_of(&['+', '⇧']), SHIFT)),
        _ if starts_with_word("command") => Some((7, META)),
        _ if starts_with_word("ctrl") => Some((4, CONTROL)),
        _ => None,
    }
}
