//! KeySequence: an ordered list of keys plus sequence-level flags
//!
//! A sequence definition is a comma separated list of key definitions,
//! optionally carrying markers anywhere before the last key:
//!
//! ```text
//! onlymac ^s          only eligible on macOS (also only-win, onlyunix, on-nix)
//! !^s                 prevent the default action (also no-default, prevent)
//! ESC,w,+1,ENTER      four keys, matched in this order
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::error::ParseError;
use super::key::Key;
use super::types::{KeyEvent, Platform, SystemRestriction};

static SYSTEM_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*)\bon(?:ly)?-?(win|mac|u?nix)\s+(.+)$")
        .expect("system marker pattern is valid")
});

static NO_DEFAULT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*)(^!|no-?default\s+|prevent\s+)(.+)$")
        .expect("no-default marker pattern is valid")
});

static KEY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,\s*").expect("separator pattern is valid"));

/// An ordered, non-empty list of keys that must be the most recent events
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeySequence {
    keys: Vec<Key>,
    prevent_default: bool,
    restriction: Option<SystemRestriction>,
}

impl KeySequence {
    pub fn new(
        keys: Vec<Key>,
        prevent_default: bool,
        restriction: Option<SystemRestriction>,
    ) -> Result<Self, ParseError> {
        if keys.is_empty() {
            return Err(ParseError::EmptySequence);
        }
        Ok(Self {
            keys,
            prevent_default,
            restriction,
        })
    }

    /// Parse a textual definition, honoring the system and no-default markers
    pub fn parse(definition: &str) -> Result<Self, ParseError> {
        let mut work = definition.to_string();
        let mut restriction = None;
        let mut prevent_default = false;

        if let Some(caps) = SYSTEM_MARKER.captures(&work) {
            restriction = SystemRestriction::from_marker(&caps[2]);
            work = splice(&caps[1], &caps[3]);
        }

        if let Some(caps) = NO_DEFAULT_MARKER.captures(&work) {
            prevent_default = true;
            work = splice(&caps[1], &caps[3]);
        }

        let tokens: Vec<&str> = KEY_SEPARATOR.split(&work).collect();
        let keys = parse_tokens(&tokens, definition)?;
        Self::new(keys, prevent_default, restriction)
    }

    /// Parse a definition given as separate key tokens; markers are not
    /// recognized in this form
    pub fn parse_keys<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        let keys = parse_tokens(&tokens, &tokens.join(","))?;
        Self::new(keys, false, None)
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn prevent_default(&self) -> bool {
        self.prevent_default
    }

    pub fn restriction(&self) -> Option<SystemRestriction> {
        self.restriction
    }

    /// Check whether the trailing events of `events` spell out this sequence
    ///
    /// Only the last `key_count()` events are inspected, in order.
    pub fn matches(&self, events: &[KeyEvent], platform: Platform) -> bool {
        if events.len() < self.keys.len() {
            return false;
        }
        if let Some(restriction) = self.restriction {
            if !restriction.allows(platform) {
                return false;
            }
        }

        let tail = &events[events.len() - self.keys.len()..];
        self.keys
            .iter()
            .zip(tail)
            .all(|(key, event)| key.matches(event))
    }

    /// Render the sequence as a definition string (see [`Key::to_string_with`])
    pub fn to_string_with(&self, short: bool, platform: Platform) -> String {
        let mut out = String::new();
        if let Some(restriction) = self.restriction {
            out.push_str("only");
            out.push_str(restriction.marker());
            out.push(' ');
        }
        if self.prevent_default {
            out.push_str(if short { "!" } else { "prevent " });
        }
        let keys: Vec<String> = self
            .keys
            .iter()
            .map(|k| k.to_string_with(short, platform))
            .collect();
        out.push_str(&keys.join(", "));
        out
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with(false, Platform::current()))
    }
}

/// Join the text around a removed marker
fn splice(before: &str, after: &str) -> String {
    format!("{before}{after}").trim().to_string()
}

fn parse_tokens(tokens: &[&str], definition: &str) -> Result<Vec<Key>, ParseError> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            Key::parse(token).map_err(|err| ParseError::InvalidKey {
                index,
                token: (*token).to_string(),
                definition: definition.to_string(),
                source: Box::new(err),
            })
        })
        .collect()
}
