//! Event scripts: recorded keyboard input replayed through a watcher
//!
//! One event per line:
//!
//! ```text
//! # comment
//! down ControlLeft ctrl
//! down KeyS key=s ctrl
//! up KeyS key=s ctrl input
//! ```
//!
//! When `key=` is omitted it is derived from the code: `KeyS` gives `s`,
//! `Digit1` gives `1`, `ShiftLeft` gives `Shift`, anything else is used as is.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::WatchConfig;
use crate::keywatch::{
    reaction, ActionTable, DetachedSource, Disposer, EventKind, KeyEvent, Keywatch, Modifiers,
    ShortcutFile,
};

/// A line of an event script could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("line {line}: unknown event kind \"{word}\", expected down, up or press")]
    UnknownKind { line: usize, word: String },

    #[error("line {line}: missing key code")]
    MissingCode { line: usize },

    #[error("line {line}: unknown flag \"{word}\"")]
    UnknownFlag { line: usize, word: String },
}

/// Parse one script line; blank lines and comments give `None`
pub fn parse_event_line(line_no: usize, line: &str) -> Result<Option<KeyEvent>, ReplayError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let kind_word = words.next().unwrap_or_default();
    let kind = match kind_word.to_ascii_lowercase().as_str() {
        "down" => EventKind::Down,
        "up" => EventKind::Up,
        "press" => EventKind::Press,
        _ => {
            return Err(ReplayError::UnknownKind {
                line: line_no,
                word: kind_word.to_string(),
            })
        }
    };
    let code = words.next().ok_or(ReplayError::MissingCode { line: line_no })?;

    let mut key = None;
    let mut mods = Modifiers::NONE;
    let mut in_input = false;
    for word in words {
        if let Some(value) = word.strip_prefix("key=") {
            key = Some(value.to_string());
            continue;
        }
        match word.to_ascii_lowercase().as_str() {
            "shift" => mods = mods | Modifiers::SHIFT,
            "ctrl" | "control" => mods = mods | Modifiers::CTRL,
            "alt" => mods = mods | Modifiers::ALT,
            "meta" | "cmd" => mods = mods | Modifiers::META,
            "input" => in_input = true,
            _ => {
                return Err(ReplayError::UnknownFlag {
                    line: line_no,
                    word: word.to_string(),
                })
            }
        }
    }

    let key = key.unwrap_or_else(|| key_for_code(code));
    Ok(Some(
        KeyEvent::new(kind, code, key)
            .with_mods(mods)
            .in_input(in_input),
    ))
}

/// Parse a whole script, numbering lines from 1
pub fn parse_event_script(script: &str) -> Result<Vec<(usize, KeyEvent)>, ReplayError> {
    let mut events = Vec::new();
    for (idx, line) in script.lines().enumerate() {
        if let Some(event) = parse_event_line(idx + 1, line)? {
            events.push((idx + 1, event));
        }
    }
    Ok(events)
}

fn key_for_code(code: &str) -> String {
    for modifier in ["Shift", "Control", "Alt", "Meta"] {
        if code.starts_with(modifier) {
            return modifier.to_string();
        }
    }
    match code.strip_prefix("Key").or_else(|| code.strip_prefix("Digit")) {
        Some(rest) if rest.chars().count() == 1 => rest.to_lowercase(),
        _ => code.to_string(),
    }
}

/// A reaction that fired while replaying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    pub action: String,
    pub sequence: String,
}

/// What one replayed event caused
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub fired: Vec<Fired>,
    pub prevented: bool,
}

/// A watcher loaded with a shortcut file whose actions report what fired
pub struct Replayer {
    watch: Keywatch,
    fired: Rc<RefCell<Vec<Fired>>>,
    disposer: Disposer,
}

impl Replayer {
    pub fn new(config: &WatchConfig, file: &ShortcutFile) -> Self {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let platform = config.effective_platform();

        let mut actions = ActionTable::new();
        for name in file.action_names() {
            let fired = fired.clone();
            let action = name.to_string();
            actions.insert(
                name,
                reaction(move |_, sequence| {
                    fired.borrow_mut().push(Fired {
                        action: action.clone(),
                        sequence: sequence.to_string_with(true, platform),
                    })
                }),
            );
        }

        let mut watch = Keywatch::new(config, DetachedSource);
        let disposer = watch.watch_with(file.to_definition(&actions), None, None);
        tracing::debug!(shortcuts = disposer.len(), "loaded shortcuts for replay");

        Self {
            watch,
            fired,
            disposer,
        }
    }

    /// Feed one event and report what it triggered
    pub fn feed(&mut self, mut event: KeyEvent) -> Outcome {
        self.watch.handle_event(&mut event);
        Outcome {
            fired: self.fired.borrow_mut().drain(..).collect(),
            prevented: event.default_prevented(),
        }
    }

    /// Number of shortcuts that were registered
    pub fn shortcut_count(&self) -> usize {
        self.disposer.len()
    }

    pub fn watch(&self) -> &Keywatch {
        &self.watch
    }
}
