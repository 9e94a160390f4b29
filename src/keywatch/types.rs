//! Core types shared by the parser and the matcher: Modifiers, EventKind,
//! Platform, SystemRestriction and KeyEvent

use std::fmt;

use serde::{Deserialize, Serialize};

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(0b0001);
    pub const CTRL: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    /// Create modifiers from individual flags
    pub const fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if shift {
            bits |= 0b0001;
        }
        if ctrl {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0010 != 0
    }

    /// Check if alt/option is held
    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    /// Check if meta (cmd/win) is held
    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.shift() {
            parts.push("Shift");
        }
        if self.ctrl() {
            parts.push("Control");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.meta() {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Which phase of a physical key interaction an event (or key) describes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Down,
    Up,
    Press,
}

impl EventKind {
    /// Parse the trailing event-type word of a key definition.
    ///
    /// Only `up` and `down` are recognized by the grammar; `Press` can only
    /// be requested by constructing a [`Key`](super::Key) directly.
    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("down") {
            Some(EventKind::Down)
        } else if word.eq_ignore_ascii_case("up") {
            Some(EventKind::Up)
        } else {
            None
        }
    }

    /// Listener name used by DOM-like event sources
    pub fn listener_name(self) -> &'static str {
        match self {
            EventKind::Down => "keydown",
            EventKind::Up => "keyup",
            EventKind::Press => "keypress",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Down => write!(f, "Down"),
            EventKind::Up => write!(f, "Up"),
            EventKind::Press => write!(f, "Press"),
        }
    }
}

/// The operating system family the watcher is running on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Mac,
    Windows,
    #[serde(alias = "linux", alias = "other")]
    Unix,
}

impl Platform {
    /// Detect the platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    pub fn is_mac(self) -> bool {
        self == Platform::Mac
    }
}

/// An `only<os>` marker attached to a sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemRestriction {
    Mac,
    Windows,
    /// Anything that is neither Mac nor Windows
    Unix,
}

impl SystemRestriction {
    /// Map the marker word captured from a definition (`win`, `mac`, `nix`, `unix`)
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.to_ascii_lowercase().as_str() {
            "mac" => Some(SystemRestriction::Mac),
            "win" => Some(SystemRestriction::Windows),
            "nix" | "unix" => Some(SystemRestriction::Unix),
            _ => None,
        }
    }

    /// Whether a sequence with this restriction is eligible on `platform`
    pub fn allows(self, platform: Platform) -> bool {
        match self {
            SystemRestriction::Mac => platform == Platform::Mac,
            SystemRestriction::Windows => platform == Platform::Windows,
            SystemRestriction::Unix => platform == Platform::Unix,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            SystemRestriction::Mac => "mac",
            SystemRestriction::Windows => "win",
            SystemRestriction::Unix => "unix",
        }
    }
}

/// Key names reported by pure modifier keys
const MODIFIER_KEYS: [&str; 4] = ["Shift", "Control", "Alt", "Meta"];

/// A raw keyboard event as delivered by the host's event source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: EventKind,
    /// Layout-independent physical key code, e.g. `KeyS`, `Escape`
    pub code: String,
    /// Layout-dependent key value, e.g. `s`, `S`, `Escape`
    pub key: String,
    pub mods: Modifiers,
    /// Whether the event targets a text-input-like element
    pub in_input: bool,
    default_prevented: bool,
}

impl KeyEvent {
    pub fn new(kind: EventKind, code: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            key: key.into(),
            mods: Modifiers::NONE,
            in_input: false,
            default_prevented: false,
        }
    }

    pub fn down(code: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(EventKind::Down, code, key)
    }

    pub fn up(code: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(EventKind::Up, code, key)
    }

    /// Set the modifier state (builder pattern)
    pub fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    /// Mark the event as targeting an input element (builder pattern)
    pub fn in_input(mut self, in_input: bool) -> Self {
        self.in_input = in_input;
        self
    }

    /// Suppress the default action of this event
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether this event originates from Shift, Control, Alt or Meta alone
    pub fn is_modifier_key(&self) -> bool {
        MODIFIER_KEYS.contains(&self.key.as_str())
    }
}
