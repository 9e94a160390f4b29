//! Keyboard shortcut definitions and sequence matching
//!
//! This module provides:
//! - A compact grammar for key definitions (`^s`, `:@KeyK`, `#+Escape up`)
//! - Multi-key sequences with platform and prevent-default markers
//! - A state machine that buffers recent events and fires matching reactions
//! - YAML shortcut files resolved against named actions
//!
//! # Architecture
//!
//! ```text
//! EventSource → KeyEvent → Keywatch::handle_event() → buffer → Registry scan → Reaction
//! ```
//!
//! # Watching Shortcuts
//!
//! ```ignore
//! let mut watch = Keywatch::with_source(DetachedSource);
//! let disposer = watch.watch("!^s", reaction(|_, _| save()));
//! watch.watch("ESC,w,+1,ENTER", reaction(|_, _| write_quit()));
//!
//! watch.handle_event(&mut event);
//! watch.dispose(&disposer);
//! ```

mod config;
mod error;
mod format;
mod handle;
mod key;
#[allow(clippy::module_inception)]
mod keywatch;
mod registry;
mod sequence;
mod source;
mod types;
mod unfold;

pub use config::{
    load_shortcuts_file, parse_shortcuts_yaml, ActionTable, KeysConfig, ShortcutConfig,
    ShortcutFile, TreeNode,
};
pub use error::{ConfigError, ParseError, RegistrationError};
pub use format::format_key_event;
pub use handle::{Disposer, Scope};
pub use key::{alias_for_code, Key};
pub use keywatch::Keywatch;
pub use registry::{Registration, RegistrationId, WatchRef, DEFAULT_DEPTH_WARNING};
pub use sequence::KeySequence;
pub use source::{DetachedSource, EventSource, LISTENED_KINDS};
pub use types::{EventKind, KeyEvent, Modifiers, Platform, SystemRestriction};
pub use unfold::{
    reaction, unfold, unfold_with_diagnostics, Binding, Definition, MapEntry, Provider, Reaction,
    Record, SequenceSpec, ShortcutMap, Unfolded,
};
