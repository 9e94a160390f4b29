//! Keywatch - keyboard shortcut definitions and sequence matching
//!
//! This crate parses a compact shortcut grammar (`^s`, `!onlymac @k`,
//! `ESC,w,+1,ENTER`) and matches multi-key sequences against a stream of
//! keyboard events.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod keywatch;
pub mod replay;
pub mod tracing;

// Re-export commonly used types
pub use config::WatchConfig;
pub use keywatch::{
    reaction, Definition, Disposer, KeyEvent, KeySequence, Keywatch, Modifiers, Platform,
    WatchRef,
};
