//! Command-line argument parsing for the keywatch binary
//!
//! Supports:
//! - Loading a shortcut file (defaults to the config dir)
//! - Replaying an event script from a file or stdin
//! - Listing the parsed shortcuts

use clap::Parser;
use std::path::PathBuf;

/// Replay keyboard events against a shortcut file
#[derive(Parser, Debug)]
#[command(
    name = "keywatch",
    version,
    about = "Replay keyboard events against a shortcut file"
)]
pub struct CliArgs {
    /// Shortcut file (defaults to ~/.config/keywatch/shortcuts.yaml)
    #[arg(short = 's', long, value_name = "FILE")]
    pub shortcuts: Option<PathBuf>,

    /// Watcher config file (defaults to ~/.config/keywatch/config.yaml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Event script to replay; stdin when omitted
    #[arg(short = 'e', long, value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// List the parsed shortcuts instead of replaying events
    #[arg(short = 'p', long)]
    pub print: bool,
}

/// Where the event script comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventInput {
    Stdin,
    File(PathBuf),
}

impl CliArgs {
    pub fn event_input(&self) -> EventInput {
        match &self.events {
            Some(path) if path.as_os_str() != "-" => EventInput::File(path.clone()),
            _ => EventInput::Stdin,
        }
    }

    /// Shortcut file to load, falling back to the config dir
    pub fn shortcuts_path(&self) -> Option<PathBuf> {
        self.shortcuts
            .clone()
            .or_else(crate::config_paths::shortcuts_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["keywatch"]).unwrap();
        assert!(!args.print);
        assert_eq!(args.event_input(), EventInput::Stdin);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_explicit_files() {
        let args = CliArgs::try_parse_from([
            "keywatch",
            "--shortcuts",
            "mine.yaml",
            "-e",
            "events.txt",
        ])
        .unwrap();
        assert_eq!(args.shortcuts_path(), Some(PathBuf::from("mine.yaml")));
        assert_eq!(
            args.event_input(),
            EventInput::File(PathBuf::from("events.txt"))
        );
    }

    #[test]
    fn test_dash_means_stdin() {
        let args = CliArgs::try_parse_from(["keywatch", "--events", "-"]).unwrap();
        assert_eq!(args.event_input(), EventInput::Stdin);
    }

    #[test]
    fn test_print_flag() {
        let args = CliArgs::try_parse_from(["keywatch", "-p"]).unwrap();
        assert!(args.print);
    }
}
