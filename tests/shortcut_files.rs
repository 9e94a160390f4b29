//! Shortcut files and watcher configuration loaded from disk

use std::fs;

use keywatch::config::WatchConfig;
use keywatch::keywatch::{load_shortcuts_file, ConfigError, KeyEvent, Modifiers, Platform};
use keywatch::replay::{parse_event_script, Fired, Replayer};
use tempfile::TempDir;

const SAMPLE_SHORTCUTS: &str = include_str!("../samples/shortcuts.yaml");

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn unix_config() -> WatchConfig {
    WatchConfig {
        platform: Some(Platform::Unix),
        ..WatchConfig::default()
    }
}

// ========================================================================
// Loading
// ========================================================================

#[test]
fn test_sample_file_loads() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "shortcuts.yaml", SAMPLE_SHORTCUTS);

    let file = load_shortcuts_file(&path).unwrap();
    assert!(!file.shortcuts.is_empty());
    assert!(file.action_names().contains(&"save"));
    for (spec, action) in file.entries() {
        assert!(spec.parse().is_ok(), "{} -> {}", spec.describe(), action);
    }
}

#[test]
fn test_invalid_file_reports_yaml_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.yaml", "shortcuts:\n  - keys: [\n");
    assert!(matches!(load_shortcuts_file(&path), Err(ConfigError::Yaml(_))));
}

#[test]
fn test_watch_config_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", "depth_warning: 3\nplatform: windows\n");

    let config = WatchConfig::load(&path);
    assert_eq!(config.depth_warning, 3);
    assert_eq!(config.effective_platform(), Platform::Windows);
}

#[test]
fn test_watch_config_invalid_falls_back() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "config.yaml", "depth_warning: many\n");
    assert_eq!(WatchConfig::load(&path), WatchConfig::default());
}

// ========================================================================
// Replay
// ========================================================================

#[test]
fn test_replay_reports_fired_actions() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "shortcuts.yaml",
        r#"
shortcuts:
  - keys: "!^s"
    action: save
  - keys: "i,d,d,q"
    action: idkfa
"#,
    );
    let file = load_shortcuts_file(&path).unwrap();
    let mut replayer = Replayer::new(&unix_config(), &file);
    assert_eq!(replayer.shortcut_count(), 2);

    let script = "\
# save
down ControlLeft ctrl
down KeyS ctrl
up KeyS ctrl
up ControlLeft
# cheat
down KeyI
up KeyI
down KeyD
up KeyD
down KeyD
up KeyD
down KeyQ
up KeyQ
";
    let mut fired = Vec::new();
    let mut prevented = 0;
    for (_, event) in parse_event_script(script).unwrap() {
        let outcome = replayer.feed(event);
        fired.extend(outcome.fired);
        prevented += usize::from(outcome.prevented);
    }

    assert_eq!(
        fired,
        vec![
            Fired {
                action: "save".to_string(),
                sequence: "!^s".to_string(),
            },
            Fired {
                action: "idkfa".to_string(),
                sequence: "i, d, d, q".to_string(),
            },
        ]
    );
    assert_eq!(prevented, 1);
}

#[test]
fn test_replay_respects_input_targets() {
    let file = keywatch::keywatch::parse_shortcuts_yaml(
        "shortcuts:\n  - keys: \":/\"\n    action: search\n",
    )
    .unwrap();
    let mut replayer = Replayer::new(&unix_config(), &file);

    replayer.feed(KeyEvent::down("Slash", "/").in_input(true));
    let outcome = replayer.feed(KeyEvent::up("Slash", "/").in_input(true));
    assert!(outcome.fired.is_empty());

    replayer.feed(KeyEvent::down("Slash", "/"));
    let outcome = replayer.feed(KeyEvent::up("Slash", "/").with_mods(Modifiers::NONE));
    assert_eq!(outcome.fired.len(), 1);
    assert!(replayer.watch().buffered().is_empty());
}
