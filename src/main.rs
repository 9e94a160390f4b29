use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use keywatch::cli::{CliArgs, EventInput};
use keywatch::config::WatchConfig;
use keywatch::keywatch::{load_shortcuts_file, ShortcutFile};
use keywatch::replay::{parse_event_script, Replayer};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    keywatch::tracing::init();

    let config = match &args.config {
        Some(path) => WatchConfig::load(path),
        None => WatchConfig::load_default(),
    };

    let path = args
        .shortcuts_path()
        .context("No shortcut file given and no config directory available")?;
    let file = load_shortcuts_file(&path)
        .with_context(|| format!("Failed to load shortcuts from {}", path.display()))?;

    if args.print {
        print_shortcuts(&file, &config);
        return Ok(());
    }

    let script = match args.event_input() {
        EventInput::File(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read events from {}", path.display()))?,
        EventInput::Stdin => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("Failed to read events from stdin")?;
            script
        }
    };
    let events = parse_event_script(&script)?;

    let mut replayer = Replayer::new(&config, &file);
    tracing::info!(
        shortcuts = replayer.shortcut_count(),
        events = events.len(),
        "replaying events"
    );

    for (_line, event) in events {
        let outcome = replayer.feed(event);
        for fired in &outcome.fired {
            println!("{}\t{}", fired.action, fired.sequence);
        }
        if outcome.prevented {
            println!("prevented");
        }
    }

    Ok(())
}

/// Print every shortcut, one `<sequence>\t<action>` per line
fn print_shortcuts(file: &ShortcutFile, config: &WatchConfig) {
    let platform = config.effective_platform();
    for (spec, action) in file.entries() {
        match spec.parse() {
            Ok(sequence) => println!("{}\t{}", sequence.to_string_with(true, platform), action),
            Err(e) => eprintln!("skipping \"{}\": {}", spec.describe(), e),
        }
    }
}
