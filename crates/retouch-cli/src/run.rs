use std::path::Path;

use anyhow::Context;
use retouch_core::{EditSession, SessionConfig};
use tracing::{info, warn};

use crate::step::Step;
use crate::Cli;

/// Read settings from an optional JSON file, then apply flag overrides.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => SessionConfig::default(),
    };

    if let Some(limit) = cli.history_limit {
        config.history_limit = limit;
    }
    if let Some(quality) = cli.quality {
        config.jpeg_quality = quality;
    }
    Ok(config)
}

fn load_config_file(path: &Path) -> anyhow::Result<SessionConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

/// Run one step. Returns whether it changed the session.
pub fn run_step(session: &mut EditSession, step: Step) -> bool {
    match step {
        Step::Apply(op) => session.apply(op),
        Step::Undo => match session.try_undo() {
            Ok(()) => true,
            Err(e) => {
                warn!("undo skipped: {e}");
                false
            }
        },
        Step::Redo => match session.try_redo() {
            Ok(()) => true,
            Err(e) => {
                warn!("redo skipped: {e}");
                false
            }
        },
        Step::Reset => session.reset(),
    }
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = resolve_config(cli)?;
    let mut session = EditSession::with_config(config);

    let loaded = session
        .load(&cli.input)
        .with_context(|| format!("Failed to open {}", cli.input.display()))?;
    info!(width = loaded.width, height = loaded.height, "input ready");

    for step in &cli.steps {
        if !run_step(&mut session, *step) {
            info!(?step, "step had no effect");
        }
    }

    session
        .save(&cli.output)
        .with_context(|| format!("Failed to save {}", cli.output.display()))?;

    let done = session.info();
    info!(
        width = done.width,
        height = done.height,
        snapshots = session.history_len(),
        "wrote {}",
        cli.output.display()
    );
    Ok(())
}
