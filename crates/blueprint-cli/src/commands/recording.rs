//! Recording command implementation

use blueprint_core::RecorderSettings;
use colored::Colorize;

use crate::cli::RecordingAction;
use crate::context::RecorderContext;
use crate::error::Result;

/// Run a `recording` action
pub fn run_recording(ctx: &RecorderContext, action: RecordingAction) -> Result<()> {
    let log = ctx.open_log()?;

    match action {
        RecordingAction::Status => {
            let state = if log.is_enabled() {
                "recording".green()
            } else {
                "paused".yellow()
            };
            println!("{}:     {}", "State".dimmed(), state);
            println!("{}: {}", "Captured".dimmed(), log.mutations()?.len());
            println!("{}:       {}", "Dir".dimmed(), ctx.root().display());
            return Ok(());
        }
        RecordingAction::Pause => log.pause(),
        RecordingAction::Resume => log.resume(),
    }

    ctx.save_settings(&RecorderSettings {
        recording_disabled: !log.is_enabled(),
    })?;

    if log.is_enabled() {
        println!("{} Recording resumed", "OK".green());
    } else {
        println!("{} Recording paused", "OK".green());
    }
    Ok(())
}
