//! Blueprint Recorder CLI
//!
//! Records a site's mutations and turns a site snapshot into a blueprint.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use blueprint_capture::ExecutionContext;
use cli::{Cli, Commands, LogAction};
use commands::generate::Selection;
use commands::{Delimiter, GenerateOptions};
use context::RecorderContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} Blueprint Recorder CLI", "blueprint".green().bold());
        println!();
        println!("Run {} for available commands.", "blueprint --help".cyan());
        return Ok(());
    };

    let ctx = RecorderContext::load(&cli.dir, cli.config.as_deref())?;
    execute_command(&ctx, command)
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

fn execute_command(ctx: &RecorderContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Generate {
            site,
            catalog,
            exclude,
            exclude_all_plugins,
            exclude_theme,
            select,
            select_all,
            interactive,
            extra_steps,
            no_notice,
            format,
            playground,
        } => {
            let selection = if select_all {
                Selection::All
            } else if interactive {
                Selection::Interactive
            } else {
                Selection::Listed(select)
            };
            commands::run_generate(
                ctx,
                GenerateOptions {
                    site,
                    catalog,
                    exclude,
                    exclude_all_plugins,
                    exclude_theme,
                    selection,
                    extra_steps,
                    notice: !no_notice,
                    format,
                    playground,
                },
            )
        }
        Commands::Capture {
            background,
            installing,
            null,
        } => {
            let context = if background {
                ExecutionContext::Background
            } else if installing {
                ExecutionContext::Installing
            } else {
                ExecutionContext::Interactive
            };
            let delimiter = if null {
                Delimiter::Nul
            } else {
                Delimiter::Newline
            };
            commands::run_capture(ctx, context, std::io::stdin().lock(), delimiter)?;
            Ok(())
        }
        Commands::Log { action } => match action {
            LogAction::List { json } => commands::run_log_list(ctx, json),
            LogAction::Clear { yes } => commands::run_log_clear(ctx, yes),
        },
        Commands::Recording { action } => commands::run_recording(ctx, action),
    }
}
