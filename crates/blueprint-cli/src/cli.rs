//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Blueprint Recorder - Record a site and replay it from a blueprint
#[derive(Parser, Debug)]
#[command(name = "blueprint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Recorder state directory
    #[arg(long, global = true, default_value = ".blueprint")]
    pub dir: PathBuf,

    /// Configuration file [default: <dir>/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// How a generated blueprint is printed
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    #[default]
    Pretty,
    /// Playground link carrying the blueprint
    Url,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate a blueprint from a site snapshot
    ///
    /// Examples:
    ///   blueprint generate --site site.toml --catalog catalog.json
    ///   blueprint generate --site site.toml --exclude akismet,hello
    ///   blueprint generate --site site.toml --select 1,2 --format url
    Generate {
        /// Site snapshot (TOML)
        #[arg(long)]
        site: PathBuf,

        /// Plugin and theme catalog (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Plugin or theme slugs to leave out
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Leave out every plugin
        #[arg(long)]
        exclude_all_plugins: bool,

        /// Leave out the theme
        #[arg(long)]
        exclude_theme: bool,

        /// Captured mutations to replay, by sequence number
        #[arg(long, value_delimiter = ',', conflicts_with_all = ["select_all", "interactive"])]
        select: Vec<u64>,

        /// Replay every captured mutation
        #[arg(long, conflicts_with = "interactive")]
        select_all: bool,

        /// Pick mutations to replay interactively
        #[arg(short, long)]
        interactive: bool,

        /// Extra steps (JSON array) appended after the generated ones
        #[arg(long)]
        extra_steps: Option<PathBuf>,

        /// Do not add the notice listing unavailable items
        #[arg(long)]
        no_notice: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Playground base URL for --format url
        #[arg(long, default_value = blueprint_manifest::DEFAULT_PLAYGROUND_URL)]
        playground: String,
    },

    /// Feed statements from stdin through the capture log
    ///
    /// Statements are read one per line. Use --null for statements that
    /// contain newlines, e.g. `printf '%s\0' "$sql" | blueprint capture --null`.
    Capture {
        /// Statements come from a scheduled job
        #[arg(long, conflicts_with = "installing")]
        background: bool,

        /// Statements come from the host installer
        #[arg(long)]
        installing: bool,

        /// Statements are NUL-terminated instead of newline-terminated
        #[arg(long)]
        null: bool,
    },

    /// Inspect or clear captured mutations
    Log {
        #[command(subcommand)]
        action: LogAction,
    },

    /// Pause, resume or inspect recording
    Recording {
        #[command(subcommand)]
        action: RecordingAction,
    },
}

/// Captured-mutation log actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum LogAction {
    /// List captured mutations
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Delete every captured mutation
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Recording actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingAction {
    /// Show whether recording is on
    Status,
    /// Stop capturing statements
    Pause,
    /// Start capturing statements again
    Resume,
}
