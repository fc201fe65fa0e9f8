//! Generate command implementation

use std::collections::BTreeSet;
use std::path::PathBuf;

use blueprint_core::{
    Assembler, AssemblyContext, SiteSnapshot, SkippedReason, skipped_notice_steps,
};
use blueprint_capture::{CaptureLog, MemoryStore, MutationStore};
use blueprint_manifest::Step;
use blueprint_resolve::{Resolver, StaticCatalog};
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::context::RecorderContext;
use crate::error::{CliError, Result};
use crate::interactive;

/// How mutations are chosen for replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Listed(Vec<u64>),
    All,
    Interactive,
}

impl Selection {
    /// Whether no mutation can end up selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Listed(sequences) if sequences.is_empty())
    }
}

/// Options for the generate command
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub site: PathBuf,
    pub catalog: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub exclude_all_plugins: bool,
    pub exclude_theme: bool,
    pub selection: Selection,
    pub extra_steps: Option<PathBuf>,
    pub notice: bool,
    pub format: OutputFormat,
    pub playground: String,
}

/// Run the generate command
pub fn run_generate(ctx: &RecorderContext, options: GenerateOptions) -> Result<()> {
    let site = SiteSnapshot::load(&options.site)?;
    let catalog = match &options.catalog {
        Some(path) => StaticCatalog::load(path)?,
        None => {
            tracing::debug!("no catalog given; resolving from cache only");
            StaticCatalog::new()
        }
    };

    let mut context = AssemblyContext::from_site(&site, &ctx.config.manifest.option_names);
    context.exclude = options.exclude.into_iter().collect::<BTreeSet<_>>();
    context.exclude_all_units = options.exclude_all_plugins;
    context.exclude_theme = options.exclude_theme;
    if let Some(path) = &options.extra_steps {
        context.extra_steps = load_extra_steps(path)?;
    }

    let mut resolver = Resolver::with_config(catalog, ctx.open_cache()?, ctx.config.resolver.clone());
    let mut assembler = Assembler::new(&mut resolver).with_defaults(ctx.config.manifest.clone());

    // The journal is only read when something is to be replayed
    let journal = if options.selection.is_empty() {
        None
    } else {
        match ctx.open_log() {
            Ok(log) => Some(log),
            Err(e) => {
                tracing::warn!(error = %e, "cannot read captured mutations; omitting replay");
                None
            }
        }
    };

    let mut assembly = match &journal {
        Some(log) => {
            context.selected_mutations = select(options.selection, log)?;
            assembler.assemble(context, log)
        }
        None => {
            let empty = CaptureLog::open(MemoryStore::new(), ctx.config.capture.clone(), false)?;
            assembler.assemble(context, &empty)
        }
    };

    if options.notice {
        assembly
            .manifest
            .steps
            .extend(skipped_notice_steps(&assembly.skipped));
    }

    // Summary on stderr keeps stdout pipeable
    for planned in &assembly.planned {
        match &planned.annotation {
            Some(note) => eprintln!(
                "{} {} {}",
                "+".green(),
                planned.unit.display_name.cyan(),
                format!("({note})").dimmed()
            ),
            None => eprintln!("{} {}", "+".green(), planned.unit.display_name.cyan()),
        }
    }
    for item in &assembly.skipped {
        let marker = match item.reason {
            SkippedReason::Excluded => "-".dimmed(),
            SkippedReason::Unavailable => "!".yellow(),
        };
        eprintln!("{} {} ({})", marker, item.id, item.reason);
    }

    let output = match options.format {
        OutputFormat::Json => assembly.manifest.to_json()?,
        OutputFormat::Pretty => assembly.manifest.to_json_pretty()?,
        OutputFormat::Url => assembly.manifest.playground_url(&options.playground)?,
    };
    println!("{output}");

    Ok(())
}

fn select<S: MutationStore>(selection: Selection, log: &CaptureLog<S>) -> Result<Vec<u64>> {
    let mutations = || match log.mutations() {
        Ok(mutations) => mutations,
        Err(e) => {
            tracing::warn!(error = %e, "cannot list captured mutations; omitting replay");
            Vec::new()
        }
    };
    Ok(match selection {
        Selection::Listed(sequences) => sequences,
        Selection::All => mutations().iter().map(|m| m.sequence).collect(),
        Selection::Interactive => interactive::select_mutations(&mutations())?,
    })
}

fn load_extra_steps(path: &std::path::Path) -> Result<Vec<Step>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::user(format!("Cannot read extra steps {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_str(&content)?)
}
