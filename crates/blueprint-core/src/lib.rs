//! Blueprint planning and assembly
//!
//! Turns a site's state into a blueprint:
//!
//! - [`unit`] - installable units and their declared requirements
//! - [`plan`] - dependency-ordered install planning
//! - [`snapshot`] - the [`SiteState`] view and its TOML-backed form
//! - [`assemble`] - the fixed-order step assembly
//! - [`notice`] - admin notice steps for skipped items
//! - [`config`] - recorder configuration, settings and state paths
//!
//! # Example
//!
//! ```
//! use blueprint_capture::{CaptureFilter, CaptureLog, MemoryStore};
//! use blueprint_core::{Assembler, AssemblyContext, InstallableUnit};
//! use blueprint_manifest::PreferredVersions;
//! use blueprint_resolve::{MemoryCache, Resolver, StaticCatalog};
//!
//! let mut resolver = Resolver::new(StaticCatalog::new(), MemoryCache::new());
//! let log = CaptureLog::open(MemoryStore::new(), CaptureFilter::default(), true).unwrap();
//!
//! let mut context = AssemblyContext::new(PreferredVersions::new("8.2.1", "6.5"));
//! context.units = vec![InstallableUnit::new("private-tool", "Private Tool")];
//!
//! let assembly = Assembler::new(&mut resolver).assemble(context, &log);
//! assert_eq!(assembly.skipped_ids(), vec!["private-tool"]);
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod notice;
pub mod plan;
pub mod snapshot;
pub mod unit;

pub use assemble::{
    Assembler, Assembly, AssemblyContext, ItemKind, SkippedItem, SkippedReason,
};
pub use config::{
    DEFAULT_OPTION_NAMES, ManifestDefaults, RecorderConfig, RecorderSettings, StatePaths,
};
pub use error::{Error, Result};
pub use notice::{MU_PLUGIN_DIR, NOTICE_FILE, skipped_notice_steps};
pub use plan::{DependencyGraph, PlannedStep, plan};
pub use snapshot::{PluginHeaders, SiteSnapshot, SiteState};
pub use unit::{InstallableUnit, parse_requires_header, slug_from_plugin_file};
