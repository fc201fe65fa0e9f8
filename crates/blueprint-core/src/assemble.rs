//! Blueprint assembly
//!
//! Steps are emitted in a fixed order:
//!
//! 1. `installPlugin` for every resolvable, non-excluded plugin, in plan order
//! 2. `installTheme` unless the theme is excluded or unknown to the catalog
//! 3. one `setSiteOptions` with the option snapshot
//! 4. `runSql` with the replay script, when mutations were selected
//! 5. caller-supplied extra steps, unchanged
//!
//! Anything left out is reported in [`Assembly::skipped`]; assembly itself
//! never fails.

use std::collections::BTreeSet;
use std::fmt;

use blueprint_capture::{CaptureLog, MutationStore};
use blueprint_manifest::{Manifest, PreferredVersions, ResourceDescriptor, Step};
use blueprint_resolve::{Catalog, Resolver, TtlCache};
use serde_json::{Map, Value};

use crate::config::ManifestDefaults;
use crate::plan::{PlannedStep, plan};
use crate::snapshot::SiteState;
use crate::unit::InstallableUnit;

/// Everything one generation request needs
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyContext {
    /// Active plugins in enumeration order
    pub units: Vec<InstallableUnit>,
    /// Active theme slug
    pub theme: Option<String>,
    /// Plugin or theme slugs to leave out
    pub exclude: BTreeSet<String>,
    pub exclude_all_units: bool,
    pub exclude_theme: bool,
    /// Option snapshot, in embedding order
    pub options: Map<String, Value>,
    /// Captured mutation sequences to replay
    pub selected_mutations: Vec<u64>,
    /// Appended after every generated step
    pub extra_steps: Vec<Step>,
    pub versions: PreferredVersions,
}

impl AssemblyContext {
    /// An empty context for the given runtime versions.
    pub fn new(versions: PreferredVersions) -> Self {
        Self {
            units: Vec::new(),
            theme: None,
            exclude: BTreeSet::new(),
            exclude_all_units: false,
            exclude_theme: false,
            options: Map::new(),
            selected_mutations: Vec::new(),
            extra_steps: Vec::new(),
            versions,
        }
    }

    /// Capture the site's plugins, theme, versions and the named options.
    ///
    /// Options the site does not have are embedded as `false`, which is
    /// what the host reports for them.
    pub fn from_site(site: &impl SiteState, option_names: &[String]) -> Self {
        let mut context = Self::new(PreferredVersions::new(
            site.php_version(),
            site.wp_version(),
        ));
        context.units = site.active_units();
        context.theme = site.theme().map(str::to_string);
        for name in option_names {
            let value = site.option(name).unwrap_or(Value::Bool(false));
            context.options.insert(name.clone(), value);
        }
        context
    }
}

/// Plugin or theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Plugin,
    Theme,
}

/// Why an item is missing from the blueprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkippedReason {
    /// The caller asked to leave it out
    Excluded,
    /// No installable source is known
    Unavailable,
}

impl fmt::Display for SkippedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded => write!(f, "excluded"),
            Self::Unavailable => write!(f, "not available"),
        }
    }
}

/// A plugin or theme left out of the blueprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub id: String,
    pub kind: ItemKind,
    pub reason: SkippedReason,
}

/// Result of one generation request
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub manifest: Manifest,
    /// Plugin install plan, in manifest order
    pub planned: Vec<PlannedStep>,
    /// Items left out, plugins first
    pub skipped: Vec<SkippedItem>,
}

impl Assembly {
    /// Slugs of every skipped item.
    pub fn skipped_ids(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.id.as_str()).collect()
    }
}

/// Builds blueprints from a site context.
pub struct Assembler<'a, C, K> {
    resolver: &'a mut Resolver<C, K>,
    defaults: ManifestDefaults,
}

impl<'a, C: Catalog, K: TtlCache> Assembler<'a, C, K> {
    pub fn new(resolver: &'a mut Resolver<C, K>) -> Self {
        Self {
            resolver,
            defaults: ManifestDefaults::default(),
        }
    }

    /// Use configured manifest metadata.
    pub fn with_defaults(mut self, defaults: ManifestDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Assemble a blueprint, taking the replay script from `log`.
    pub fn assemble<S: MutationStore>(
        &mut self,
        context: AssemblyContext,
        log: &CaptureLog<S>,
    ) -> Assembly {
        let AssemblyContext {
            units,
            theme,
            exclude,
            exclude_all_units,
            exclude_theme,
            options,
            selected_mutations,
            extra_steps,
            versions,
        } = context;

        let mut manifest = self.defaults.manifest(versions);
        let mut skipped = Vec::new();

        let mut resolved = Vec::new();
        for unit in units {
            if exclude_all_units || exclude.contains(&unit.id) {
                skipped.push(SkippedItem {
                    id: unit.id,
                    kind: ItemKind::Plugin,
                    reason: SkippedReason::Excluded,
                });
                continue;
            }
            match self.resolver.resolve(&unit.id) {
                ResourceDescriptor::Unavailable => skipped.push(SkippedItem {
                    id: unit.id,
                    kind: ItemKind::Plugin,
                    reason: SkippedReason::Unavailable,
                }),
                resource => resolved.push((unit, resource)),
            }
        }

        let planned = plan(resolved);
        for step in &planned {
            if let Some(resource) = step.resource.to_plugin_resource() {
                manifest
                    .steps
                    .push(Step::install_plugin(resource, &step.unit.display_name));
            }
        }

        if let Some(theme) = theme {
            if exclude_theme || exclude.contains(&theme) {
                skipped.push(SkippedItem {
                    id: theme,
                    kind: ItemKind::Theme,
                    reason: SkippedReason::Excluded,
                });
            } else if self.resolver.theme_exists(&theme) {
                manifest.steps.push(Step::install_theme(theme));
            } else {
                skipped.push(SkippedItem {
                    id: theme,
                    kind: ItemKind::Theme,
                    reason: SkippedReason::Unavailable,
                });
            }
        }

        manifest.steps.push(Step::SetSiteOptions { options });

        if !selected_mutations.is_empty() {
            match log.export_replay_script(&selected_mutations) {
                Ok(script) if script.is_empty() => {
                    tracing::warn!(?selected_mutations, "selected mutations not found; omitting replay step");
                }
                Ok(script) => manifest.steps.push(Step::run_sql(script)),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read captured mutations; omitting replay step");
                }
            }
        }

        manifest.steps.extend(extra_steps);

        tracing::info!(
            steps = manifest.steps.len(),
            plugins = planned.len(),
            skipped = skipped.len(),
            "assembled blueprint"
        );

        Assembly {
            manifest,
            planned,
            skipped,
        }
    }
}
