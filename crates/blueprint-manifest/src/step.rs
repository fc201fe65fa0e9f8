//! Blueprint steps

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::FileResource;

/// Display hint the runtime shows while a step runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub caption: String,
}

/// A single blueprint step.
///
/// The set of variants is closed: these are the only step kinds the recorder
/// ever emits. Each serialises with a `step` discriminator naming the
/// runtime's operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step")]
pub enum Step {
    /// Install and activate a plugin
    #[serde(rename = "installPlugin", rename_all = "camelCase")]
    InstallPlugin {
        plugin_zip_file: FileResource,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        progress: Option<Progress>,
    },

    /// Install and activate a theme
    #[serde(rename = "installTheme", rename_all = "camelCase")]
    InstallTheme { theme_zip_file: FileResource },

    /// Write site-level configuration values
    #[serde(rename = "setSiteOptions")]
    SetSiteOptions { options: Map<String, Value> },

    /// Execute a batched data script
    #[serde(rename = "runSql")]
    RunSql { sql: FileResource },

    /// Unpack an archive into the site's filesystem
    #[serde(rename = "unzip", rename_all = "camelCase")]
    Unzip {
        zip_file: FileResource,
        extract_to_path: String,
    },

    /// Write a file
    #[serde(rename = "writeFile")]
    WriteFile { path: String, data: String },

    /// Create a directory
    #[serde(rename = "mkdir")]
    Mkdir { path: String },
}

impl Step {
    /// The wire discriminator of this step.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InstallPlugin { .. } => "installPlugin",
            Self::InstallTheme { .. } => "installTheme",
            Self::SetSiteOptions { .. } => "setSiteOptions",
            Self::RunSql { .. } => "runSql",
            Self::Unzip { .. } => "unzip",
            Self::WriteFile { .. } => "writeFile",
            Self::Mkdir { .. } => "mkdir",
        }
    }

    /// Install step for a plugin, captioned with its display name.
    pub fn install_plugin(resource: FileResource, display_name: &str) -> Self {
        Self::InstallPlugin {
            plugin_zip_file: resource,
            progress: Some(Progress {
                caption: format!("Installing {display_name}"),
            }),
        }
    }

    /// Install step for a theme hosted in the theme directory.
    pub fn install_theme(slug: impl Into<String>) -> Self {
        Self::InstallTheme {
            theme_zip_file: FileResource::theme(slug),
        }
    }

    /// Data script step carrying `script` as an inline file.
    pub fn run_sql(script: impl Into<String>) -> Self {
        Self::RunSql {
            sql: FileResource::literal("replay.sql", script),
        }
    }
}
