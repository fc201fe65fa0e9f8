//! Admin notice for items left out of a blueprint
//!
//! The provisioned site gets a must-use plugin that lists every plugin or
//! theme the blueprint could not install. These steps are produced on the
//! caller's side and handed to the assembler as extra steps.

use blueprint_manifest::Step;

use crate::assemble::{SkippedItem, SkippedReason};

/// Must-use plugin directory inside the provisioned filesystem
pub const MU_PLUGIN_DIR: &str = "wordpress/wp-content/mu-plugins";

/// File name of the notice plugin
pub const NOTICE_FILE: &str = "blueprint-recorder-message.php";

/// Steps that install the notice, or nothing when every item was available.
///
/// Items skipped on request are not listed.
pub fn skipped_notice_steps(skipped: &[SkippedItem]) -> Vec<Step> {
    let missing: Vec<&str> = skipped
        .iter()
        .filter(|item| item.reason == SkippedReason::Unavailable)
        .map(|item| item.id.as_str())
        .collect();

    if missing.is_empty() {
        return Vec::new();
    }

    vec![
        Step::Mkdir {
            path: MU_PLUGIN_DIR.to_string(),
        },
        Step::WriteFile {
            path: format!("{MU_PLUGIN_DIR}/{NOTICE_FILE}"),
            data: notice_plugin_source(&missing),
        },
    ]
}

fn notice_plugin_source(missing: &[&str]) -> String {
    let items: String = missing
        .iter()
        .map(|id| format!("<li>{}</li>", escape_html(id)))
        .collect();

    format!(
        "<?php add_action(\"admin_notices\", function() {{\
         echo \"<div class='notice notice-error is-dismissible' id='blueprint-recorder-message'>\
         <p><strong>The following plugins were not loaded since they are not available \
         in the WordPress.org plugin directory:</strong></p><ul>{items}</ul></div>\";\
         }});"
    )
}

/// Escape text for an HTML body inside a double-quoted PHP string.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            '$' => escaped.push_str("&#36;"),
            '\\' => escaped.push_str("&#92;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
