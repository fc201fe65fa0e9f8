//! Capture command implementation

use std::io::BufRead;

use blueprint_capture::{ExecutionContext, Observation};
use colored::Colorize;

use crate::context::RecorderContext;
use crate::error::Result;

/// Counts reported by a capture run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    pub seen: usize,
    pub captured: usize,
    pub failed: usize,
}

/// How statements are separated on the input stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delimiter {
    /// One statement per line
    #[default]
    Newline,
    /// NUL-terminated statements, which may span lines
    Nul,
}

impl Delimiter {
    fn byte(self) -> u8 {
        match self {
            Self::Newline => b'\n',
            Self::Nul => b'\0',
        }
    }
}

/// Run the capture command over delimited statements
///
/// Statements are passed on exactly as read, minus the delimiter (and a
/// carriage return before a newline). Blank entries are ignored.
pub fn run_capture(
    ctx: &RecorderContext,
    context: ExecutionContext,
    mut input: impl BufRead,
    delimiter: Delimiter,
) -> Result<CaptureSummary> {
    let log = ctx.open_log()?;
    if !log.is_enabled() {
        eprintln!(
            "{} recording is paused; run {} to capture",
            "note:".yellow(),
            "blueprint recording resume".cyan()
        );
    }

    let mut summary = CaptureSummary::default();
    let mut buf = Vec::new();
    loop {
        if input.read_until(delimiter.byte(), &mut buf)? == 0 {
            break;
        }
        let statement = String::from_utf8(std::mem::take(&mut buf))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let statement = strip_delimiter(&statement, delimiter);
        if statement.trim().is_empty() {
            continue;
        }
        summary.seen += 1;
        match log.record(statement, context) {
            Observation::Captured(_) => summary.captured += 1,
            Observation::Skipped(reason) => tracing::debug!(%reason, "skipped"),
            Observation::Failed => summary.failed += 1,
        }
    }

    println!(
        "Captured {} of {} statements",
        summary.captured.to_string().green(),
        summary.seen
    );
    if summary.failed > 0 {
        eprintln!(
            "{} {} statements could not be stored",
            "warning:".yellow(),
            summary.failed
        );
    }

    Ok(summary)
}

fn strip_delimiter(entry: &str, delimiter: Delimiter) -> &str {
    match delimiter {
        Delimiter::Newline => {
            let line = entry.strip_suffix('\n').unwrap_or(entry);
            line.strip_suffix('\r').unwrap_or(line)
        }
        Delimiter::Nul => entry.strip_suffix('\0').unwrap_or(entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn counts_only_qualifying_statements() {
        let dir = TempDir::new().unwrap();
        let ctx = RecorderContext::load(dir.path(), None).unwrap();
        let input = Cursor::new(
            "INSERT INTO wp_posts VALUES (1)\n\n\
             UPDATE wp_options SET option_value = '1'\n\
             SELECT * FROM wp_posts\n",
        );

        let summary = run_capture(&ctx, ExecutionContext::Interactive, input, Delimiter::Newline).unwrap();

        assert_eq!(
            summary,
            CaptureSummary {
                seen: 3,
                captured: 1,
                failed: 0,
            }
        );
    }

    #[test]
    fn background_statements_are_not_captured() {
        let dir = TempDir::new().unwrap();
        let ctx = RecorderContext::load(dir.path(), None).unwrap();
        let input = Cursor::new("INSERT INTO wp_posts VALUES (1)\n");

        let summary = run_capture(&ctx, ExecutionContext::Background, input, Delimiter::Newline).unwrap();

        assert_eq!(summary.captured, 0);
        assert!(ctx.open_log().unwrap().mutations().unwrap().is_empty());
    }

    #[test]
    fn nul_delimited_statements_keep_embedded_newlines() {
        let dir = TempDir::new().unwrap();
        let ctx = RecorderContext::load(dir.path(), None).unwrap();
        let statement = "INSERT INTO wp_posts (post_content) VALUES ('line one\nline two')";
        let input = Cursor::new(format!("{statement}\0\n\0UPDATE wp_posts SET a = 1\0"));

        let summary = run_capture(&ctx, ExecutionContext::Interactive, input, Delimiter::Nul).unwrap();

        assert_eq!(
            summary,
            CaptureSummary {
                seen: 2,
                captured: 2,
                failed: 0,
            }
        );
        let stored: Vec<String> = ctx
            .open_log()
            .unwrap()
            .mutations()
            .unwrap()
            .into_iter()
            .map(|m| m.statement)
            .collect();
        assert_eq!(stored, vec![statement, "UPDATE wp_posts SET a = 1"]);
    }

    #[test]
    fn newline_mode_keeps_statement_text_untrimmed() {
        let dir = TempDir::new().unwrap();
        let ctx = RecorderContext::load(dir.path(), None).unwrap();
        let input = Cursor::new("  INSERT INTO wp_posts VALUES ('a ')  \r\n");

        run_capture(&ctx, ExecutionContext::Interactive, input, Delimiter::Newline).unwrap();

        let stored = ctx.open_log().unwrap().mutations().unwrap();
        assert_eq!(stored[0].statement, "  INSERT INTO wp_posts VALUES ('a ')  ");
    }
}
