//! A recording session from first captured write to replayed blueprint
//!
//! Plays the host's part: statements arrive through the write hook, the
//! operator pauses and resumes through persisted settings, and the final
//! blueprint replays a selection of what was captured.

use blueprint_capture::{CaptureLog, ExecutionContext, FileStore};
use blueprint_core::{
    Assembler, AssemblyContext, RecorderConfig, RecorderSettings, SiteSnapshot, StatePaths,
    skipped_notice_steps,
};
use blueprint_manifest::{FileResource, Step};
use blueprint_resolve::{MemoryCache, Resolver};
use blueprint_test_utils::{SITE_TOML, StateDir, fixture_catalog};
use pretty_assertions::assert_eq;

fn open_log(paths: &StatePaths, config: &RecorderConfig) -> CaptureLog<FileStore> {
    let settings = RecorderSettings::load(&paths.settings()).unwrap();
    CaptureLog::open(
        FileStore::new(paths.journal()),
        config.capture.clone(),
        settings.recording_enabled(),
    )
    .unwrap()
}

fn host_writes(log: &CaptureLog<FileStore>, statements: &[&str]) {
    for statement in statements {
        let passed = log.observe(statement, ExecutionContext::Interactive);
        assert_eq!(passed, *statement);
    }
}

#[test]
fn paused_writes_are_not_replayed() {
    let state = StateDir::new();
    let paths = StatePaths::new(state.root());
    let config = RecorderConfig::default();

    let log = open_log(&paths, &config);
    host_writes(
        &log,
        &[
            "INSERT INTO wp_posts (post_title, post_status) VALUES ('Welcome', 'publish')",
            "UPDATE wp_options SET option_value = 'x' WHERE option_name = '_transient_foo'",
            "INSERT INTO wp_posts (post_status) VALUES ('auto-draft')",
        ],
    );
    drop(log);

    RecorderSettings {
        recording_disabled: true,
    }
    .save(&paths.settings())
    .unwrap();
    host_writes(
        &open_log(&paths, &config),
        &["INSERT INTO wp_posts (post_title) VALUES ('While paused')"],
    );

    RecorderSettings::default().save(&paths.settings()).unwrap();
    let log = open_log(&paths, &config);
    host_writes(
        &log,
        &["UPDATE wp_posts SET post_title = 'Welcome!' WHERE ID = 1"],
    );

    let sequences: Vec<u64> = log.mutations().unwrap().iter().map(|m| m.sequence).collect();
    assert_eq!(sequences, vec![1, 2]);

    let script = log.export_replay_script(&[2, 1]).unwrap();
    assert_eq!(
        script,
        "INSERT INTO wp_posts (post_title, post_status) VALUES ('Welcome', 'publish');\n\
         UPDATE wp_posts SET post_title = 'Welcome!' WHERE ID = 1;\n"
    );
}

#[test]
fn blueprint_replays_selection_before_caller_steps() {
    let state = StateDir::new();
    let paths = StatePaths::new(state.root());
    let config = RecorderConfig::default();
    let log = open_log(&paths, &config);
    host_writes(
        &log,
        &[
            "INSERT INTO wp_posts (ID, post_title) VALUES (10, 'A')",
            "INSERT INTO wp_posts (ID, post_title) VALUES (11, 'B')",
        ],
    );

    let site = SiteSnapshot::from_toml(SITE_TOML).unwrap();
    let mut resolver = Resolver::new(fixture_catalog(), MemoryCache::new());

    // First pass finds what is missing; the notice rides along as extra steps
    let first_pass = Assembler::new(&mut resolver).assemble(
        AssemblyContext::from_site(&site, &config.manifest.option_names),
        &log,
    );
    let mut context = AssemblyContext::from_site(&site, &config.manifest.option_names);
    context.selected_mutations = vec![2];
    context.extra_steps = skipped_notice_steps(&first_pass.skipped);

    let assembly = Assembler::new(&mut resolver).assemble(context, &log);
    let tail: Vec<&str> = assembly
        .manifest
        .steps
        .iter()
        .rev()
        .take(4)
        .map(Step::kind)
        .collect();
    assert_eq!(tail, vec!["writeFile", "mkdir", "runSql", "setSiteOptions"]);

    let replay = assembly
        .manifest
        .steps
        .iter()
        .find_map(|s| match s {
            Step::RunSql { sql } => Some(sql.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        replay,
        FileResource::literal(
            "replay.sql",
            "INSERT INTO wp_posts (ID, post_title) VALUES (11, 'B');\n"
        )
    );
}

#[test]
fn cleared_journal_keeps_counting() {
    let state = StateDir::new();
    let paths = StatePaths::new(state.root());
    let config = RecorderConfig::default();

    let log = open_log(&paths, &config);
    host_writes(&log, &["INSERT INTO wp_posts VALUES (1)"]);
    log.clear(true).unwrap();
    host_writes(&log, &["INSERT INTO wp_posts VALUES (2)"]);
    log.clear(true).unwrap();
    drop(log);

    // A fresh request sees an empty journal but keeps counting
    let log = open_log(&paths, &config);
    host_writes(&log, &["INSERT INTO wp_posts VALUES (3)"]);

    let sequences: Vec<u64> = log.mutations().unwrap().iter().map(|m| m.sequence).collect();
    assert_eq!(sequences, vec![3]);
    assert!(blueprint_fs::read_locked(&paths.journal()).unwrap().is_some());
}
