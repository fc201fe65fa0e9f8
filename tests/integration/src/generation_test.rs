//! End-to-end blueprint generation
//!
//! Exercises the full flow against on-disk state: site snapshot -> resolver
//! with a persisted cache -> planner -> assembler -> JSON.

use blueprint_capture::{CaptureFilter, CaptureLog, MemoryStore};
use blueprint_core::{
    Assembler, Assembly, AssemblyContext, RecorderConfig, SiteSnapshot, SiteState,
};
use blueprint_manifest::{Manifest, ResourceDescriptor};
use blueprint_resolve::{FileCache, Resolver, StaticCatalog, TtlCache};
use blueprint_test_utils::{FakeCatalog, ManualClock, SITE_TOML, StateDir, fixture_catalog};
use pretty_assertions::assert_eq;

fn site() -> SiteSnapshot {
    SiteSnapshot::from_toml(SITE_TOML).unwrap()
}

fn context(config: &RecorderConfig) -> AssemblyContext {
    AssemblyContext::from_site(&site(), &config.manifest.option_names)
}

fn empty_log() -> CaptureLog<MemoryStore> {
    CaptureLog::open(MemoryStore::new(), CaptureFilter::default(), true).unwrap()
}

fn generate<C, K>(resolver: &mut Resolver<C, K>, context: AssemblyContext) -> Assembly
where
    C: blueprint_resolve::Catalog,
    K: TtlCache,
{
    Assembler::new(resolver).assemble(context, &empty_log())
}

#[test]
fn excluding_all_units_skips_every_active_plugin() {
    let config = RecorderConfig::default();
    let mut ctx = context(&config);
    ctx.exclude_all_units = true;

    let mut resolver = Resolver::new(fixture_catalog(), blueprint_resolve::MemoryCache::new());
    let assembly = generate(&mut resolver, ctx);

    assert_eq!(assembly.manifest.count_steps("installPlugin"), 0);
    let active: Vec<String> = site().active_units().into_iter().map(|u| u.id).collect();
    for id in &active {
        assert!(
            assembly.skipped_ids().contains(&id.as_str()),
            "{id} missing from skipped list"
        );
    }
    assert_eq!(assembly.manifest.count_steps("installTheme"), 1);
}

#[test]
fn generated_manifest_survives_json_round_trip() {
    let config = RecorderConfig::default();
    let mut resolver = Resolver::new(fixture_catalog(), blueprint_resolve::MemoryCache::new());
    let assembly = generate(&mut resolver, context(&config));

    let json = assembly.manifest.to_json().unwrap();
    let parsed = Manifest::from_json(&json).unwrap();

    assert_eq!(parsed, assembly.manifest);
    assert_eq!(parsed.to_json().unwrap(), json);
}

#[test]
fn dependency_precedes_dependent_and_self_is_mirrored() {
    let config = RecorderConfig::default();
    let mut resolver = Resolver::new(fixture_catalog(), blueprint_resolve::MemoryCache::new());
    let assembly = generate(&mut resolver, context(&config));

    let order: Vec<&str> = assembly
        .planned
        .iter()
        .map(|p| p.unit.id.as_str())
        .collect();
    let position = |id: &str| order.iter().position(|o| *o == id).unwrap();
    assert!(position("woocommerce") < position("woocommerce-payments"));

    let own = assembly
        .planned
        .iter()
        .find(|p| p.unit.id == "blueprint-recorder")
        .unwrap();
    assert_eq!(
        own.resource,
        ResourceDescriptor::MirroredUrl {
            url: "https://github-proxy.com/proxy/?repo=akirk/blueprint-recorder&branch=main"
                .to_string()
        }
    );
}

#[test]
fn persisted_cache_spares_catalog_on_second_run() {
    let state = StateDir::new();
    let cache_path = state.root().join("cache.json");
    let config = RecorderConfig::default();

    let mut first = Resolver::new(fixture_catalog(), FileCache::open(&cache_path).unwrap());
    let before = generate(&mut first, context(&config));
    // Self-reference never reaches the catalog
    assert_eq!(first.catalog().plugin_queries(), 4);

    let mut second = Resolver::new(fixture_catalog(), FileCache::open(&cache_path).unwrap());
    let after = generate(&mut second, context(&config));

    assert_eq!(second.catalog().plugin_queries(), 0);
    assert_eq!(second.catalog().theme_queries(), 0);
    assert_eq!(after.manifest, before.manifest);
    assert_eq!(after.skipped, before.skipped);
}

#[test]
fn persisted_cache_expires_after_a_day() {
    let state = StateDir::new();
    let cache_path = state.root().join("cache.json");
    let clock = ManualClock::new();
    let config = RecorderConfig::default();

    let mut first = Resolver::new(
        FakeCatalog::new(),
        FileCache::open_with_clock(&cache_path, clock.clone()).unwrap(),
    );
    let before = generate(&mut first, context(&config));
    assert!(before.skipped_ids().contains(&"woocommerce"));

    clock.advance(86_400);

    let mut second = Resolver::new(
        fixture_catalog(),
        FileCache::open_with_clock(&cache_path, clock.clone()).unwrap(),
    );
    let after = generate(&mut second, context(&config));

    assert!(!after.skipped_ids().contains(&"woocommerce"));
    assert_eq!(second.catalog().plugin_queries(), 4);
}

#[test]
fn file_catalog_and_config_drive_generation() {
    let state = StateDir::new();
    let catalog_path = state.write_catalog();
    let config_path = state.write(
        "config.toml",
        r#"
[manifest]
landing_page = "/shop/"
option_names = ["blogname", "rss_use_excerpt"]
"#,
    );

    let config = RecorderConfig::load(&config_path).unwrap();
    let catalog = StaticCatalog::load(&catalog_path).unwrap();
    let mut resolver = Resolver::with_config(
        catalog,
        blueprint_resolve::MemoryCache::new(),
        config.resolver.clone(),
    );
    let assembly = Assembler::new(&mut resolver)
        .with_defaults(config.manifest.clone())
        .assemble(context(&config), &empty_log());

    let json: serde_json::Value =
        serde_json::from_str(&assembly.manifest.to_json().unwrap()).unwrap();
    assert_eq!(json["landingPage"], "/shop/");
    let options = json["steps"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["step"] == "setSiteOptions")
        .unwrap();
    assert_eq!(
        options["options"],
        serde_json::json!({"blogname": "Recorded Site", "rss_use_excerpt": false})
    );
    assert_eq!(assembly.skipped_ids(), vec!["private-tool"]);
}
