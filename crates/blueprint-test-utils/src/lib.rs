//! Shared test utilities for the blueprint recorder workspace.
//!
//! Dev-dependency only. Use from integration tests (`tests/`), not from
//! `#[cfg(test)]` modules, so the types line up with the library under test.
//!
//! # Modules
//!
//! - [`catalog`] - [`FakeCatalog`], a catalog that counts its queries
//! - [`clock`] - [`ManualClock`], a clock tests move by hand
//! - [`site`] - site snapshot and catalog fixtures

pub mod catalog;
pub mod clock;
pub mod site;

pub use catalog::FakeCatalog;
pub use clock::ManualClock;
pub use site::{CATALOG_JSON, SITE_TOML, StateDir, fixture_catalog};
