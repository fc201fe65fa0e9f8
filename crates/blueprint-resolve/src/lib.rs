//! Resource resolution for the blueprint recorder
//!
//! Maps an installed extension's slug to a [`ResourceDescriptor`] the
//! provisioning runtime can fetch:
//!
//! 1. the recorder's own slug always maps to its fixed distribution archive
//! 2. a fresh cache entry is returned as-is
//! 3. otherwise the [`Catalog`] is asked; registry downloads become
//!    `Registry`, recognised upstream archives become `MirroredUrl`, anything
//!    else (including catalog failures) becomes `Unavailable`
//!
//! Every non-hit result, negative ones included, is written back with a one
//! day TTL so the catalog sees at most one query per slug per day.
//!
//! [`ResourceDescriptor`]: blueprint_manifest::ResourceDescriptor

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod resolver;
pub mod rewrite;

pub use cache::{CacheEntry, FileCache, MemoryCache, TtlCache};
pub use catalog::{Catalog, CatalogError, PluginInfo, StaticCatalog, ThemeInfo};
pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use resolver::{DAY_IN_SECONDS, Resolver, ResolverConfig};
pub use rewrite::classify_download_link;
