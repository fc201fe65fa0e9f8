//! Blueprint manifest types
//!
//! A blueprint is the declarative, ordered list of steps a provisioning
//! runtime executes to rebuild a site. The JSON shape produced here is a wire
//! contract with that runtime, so every type in this crate serialises to the
//! exact field names and discriminator strings the runtime expects.
//!
//! - [`Manifest`] - the top-level document
//! - [`Step`] - one installation or configuration step
//! - [`FileResource`] - where a step fetches its file from
//! - [`ResourceDescriptor`] - the resolver's answer for an installable unit

pub mod error;
pub mod manifest;
pub mod resource;
pub mod step;

pub use error::{Error, Result};
pub use manifest::{DEFAULT_PLAYGROUND_URL, Manifest, PreferredVersions};
pub use resource::{FileResource, ResourceDescriptor};
pub use step::{Progress, Step};
