//! Remote manifest: the authoritative list of components and versions.

pub mod fetcher;
pub mod format;
pub mod schema;

pub use fetcher::{ManifestFetcher, parse_manifest};
pub use format::ManifestFormat;
pub use schema::{ComponentDescriptor, Manifest, validate_component_id};
