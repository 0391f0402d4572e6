//! EUCLID Core Library
//!
//! Keeps a game's mod directory in step with a remote manifest: load the local
//! config, fetch the manifest, diff installed versions, then download and
//! swap in every stale component.

pub mod archive;
pub mod config;
pub mod context;
pub mod download;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod orchestrator;
pub mod plan;
pub mod sync;
pub mod version;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{Config, ConfigStore};
    pub use crate::context::AppContext;

    // Errors
    pub use crate::error::{Result, SyncError};

    // Manifest and planning
    pub use crate::manifest::{ComponentDescriptor, Manifest, ManifestFetcher};
    pub use crate::plan::{Decision, PlanEntry, UpdatePlan, diff};
    pub use crate::version::ComponentVersion;

    // Collaborators
    pub use crate::archive::{ArchiveExtractor, ZipExtractor};
    pub use crate::download::{Downloader, HttpDownloader};

    // Sync
    pub use crate::orchestrator::{SyncOrchestrator, SyncPhase, SyncPreview};
    pub use crate::sync::{ArtifactSyncer, CancelToken, SyncReport};
}
