//! Applying update plans to the install root.

mod cancel;
mod report;
mod syncer;

pub use cancel::CancelToken;
pub use report::SyncReport;
pub use syncer::ArtifactSyncer;
