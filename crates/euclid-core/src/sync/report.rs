use std::collections::{BTreeMap, BTreeSet};

use crate::error::SyncError;
use crate::version::ComponentVersion;

/// Outcome of applying one plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub succeeded: BTreeSet<String>,
    pub failed: BTreeMap<String, SyncError>,
    /// Already up to date; not touched.
    pub skipped: BTreeSet<String>,
    /// Pending but never started because the cycle was cancelled.
    pub cancelled: BTreeSet<String>,
    /// Version now on disk for every succeeded component.
    pub applied: BTreeMap<String, ComponentVersion>,
}

impl SyncReport {
    pub(crate) fn record_success(&mut self, id: &str, version: ComponentVersion) {
        self.succeeded.insert(id.to_string());
        self.applied.insert(id.to_string(), version);
    }

    pub(crate) fn record_failure(&mut self, id: &str, error: SyncError) {
        self.failed.insert(id.to_string(), error);
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Every component is in place: nothing failed or was cancelled.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.cancelled.is_empty()
    }
}
