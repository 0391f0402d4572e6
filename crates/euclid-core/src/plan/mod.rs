//! Version diffing: local config vs. remote manifest.
//!
//! [`diff`] is a pure function of its inputs. The resulting [`UpdatePlan`]
//! keeps manifest order, which is also the order components are applied in,
//! so a manifest can list shared dependencies before the mods that need them.

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::manifest::Manifest;
use crate::version::ComponentVersion;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    UpToDate,
    NeedsUpdate {
        url: String,
        target: ComponentVersion,
    },
    NeedsInstall {
        url: String,
        target: ComponentVersion,
    },
}

impl Decision {
    pub fn is_pending(&self) -> bool {
        !matches!(self, Decision::UpToDate)
    }

    /// Download URL and target version for pending decisions.
    pub fn target(&self) -> Option<(&str, &ComponentVersion)> {
        match self {
            Decision::UpToDate => None,
            Decision::NeedsUpdate { url, target } | Decision::NeedsInstall { url, target } => {
                Some((url.as_str(), target))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub id: String,
    pub decision: Decision,
}

/// Per-component decisions in apply order. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePlan {
    entries: Vec<PlanEntry>,
}

impl UpdatePlan {
    pub fn from_entries(entries: Vec<PlanEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Decision> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.decision)
    }

    pub fn pending(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(|entry| entry.decision.is_pending())
    }

    /// True when nothing needs to be downloaded.
    pub fn is_steady(&self) -> bool {
        self.pending().next().is_none()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compare installed versions against the manifest.
///
/// Missing locally → install; remote newer → update; equal or locally newer →
/// up to date. Components only known locally are left out.
pub fn diff(config: &Config, manifest: &Manifest) -> UpdatePlan {
    let entries = manifest
        .components
        .iter()
        .map(|component| {
            let decision = match config.installed_version(&component.id) {
                None => Decision::NeedsInstall {
                    url: component.url.clone(),
                    target: component.version.clone(),
                },
                Some(local) if component.version > *local => Decision::NeedsUpdate {
                    url: component.url.clone(),
                    target: component.version.clone(),
                },
                Some(local) => {
                    if component.version < *local {
                        debug!(
                            id = %component.id,
                            local = %local,
                            remote = %component.version,
                            "Local version is newer than remote; not downgrading"
                        );
                    }
                    Decision::UpToDate
                }
            };
            PlanEntry {
                id: component.id.clone(),
                decision,
            }
        })
        .collect();

    UpdatePlan { entries }
}

/// Locally recorded components the manifest no longer lists.
///
/// Informational only: nothing is ever removed from disk for these.
pub fn orphaned(config: &Config, manifest: &Manifest) -> Vec<String> {
    config
        .component_versions
        .keys()
        .filter(|id| !manifest.contains(id))
        .cloned()
        .collect()
}
