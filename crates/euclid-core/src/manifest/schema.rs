//! Remote manifest schema
//!
//! ```yaml
//! components:          # `modules` is accepted too
//!   - id: core
//!     version: 2
//!     url: https://example.com/core.zip
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::version::ComponentVersion;

/// Desired state published by the remote side. Order is significant: it is
/// the order components are applied in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(alias = "modules", default)]
    pub components: Vec<ComponentDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub id: String,
    pub version: ComponentVersion,
    #[serde(alias = "download_url")]
    pub url: String,
}

impl Manifest {
    pub fn new(components: Vec<ComponentDescriptor>) -> Self {
        Self { components }
    }

    pub fn component(&self, id: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.component(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Reject duplicate ids and ids that cannot name a directory.
    ///
    /// Ids that differ only in case are duplicates: they share a directory on
    /// case-insensitive filesystems.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for component in &self.components {
            validate_component_id(&component.id)?;
            if !seen.insert(component.id.to_lowercase()) {
                return Err(format!("duplicate component id '{}'", component.id));
            }
            if component.url.trim().is_empty() {
                return Err(format!("component '{}' has an empty url", component.id));
            }
        }
        Ok(())
    }
}

impl ComponentDescriptor {
    pub fn new(
        id: impl Into<String>,
        version: impl Into<ComponentVersion>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            url: url.into(),
        }
    }
}

/// Component ids become directory names under the install root.
pub fn validate_component_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("component id must not be empty".to_string());
    }
    if id.starts_with('.') {
        return Err(format!("component id '{id}' must not start with '.'"));
    }
    if id.contains(['/', '\\', '\0']) {
        return Err(format!(
            "component id '{id}' must not contain path separators"
        ));
    }
    if id.trim() != id {
        return Err(format!(
            "component id '{id}' must not have surrounding whitespace"
        ));
    }
    Ok(())
}
