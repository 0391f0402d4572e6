//! Comparable component version tokens
//!
//! Manifests and configs have historically used both bare integers (`2`) and
//! dotted strings (`"1.4.2"`). Both are mapped onto a single semver total order:
//! - `2` and `"2"` read as `2.0.0`
//! - `"1.4"` reads as `1.4.0`
//! - a leading `v` is ignored
//! - full semver (pre-release, build metadata) is accepted as-is
//!
//! Ordering and equality follow semver precedence, so build metadata is
//! ignored: `1.0.0+build.2` and `1.0.0+build.10` are the same version.
//!
//! The original token is kept for display and persistence. Integer tokens
//! above `i64::MAX` are written back as strings since TOML cannot hold them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid version '{input}': {reason}")]
pub struct InvalidVersion {
    pub input: String,
    pub reason: String,
}

/// A version token with a total order.
#[derive(Debug, Clone)]
pub struct ComponentVersion {
    raw: String,
    parsed: semver::Version,
}

impl ComponentVersion {
    pub fn parse(input: &str) -> Result<Self, InvalidVersion> {
        let raw = input.trim();
        let invalid = |reason: &str| InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let body = raw
            .strip_prefix('v')
            .or_else(|| raw.strip_prefix('V'))
            .unwrap_or(raw);
        if body.is_empty() {
            return Err(invalid("empty version"));
        }

        // Pad the numeric core ("2" / "1.4") before handing off to semver.
        let split_at = body.find(['-', '+']).unwrap_or(body.len());
        let (core, suffix) = body.split_at(split_at);
        let parts: Vec<&str> = core.split('.').collect();
        let all_numeric = parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
        if !all_numeric {
            return Err(invalid("expected numeric dotted version"));
        }
        let padded = match parts.len() {
            1 => format!("{core}.0.0{suffix}"),
            2 => format!("{core}.0{suffix}"),
            3 => body.to_string(),
            _ => return Err(invalid("too many version components")),
        };

        let parsed = semver::Version::parse(&padded).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    pub fn from_number(number: u64) -> Self {
        Self {
            raw: number.to_string(),
            parsed: semver::Version::new(number, 0, 0),
        }
    }

    /// The token as it was written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn as_semver(&self) -> &semver::Version {
        &self.parsed
    }

    fn as_number(&self) -> Option<u64> {
        if self.raw.bytes().all(|b| b.is_ascii_digit()) {
            self.raw.parse().ok()
        } else {
            None
        }
    }
}

impl PartialEq for ComponentVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ComponentVersion {}

impl PartialOrd for ComponentVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComponentVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parsed.cmp_precedence(&other.parsed)
    }
}

impl fmt::Display for ComponentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ComponentVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for ComponentVersion {
    fn from(number: u64) -> Self {
        Self::from_number(number)
    }
}

impl Serialize for ComponentVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number().and_then(|n| i64::try_from(n).ok()) {
            Some(number) => serializer.serialize_i64(number),
            None => serializer.serialize_str(&self.raw),
        }
    }
}

impl<'de> Deserialize<'de> for ComponentVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ComponentVersionVisitor)
    }
}

struct ComponentVersionVisitor;

impl Visitor<'_> for ComponentVersionVisitor {
    type Value = ComponentVersion;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a version string such as \"1.4.2\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ComponentVersion::from_number(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(ComponentVersion::from_number)
            .map_err(|_| E::custom(format!("version must not be negative: {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(E::custom(format!(
            "version {v} is a floating point number; quote it as a string"
        )))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        ComponentVersion::parse(v).map_err(E::custom)
    }
}
