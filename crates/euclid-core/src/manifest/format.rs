//! Manifest serialization formats.

use super::Manifest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
    Yaml,
}

impl ManifestFormat {
    /// Pick a format from the URL's path extension, falling back to the content.
    pub fn detect(url: &str, content: &str) -> Self {
        let path = url::Url::parse(url)
            .map(|u| u.path().to_ascii_lowercase())
            .unwrap_or_else(|_| url.to_ascii_lowercase());

        if path.ends_with(".json") {
            return Self::Json;
        }
        if path.ends_with(".toml") {
            return Self::Toml;
        }
        if path.ends_with(".yml") || path.ends_with(".yaml") {
            return Self::Yaml;
        }

        match content.trim_start().chars().next() {
            Some('{') | Some('[') => Self::Json,
            _ => Self::Yaml,
        }
    }

    pub fn parse(self, content: &str) -> Result<Manifest, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        assert_eq!(
            ManifestFormat::detect("https://a.test/m.json?ref=main", ""),
            ManifestFormat::Json
        );
        assert_eq!(
            ManifestFormat::detect("https://a.test/m.TOML", ""),
            ManifestFormat::Toml
        );
        assert_eq!(
            ManifestFormat::detect("https://a.test/remote_config.yml", "{"),
            ManifestFormat::Yaml
        );
    }

    #[test]
    fn sniffs_content_without_extension() {
        assert_eq!(
            ManifestFormat::detect("https://a.test/manifest", "  {\"components\": []}"),
            ManifestFormat::Json
        );
        assert_eq!(
            ManifestFormat::detect("https://a.test/manifest", "components: []"),
            ManifestFormat::Yaml
        );
    }

    #[test]
    fn toml_manifest_parses() {
        let manifest = ManifestFormat::Toml
            .parse(
                r#"
[[components]]
id = "core"
version = 2
url = "https://a.test/core.zip"
"#,
            )
            .unwrap();
        assert_eq!(manifest.components.len(), 1);
    }
}
