//! TOML parser with helpful error messages

use anyhow::Result;

use super::schema::Config;

/// Parse euclid.toml content from string
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    Ok(config)
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// Enhance TOML parsing errors with the offending line
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    match error.span() {
        Some(span) => {
            let line_num = content[..span.start.min(content.len())]
                .bytes()
                .filter(|b| *b == b'\n')
                .count()
                + 1;
            let context = get_line_context(content, line_num);
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                context,
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::ComponentVersion;

    #[test]
    fn parses_canonical_record() {
        let config = parse_config_str(
            r#"
schema_version = 1
remote_manifest_url = "https://example.test/manifest.yml"
install_root = "/games/minecraft"
installed = true

[component_versions]
core = 2
shaders = "1.4.0"
"#,
        )
        .unwrap();

        assert!(config.installed);
        assert_eq!(
            config.installed_version("core"),
            Some(&ComponentVersion::from(2u64))
        );
        assert_eq!(config.installed_version("shaders").unwrap().raw(), "1.4.0");
    }

    #[test]
    fn accepts_legacy_key_names() {
        let config = parse_config_str(
            r#"
update_url = "https://example.test/remote.yml"
minecraft_folder = "/home/steve/.minecraft"

[modules]
kubejs = 3
"#,
        )
        .unwrap();

        assert_eq!(config.remote_manifest_url, "https://example.test/remote.yml");
        assert_eq!(
            config.install_root.as_deref(),
            Some(std::path::Path::new("/home/steve/.minecraft"))
        );
        assert!(config.component_versions.contains_key("kubejs"));
    }

    #[test]
    fn error_points_at_offending_line() {
        let err = parse_config_str("installed = true\ninstalled = = false\n").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("line 2"), "{text}");
        assert!(text.contains(">>>"), "{text}");
    }

    #[test]
    fn rejects_non_comparable_versions() {
        let result = parse_config_str("[component_versions]\ncore = \"latest\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn serialized_record_parses_back() {
        let mut config = Config::new();
        config.record_installed("core", ComponentVersion::from(2u64));
        let text = to_toml(&config).unwrap();
        assert!(text.contains("[component_versions]"));
        assert_eq!(parse_config_str(&text).unwrap(), config);
    }

    #[test]
    fn integer_version_beyond_toml_range_round_trips() {
        let mut config = Config::new();
        config.record_installed("core", ComponentVersion::from(u64::MAX));

        let text = to_toml(&config).unwrap();

        assert!(text.contains(&format!("core = \"{}\"", u64::MAX)), "{text}");
        let back = parse_config_str(&text).unwrap();
        assert_eq!(back.installed_version("core").unwrap().raw(), u64::MAX.to_string());
    }
}
