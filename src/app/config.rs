use crate::app::cli::Cli;
use crate::app::errors::DumpError;
use crate::app::models::{RuntimeConfig, DEFAULT_PATTERN};
use anyhow::{Context, Result};
use regex::bytes::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PresetConfig {
    pub pattern: Option<String>,
    pub line_numbers: Option<bool>,
}

pub fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("repo_dump").join("presets.toml"))
}

pub fn load_presets_file(path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !path.exists() {
        log::debug!("no presets file at {:?}", path);
        return Ok(HashMap::new());
    }

    let content =
        fs::read_to_string(path).context(format!("Failed to read presets at {:?}", path))?;

    let parsed: PresetsFile = toml::from_str(&content)
        .context(format!("Failed to parse presets at {:?}", path))?;

    Ok(parsed.presets)
}

/// CLI flag > preset value > built-in default.
pub fn resolve_config(
    cli: &Cli,
    presets: &HashMap<String, PresetConfig>,
    project_name: Option<&str>,
) -> Result<RuntimeConfig, DumpError> {
    let preset = match project_name.and_then(|name| Some((name, presets.get(name)?))) {
        Some((name, preset)) => {
            log::debug!("using preset '{}'", name);
            preset.clone()
        }
        None => PresetConfig::default(),
    };

    let pattern = cli
        .pattern
        .clone()
        .or(preset.pattern)
        .unwrap_or_else(|| DEFAULT_PATTERN.to_string());

    let filter = Regex::new(&pattern).map_err(|source| DumpError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })?;

    Ok(RuntimeConfig {
        show_line_numbers: cli.line_numbers || preset.line_numbers.unwrap_or(false),
        pattern,
        filter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn presets() -> HashMap<String, PresetConfig> {
        let mut map = HashMap::new();
        map.insert(
            "docs".to_string(),
            PresetConfig {
                pattern: Some(r"\.md$".to_string()),
                line_numbers: Some(true),
            },
        );
        map
    }

    #[test]
    fn defaults_apply_without_flags_or_preset() {
        let config = resolve_config(&Cli::default(), &HashMap::new(), Some("app")).unwrap();
        assert_eq!(config.pattern, DEFAULT_PATTERN);
        assert!(!config.show_line_numbers);
    }

    #[test]
    fn preset_is_picked_by_project_name() {
        let config = resolve_config(&Cli::default(), &presets(), Some("docs")).unwrap();
        assert_eq!(config.pattern, r"\.md$");
        assert!(config.show_line_numbers);
        assert!(config.matches(std::ffi::OsStr::new("README.md")));
    }

    #[test]
    fn cli_pattern_overrides_preset() {
        let cli = Cli {
            pattern: Some(r"\.txt$".to_string()),
            ..Cli::default()
        };
        let config = resolve_config(&cli, &presets(), Some("docs")).unwrap();
        assert_eq!(config.pattern, r"\.txt$");
        assert!(config.show_line_numbers);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let cli = Cli {
            pattern: Some("(unclosed".to_string()),
            ..Cli::default()
        };
        let err = resolve_config(&cli, &HashMap::new(), None).unwrap_err();
        assert!(matches!(err, DumpError::InvalidPattern { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn missing_presets_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = load_presets_file(&dir.path().join("presets.toml")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn presets_file_parses_named_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.toml");
        fs::write(
            &path,
            concat!(
                "[android]\npattern = '\\.(kt|kts|java|xml)$'\nline_numbers = true\n\n",
                "[web]\npattern = '\\.tsx?$'\n",
            ),
        )
        .unwrap();

        let loaded = load_presets_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["android"].line_numbers, Some(true));
        assert_eq!(loaded["web"].pattern.as_deref(), Some(r"\.tsx?$"));
        assert_eq!(loaded["web"].line_numbers, None);
    }

    #[test]
    fn malformed_presets_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presets.toml");
        fs::write(&path, "[android]\npatern = 'typo'\n").unwrap();
        assert!(load_presets_file(&path).is_err());
    }
}
