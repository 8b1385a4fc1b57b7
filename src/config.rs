//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: explicit `--config` path, else `$XDG_CONFIG_HOME/cardtree/cardtree.toml`
//! 3. Environment variables: `CARDTREE_*` prefix
//! 4. Command line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// What a fresh store starts with when no seed file is configured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeedMode {
    /// The demo tree
    #[default]
    Sample,
    /// Only the root directory
    Empty,
}

impl std::str::FromStr for SeedMode {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sample" => Ok(SeedMode::Sample),
            "empty" => Ok(SeedMode::Empty),
            other => Err(ApplicationError::Config {
                message: format!("unknown seed mode '{other}', expected 'sample' or 'empty'"),
            }),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, keep base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_name: Option<String>,
    pub seed: Option<SeedMode>,
    pub seed_file: Option<PathBuf>,
    pub show_ids: Option<bool>,
}

/// Unified configuration for cardtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Name of the root directory (default: "root")
    pub root_name: String,
    /// Initial content when no seed file is given
    pub seed: SeedMode,
    /// JSON snapshot to seed the tree from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
    /// Show node ids when rendering the tree
    pub show_ids: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: "root".into(),
            seed: SeedMode::Sample,
            seed_file: None,
            show_ids: false,
        }
    }
}

/// Get the XDG config directory for cardtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cardtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cardtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(seed_file) = &self.seed_file {
            let expanded = expand_env_vars(seed_file.to_string_lossy().as_ref());
            self.seed_file = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_name: overlay
                .root_name
                .clone()
                .unwrap_or_else(|| self.root_name.clone()),
            seed: overlay.seed.unwrap_or(self.seed),
            seed_file: overlay.seed_file.clone().or_else(|| self.seed_file.clone()),
            show_ids: overlay.show_ids.unwrap_or(self.show_ids),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; replaces the global one and must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        match config_file {
            Some(path) => {
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        current = current.merge_with(&load_raw_settings(&global_path)?);
                    }
                }
            }
        }

        // 3. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply CARDTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(Environment::with_prefix("CARDTREE").separator("__"));

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("root_name") {
            settings.root_name = val;
        }
        if let Ok(val) = config.get_string("seed") {
            settings.seed = val.parse()?;
        }
        if let Ok(val) = config.get_string("seed_file") {
            settings.seed_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("show_ids") {
            settings.show_ids = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cardtree configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/cardtree/cardtree.toml (or --config <path>)
#   Env:  CARDTREE_* environment variables (explicit overrides)
#   CLI:  --seed-file, --empty, --ids

# Name of the root directory
# root_name = "root"

# Initial tree when no seed file is given: "sample" or "empty"
# seed = "sample"

# JSON snapshot to seed the tree from (see `cardtree export`)
# seed_file = "~/flashcards.json"

# Show node ids in `cardtree list`
# show_ids = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_seed_is_sample_with_root() {
        let settings = Settings::default();
        assert_eq!(settings.root_name, "root");
        assert_eq!(settings.seed, SeedMode::Sample);
        assert!(settings.seed_file.is_none());
        assert!(!settings.show_ids);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings::default();
        let overlay = RawSettings {
            root_name: Some("Karten".into()),
            seed: Some(SeedMode::Empty),
            seed_file: None,
            show_ids: None,
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.root_name, "Karten");
        assert_eq!(merged.seed, SeedMode::Empty);
        assert!(merged.seed_file.is_none());
        assert!(!merged.show_ids);
    }

    #[test]
    fn given_tilde_in_seed_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            seed_file: Some(PathBuf::from("~/cards.json")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let seed = settings.seed_file.unwrap();
        assert!(seed.to_string_lossy().starts_with(&home));
        assert!(!seed.to_string_lossy().contains('~'));
    }

    #[test]
    fn given_seed_mode_strings_when_parsing_then_case_insensitive() {
        assert_eq!("Empty".parse::<SeedMode>().unwrap(), SeedMode::Empty);
        assert_eq!("sample".parse::<SeedMode>().unwrap(), SeedMode::Sample);
        assert!("full".parse::<SeedMode>().is_err());
    }

    #[test]
    fn given_settings_when_rendering_toml_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.root_name.is_none());
    }
}
