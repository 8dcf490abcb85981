//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treewalk/treewalk.toml`
//! 3. Local config: `<dir>/.treewalk.toml` (usually the working directory)
//! 4. Environment variables: `TREEWALK_*` prefix
//!
//! Command line flags are applied on top by the CLI layer.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One value per line
    #[default]
    Plain,
    /// JSON documents
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Unified configuration for treewalk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Output format (default: plain)
    pub format: OutputFormat,
    /// Separator between a node and its ancestors in plain output
    pub separator: String,
    /// Spaces per level when printing a traversal, 0 disables indentation
    pub indent: usize,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Plain,
            separator: " <- ".into(),
            indent: 2,
            pretty: true,
        }
    }
}

/// Get the XDG config directory for treewalk.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treewalk").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treewalk.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treewalk.toml")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treewalk.toml`
    pub fn load(local_dir: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_layers(
            global_config_path(),
            local_dir.map(local_config_path),
            Self::env_source(),
        )
    }

    fn env_source() -> Environment {
        Environment::with_prefix("TREEWALK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Build settings from explicit layers; missing files are skipped.
    fn load_layers(
        global: Option<PathBuf>,
        local: Option<PathBuf>,
        env: Environment,
    ) -> ApplicationResult<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("format", defaults.format.to_string())
            .map_err(config_err)?
            .set_default("separator", defaults.separator.clone())
            .map_err(config_err)?
            .set_default("indent", defaults.indent as i64)
            .map_err(config_err)?
            .set_default("pretty", defaults.pretty)
            .map_err(config_err)?;

        for path in [global, local].into_iter().flatten() {
            if path.exists() {
                debug!("config: loading {}", path.display());
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
        }

        let config = builder.add_source(env).build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    /// Render settings as TOML, as shown by `config show`.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::env_source().source(Some(vars))
    }

    #[test]
    fn given_no_layers_when_loading_then_uses_defaults() {
        let settings = Settings::load_layers(None, None, env_from(&[])).expect("load defaults");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_local_file_when_loading_then_overrides_global() {
        let global_dir = TempDir::new().unwrap();
        let local_dir = TempDir::new().unwrap();
        let global = global_dir.path().join("treewalk.toml");
        fs::write(&global, "format = \"json\"\nindent = 4\n").unwrap();
        fs::write(local_config_path(local_dir.path()), "indent = 0\n").unwrap();

        let settings = Settings::load_layers(
            Some(global),
            Some(local_config_path(local_dir.path())),
            env_from(&[]),
        )
        .expect("load layers");

        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.indent, 0);
        assert_eq!(settings.separator, " <- ");
    }

    #[test]
    fn given_env_vars_when_loading_then_env_wins() {
        let local_dir = TempDir::new().unwrap();
        fs::write(
            local_config_path(local_dir.path()),
            "separator = \" / \"\npretty = true\n",
        )
        .unwrap();

        let settings = Settings::load_layers(
            None,
            Some(local_config_path(local_dir.path())),
            env_from(&[("TREEWALK_SEPARATOR", ","), ("TREEWALK_PRETTY", "false")]),
        )
        .expect("load layers");

        assert_eq!(settings.separator, ",");
        assert!(!settings.pretty);
    }

    #[test]
    fn given_invalid_toml_when_loading_then_returns_config_error() {
        let local_dir = TempDir::new().unwrap();
        fs::write(local_config_path(local_dir.path()), "format = [\n").unwrap();

        let result = Settings::load_layers(
            None,
            Some(local_config_path(local_dir.path())),
            env_from(&[]),
        );
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_settings_when_rendering_toml_then_round_trips_fields() {
        let rendered = Settings::default().to_toml().expect("render");
        assert!(rendered.contains("format = \"plain\""));
        assert!(rendered.contains("indent = 2"));
    }
}
