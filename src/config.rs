//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dsinterp/dsinterp.toml`
//! 3. Explicit config file given with `--config`
//! 4. Environment variables: `DSINTERP_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::FailurePolicy;
use crate::application::ApplicationError;

const ENV_PREFIX: &str = "DSINTERP";

/// Unified configuration for dsinterp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Stop a script at the first failing statement, or keep going
    pub on_error: FailurePolicy,
    /// Append failed statements to the history log
    pub record_failures: bool,
    /// strftime pattern for history timestamps
    pub time_format: String,
    /// Print the touched structure after each statement
    pub show_structure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            on_error: FailurePolicy::Abort,
            record_failures: true,
            time_format: "%H:%M:%S".into(),
            show_structure: false,
        }
    }
}

/// Raw settings for layered merging (`None` → not specified, inherit).
#[derive(Debug, Clone, Default, Deserialize)]
struct RawSettings {
    on_error: Option<FailurePolicy>,
    record_failures: Option<bool>,
    time_format: Option<String>,
    show_structure: Option<bool>,
}

/// Get the XDG config directory for dsinterp.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dsinterp").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dsinterp.toml"))
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

impl Settings {
    fn merge_with(mut self, overlay: &RawSettings) -> Self {
        if let Some(policy) = overlay.on_error {
            self.on_error = policy;
        }
        if let Some(record) = overlay.record_failures {
            self.record_failures = record;
        }
        if let Some(format) = &overlay.time_format {
            self.time_format = format.clone();
        }
        if let Some(show) = overlay.show_structure {
            self.show_structure = show;
        }
        self
    }

    /// Load configuration with layered precedence.
    ///
    /// An explicit file must exist; the global file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading explicit config");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current, Environment::with_prefix(ENV_PREFIX))
    }

    /// Apply DSINTERP_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        environment: Environment,
    ) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(environment.separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("on_error") {
            settings.on_error = parse_policy(&val)?;
        }
        if let Ok(val) = config.get_bool("record_failures") {
            settings.record_failures = val;
        }
        if let Ok(val) = config.get_string("time_format") {
            settings.time_format = val;
        }
        if let Ok(val) = config.get_bool("show_structure") {
            settings.show_structure = val;
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
        r#"# dsinterp configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/dsinterp/dsinterp.toml
#   Explicit: --config <file>
#   Env:      DSINTERP_* environment variables (e.g. DSINTERP_ON_ERROR=continue)

# What a script does after a failing statement: "abort" or "continue"
# on_error = "abort"

# Keep failed statements in the history log
# record_failures = true

# strftime pattern used when printing history
# time_format = "%H:%M:%S"

# Print the touched structure after each statement
# show_structure = false
"#
        .to_string()
    }
}

fn parse_policy(value: &str) -> Result<FailurePolicy, ApplicationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "abort" => Ok(FailurePolicy::Abort),
        "continue" => Ok(FailurePolicy::Continue),
        other => Err(ApplicationError::Config {
            message: format!("on_error must be 'abort' or 'continue', got '{other}'"),
        }),
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
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn given_default_settings_when_created_then_abort_and_record() {
        let settings = Settings::default();
        assert_eq!(settings.on_error, FailurePolicy::Abort);
        assert!(settings.record_failures);
        assert_eq!(settings.time_format, "%H:%M:%S");
        assert!(!settings.show_structure);
    }

    #[test]
    fn given_partial_file_when_merging_then_only_given_fields_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dsinterp.toml");
        std::fs::write(&path, "on_error = \"continue\"\n").unwrap();

        let merged = Settings::default().merge_with(&load_raw_settings(&path).unwrap());
        assert_eq!(merged.on_error, FailurePolicy::Continue);
        assert!(merged.record_failures);
    }

    #[test]
    fn given_env_vars_when_applied_then_override_file_values() {
        let base = Settings {
            on_error: FailurePolicy::Continue,
            ..Settings::default()
        };
        let settings = Settings::apply_env_overrides(
            base,
            env(&[
                ("DSINTERP_ON_ERROR", "abort"),
                ("DSINTERP_SHOW_STRUCTURE", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.on_error, FailurePolicy::Abort);
        assert!(settings.show_structure);
    }

    #[test]
    fn given_bad_policy_in_env_when_applied_then_config_error() {
        let result = Settings::apply_env_overrides(
            Settings::default(),
            env(&[("DSINTERP_ON_ERROR", "retry")]),
        );
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_settings_when_serialized_then_toml_roundtrips() {
        let toml_text = Settings::default().to_toml().unwrap();
        assert!(toml_text.contains("on_error = \"abort\""));
        let parsed: Settings = toml::from_str(&toml_text).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
