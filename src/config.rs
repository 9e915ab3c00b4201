//! Application-level configuration loading, including the gameplay message templates.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TREASURE_HUNT_BACK_CONFIG_PATH";

/// Placeholder replaced with the next clue in the found-it template.
const CLUE_PLACEHOLDER: &str = "{clue}";

const DEFAULT_COMPLETION_MESSAGE: &str =
    "🏆 Congratulations! You have completed the treasure hunt!";
const DEFAULT_FOUND_MESSAGE: &str = "🏴‍☠️ Treasure found! {clue}";
const DEFAULT_FOUND_FALLBACK: &str = "🏴‍☠️ Treasure found! Look for the next treasure!";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    completion_message: String,
    found_message: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// built-in message templates.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded message templates from config");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Message returned when the last treasure is found.
    pub fn completion_message(&self) -> String {
        self.completion_message.clone()
    }

    /// Message returned on a non-final find, with the next clue substituted
    /// into the template.
    pub fn found_message(&self, clue: &str) -> String {
        if clue.is_empty() {
            return DEFAULT_FOUND_FALLBACK.to_owned();
        }
        self.found_message.replace(CLUE_PLACEHOLDER, clue)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            completion_message: DEFAULT_COMPLETION_MESSAGE.to_owned(),
            found_message: DEFAULT_FOUND_MESSAGE.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    completion_message: Option<String>,
    #[serde(default)]
    found_message: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            completion_message: value
                .completion_message
                .unwrap_or(defaults.completion_message),
            found_message: value.found_message.unwrap_or(defaults.found_message),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_message_substitutes_clue() {
        let config = AppConfig::default();
        let message = config.found_message("Look under the old oak.");
        assert!(message.contains("Look under the old oak."));
        assert!(!message.contains(CLUE_PLACEHOLDER));
    }

    #[test]
    fn found_message_falls_back_on_empty_clue() {
        let config = AppConfig::default();
        assert_eq!(config.found_message(""), DEFAULT_FOUND_FALLBACK);
    }
}
