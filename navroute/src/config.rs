//! Routing dispatcher configuration.
//!
//! Settings live in an optional `[routing]` section of the application's
//! INI config file. Parsing starts from the defaults and overlays any
//! values found in the file; this module is the single place where INI
//! key names are mapped to struct fields.

use ini::Ini;
use std::path::Path;
use thiserror::Error;

/// Default name of the background routing worker thread.
pub const DEFAULT_WORKER_THREAD_NAME: &str = "async-router";

/// Timeout value that lets the engine run until it finishes or is
/// cancelled.
pub const NO_TIMEOUT: u32 = 0;

/// Settings for the routing dispatcher.
#[derive(Debug, Clone)]
pub struct RoutingSettings {
    /// Per-request engine timeout in seconds; [`NO_TIMEOUT`] disables it.
    pub default_timeout_secs: u32,
    /// Name given to the background worker thread.
    pub worker_thread_name: String,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            default_timeout_secs: NO_TIMEOUT,
            worker_thread_name: DEFAULT_WORKER_THREAD_NAME.to_string(),
        }
    }
}

/// Errors produced while loading routing settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or parsed.
    #[error("Failed to load config file: {0}")]
    Load(#[from] ini::Error),

    /// A `[routing]` key holds a value that cannot be applied.
    #[error("Invalid value for [routing] {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl RoutingSettings {
    /// Loads settings from an INI file, overlaying the defaults.
    ///
    /// A file without a `[routing]` section yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path.as_ref())?;
        Self::from_ini(&ini)
    }

    /// Applies any `[routing]` values found in an already-parsed INI.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(section) = ini.section(Some("routing")) {
            if let Some(v) = section.get("timeout") {
                settings.default_timeout_secs =
                    v.trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue {
                            key: "timeout".to_string(),
                            value: v.to_string(),
                            reason: "expected a number of seconds, 0 for no timeout".to_string(),
                        })?;
            }
            if let Some(v) = section.get("worker_thread_name") {
                let v = v.trim();
                if v.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "worker_thread_name".to_string(),
                        value: v.to_string(),
                        reason: "thread name must not be empty".to_string(),
                    });
                }
                settings.worker_thread_name = v.to_string();
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RoutingSettings::default();
        assert_eq!(settings.default_timeout_secs, NO_TIMEOUT);
        assert_eq!(settings.worker_thread_name, DEFAULT_WORKER_THREAD_NAME);
    }

    #[test]
    fn test_missing_section_yields_defaults() {
        let ini = Ini::load_from_str("[other]\nkey = value\n").unwrap();
        let settings = RoutingSettings::from_ini(&ini).unwrap();
        assert_eq!(settings.default_timeout_secs, NO_TIMEOUT);
    }

    #[test]
    fn test_overlay_values() {
        let ini = Ini::load_from_str("[routing]\ntimeout = 30\nworker_thread_name = nav-worker\n")
            .unwrap();
        let settings = RoutingSettings::from_ini(&ini).unwrap();
        assert_eq!(settings.default_timeout_secs, 30);
        assert_eq!(settings.worker_thread_name, "nav-worker");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let ini = Ini::load_from_str("[routing]\ntimeout = soon\n").unwrap();
        let err = RoutingSettings::from_ini(&ini).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "timeout"));
    }

    #[test]
    fn test_empty_thread_name_is_rejected() {
        let ini = Ini::load_from_str("[routing]\nworker_thread_name =  \n").unwrap();
        let err = RoutingSettings::from_ini(&ini).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "worker_thread_name"
        ));
    }
}
