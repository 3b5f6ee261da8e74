//! uiquery configuration system
//!
//! This crate provides centralized configuration management for uiquery,
//! loading settings from `uiquery.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "uiquery.toml";

/// Main configuration structure for uiquery
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct UiqConfig {
    /// Animation engine settings
    pub animation: AnimationConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Demo application settings
    pub demo: DemoConfig,
}

/// Animation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Delay between two animation ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Easing used by the slide transitions. Fades are always linear.
    pub slide_easing: String,
    /// Upper bound on timers run by a single `advance_time` or
    /// `run_until_idle` call
    pub max_timer_steps: usize,
    /// Undrained lifecycle events kept before the oldest are evicted
    pub max_lifecycle_events: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive handed to the logger when `RUST_LOG` is unset
    pub filter: String,
}

/// Demo application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// HTML document to load instead of the built-in sample
    pub document: Option<PathBuf>,
    /// Duration used by the scripted transitions
    pub duration_ms: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            slide_easing: "linear".to_string(),
            max_timer_steps: 100_000,
            max_lifecycle_events: 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            document: None,
            duration_ms: 400.0,
        }
    }
}

impl UiqConfig {
    /// Read and parse a TOML configuration file.
    ///
    /// # Returns
    /// * `Ok(UiqConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from `uiquery.toml` in the current directory
    /// or return default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE_NAME).unwrap_or_default()
    }

    /// Apply `UIQ_*` environment overrides on top of the loaded values.
    ///
    /// Unparseable numeric overrides are ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("UIQ_TICK_INTERVAL_MS") {
            if let Ok(interval) = val.parse::<u64>() {
                self.animation.tick_interval_ms = interval;
            }
        }
        if let Ok(easing) = std::env::var("UIQ_SLIDE_EASING") {
            self.animation.slide_easing = easing;
        }
        if let Ok(val) = std::env::var("UIQ_MAX_TIMER_STEPS") {
            if let Ok(steps) = val.parse::<usize>() {
                self.animation.max_timer_steps = steps;
            }
        }
        if let Ok(val) = std::env::var("UIQ_MAX_LIFECYCLE_EVENTS") {
            if let Ok(events) = val.parse::<usize>() {
                self.animation.max_lifecycle_events = events;
            }
        }
        if let Ok(filter) = std::env::var("UIQ_LOG") {
            self.logging.filter = filter;
        }
        if let Ok(path) = std::env::var("UIQ_DEMO_DOCUMENT") {
            self.demo.document = Some(PathBuf::from(path));
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from uiquery.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = UiqConfig::default();
        assert_eq!(config.animation.tick_interval_ms, 10);
        assert_eq!(config.animation.slide_easing, "linear");
        assert_eq!(config.logging.filter, "info");
        assert!(config.demo.document.is_none());
    }

    #[test]
    fn defaults_survive_toml_round_trip() {
        let config = UiqConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: UiqConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = UiqConfig::from_toml_str(
            r#"
            [animation]
            tick_interval_ms = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.animation.tick_interval_ms, 16);
        assert_eq!(config.animation.slide_easing, "linear");
        assert_eq!(config.animation.max_timer_steps, 100_000);
        assert_eq!(config.animation.max_lifecycle_events, 1024);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[animation]\nslide_easing = \"easeOutQuad\"\n\n[demo]\nduration_ms = 250.0"
        )
        .unwrap();

        let config = UiqConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.animation.slide_easing, "easeOutQuad");
        assert_eq!(config.demo.duration_ms, 250.0);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = UiqConfig::load_from_file("/nonexistent/uiquery.toml").unwrap_err();
        assert!(err.starts_with("cannot read /nonexistent/uiquery.toml"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = UiqConfig::from_toml_str("[animation\ntick_interval_ms = 1").unwrap_err();
        assert!(err.starts_with("Failed to parse config file"));
    }
}
