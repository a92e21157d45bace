//! Runtime configuration.
//!
//! Defaults reproduce the stock behaviour: taps 5% in from either edge at half
//! height, a 2 ms stroke, no completion watchdog. With the `config` feature the
//! values can be overridden from a TOML file:
//!
//! ```toml
//! [tap]
//! edge_ratio_left = 0.08
//! edge_ratio_right = 0.92
//!
//! [dispatcher]
//! completion_timeout_ms = 500
//! ```

use crate::error::{PageTurnerError, Result};
use std::time::Duration;

#[cfg(feature = "config")]
use std::path::{Path, PathBuf};

/// Default horizontal tap position for a LEFT action, as a fraction of width.
pub const DEFAULT_EDGE_RATIO_LEFT: f32 = 0.05;
/// Default horizontal tap position for a RIGHT action, as a fraction of width.
pub const DEFAULT_EDGE_RATIO_RIGHT: f32 = 0.95;
/// Default vertical tap position, as a fraction of height.
pub const DEFAULT_Y_RATIO: f32 = 0.5;
/// Default stroke duration in milliseconds.
pub const DEFAULT_TAP_DURATION_MS: u64 = 2;
/// Preference key that toggles page turning.
pub const DEFAULT_ENABLED_KEY: &str = "page_turner_enabled";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Config {
    pub tap: TapConfig,
    pub dispatcher: DispatcherConfig,
    pub settings: SettingsConfig,
}

/// Where and how taps are placed on screen.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TapConfig {
    pub edge_ratio_left: f32,
    pub edge_ratio_right: f32,
    pub y_ratio: f32,
    pub duration_ms: u64,
    pub will_continue: bool,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            edge_ratio_left: DEFAULT_EDGE_RATIO_LEFT,
            edge_ratio_right: DEFAULT_EDGE_RATIO_RIGHT,
            y_ratio: DEFAULT_Y_RATIO,
            duration_ms: DEFAULT_TAP_DURATION_MS,
            will_continue: false,
        }
    }
}

impl TapConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Dispatcher actor tuning.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DispatcherConfig {
    /// When set, an in-flight gesture with no completion after this long is
    /// treated as cancelled. Unset means wait forever.
    pub completion_timeout_ms: Option<u64>,
}

impl DispatcherConfig {
    pub fn completion_timeout(&self) -> Option<Duration> {
        self.completion_timeout_ms.map(Duration::from_millis)
    }
}

/// Keys and defaults used against the settings store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SettingsConfig {
    pub enabled_key: String,
    pub enabled_default: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            enabled_key: DEFAULT_ENABLED_KEY.to_string(),
            enabled_default: true,
        }
    }
}

impl Config {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("tap.edge_ratio_left", self.tap.edge_ratio_left),
            ("tap.edge_ratio_right", self.tap.edge_ratio_right),
            ("tap.y_ratio", self.tap.y_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(PageTurnerError::config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.tap.duration_ms == 0 {
            return Err(PageTurnerError::config("tap.duration_ms must be non-zero"));
        }

        if self.dispatcher.completion_timeout_ms == Some(0) {
            return Err(PageTurnerError::config(
                "dispatcher.completion_timeout_ms must be non-zero when set",
            ));
        }

        if self.settings.enabled_key.is_empty() {
            return Err(PageTurnerError::config("settings.enabled_key is empty"));
        }

        Ok(())
    }
}

#[cfg(feature = "config")]
impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|err| PageTurnerError::config_io(path, err))?;
        Self::from_toml_str(&contents)
    }

    /// `$XDG_CONFIG_HOME/page-turner/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("page-turner").join("config.toml"))
    }

    /// Load the default config file if it exists, otherwise fall back to defaults.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tap.edge_ratio_left, 0.05);
        assert_eq!(config.tap.edge_ratio_right, 0.95);
        assert_eq!(config.tap.duration(), Duration::from_millis(2));
        assert_eq!(config.dispatcher.completion_timeout(), None);
        assert!(config.settings.enabled_default);
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let mut config = Config::default();
        config.tap.edge_ratio_right = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tap.edge_ratio_right"));
    }

    #[test]
    fn rejects_zero_durations() {
        let mut config = Config::default();
        config.tap.duration_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dispatcher.completion_timeout_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [tap]
            edge_ratio_left = 0.1

            [dispatcher]
            completion_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.tap.edge_ratio_left, 0.1);
        assert_eq!(config.tap.edge_ratio_right, DEFAULT_EDGE_RATIO_RIGHT);
        assert_eq!(
            config.dispatcher.completion_timeout(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(config.settings.enabled_key, DEFAULT_ENABLED_KEY);
    }

    #[cfg(feature = "config")]
    #[test]
    fn load_reports_parse_and_io_errors() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[tap]\nedge_ratio_left = \"left\"\n").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(PageTurnerError::ConfigParse { .. })
        ));

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            Config::load(&missing),
            Err(PageTurnerError::ConfigIo { .. })
        ));
    }

    #[cfg(feature = "config")]
    #[test]
    fn load_validates_values() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[tap]\ny_ratio = -0.2\n").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(PageTurnerError::Config { .. })
        ));
    }
}
