//! # Terminal Settings
//!
//! Per-terminal configuration loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     TILLPOINT_STORE_NAME="Downtown Branch"                              │
//! │     TILLPOINT_CURRENCY_DECIMALS=0                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/tillpoint/terminal.toml (Linux)                           │
//! │     ~/Library/Application Support/com.tillpoint.terminal/ (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Downtown Branch"
//! currency_code = "USD"
//! currency_symbol = "$"
//! currency_decimals = 2
//! max_note_length = 500
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use tillpoint_core::{Money, DEFAULT_MAX_NOTE_LENGTH};

use crate::error::{SessionError, SessionResult};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "TILLPOINT_";

/// Largest number of minor-unit digits a terminal may configure.
pub const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Terminal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    /// Store name shown in the terminal header.
    pub store_name: String,

    /// Currency code (ISO 4217).
    pub currency_code: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// Number of minor-unit digits. Money amounts are stored in these units.
    pub currency_decimals: u8,

    /// Longest order note the cart accepts, in characters.
    pub max_note_length: usize,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        TerminalSettings {
            store_name: "Tillpoint Store".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            max_note_length: DEFAULT_MAX_NOTE_LENGTH,
        }
    }
}

impl TerminalSettings {
    /// Loads settings from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (terminal.toml), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut settings = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal settings from file");
                settings = Self::from_file(&path)?;
            } else {
                debug!(?path, "Settings file not found, using defaults");
            }
        }

        settings.apply_env_overrides();
        settings.validate()?;

        Ok(settings)
    }

    /// Loads settings or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load terminal settings: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads a settings file without applying environment overrides.
    pub fn from_file(path: &Path) -> SessionResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves settings to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Terminal settings saved");
        Ok(())
    }

    /// Validates the settings.
    pub fn validate(&self) -> SessionResult<()> {
        if self.store_name.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "store_name must not be empty".into(),
            ));
        }

        if self.currency_code.len() != 3 || !self.currency_code.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(SessionError::InvalidConfig(format!(
                "currency_code must be a 3-letter ISO 4217 code, got: '{}'",
                self.currency_code
            )));
        }

        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(SessionError::InvalidConfig(format!(
                "currency_decimals must be between 0 and {}, got: {}",
                MAX_CURRENCY_DECIMALS, self.currency_decimals
            )));
        }

        if self.max_note_length == 0 {
            return Err(SessionError::InvalidConfig(
                "max_note_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `TILLPOINT_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok());
    }

    /// Applies overrides from any key lookup. Keys are the un-prefixed,
    /// upper-case field names (`STORE_NAME`, `CURRENCY_DECIMALS`, ...).
    ///
    /// Unparseable numeric values are logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store_name = name;
        }

        if let Some(code) = lookup("CURRENCY_CODE") {
            self.currency_code = code.to_uppercase();
        }

        if let Some(symbol) = lookup("CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("CURRENCY_DECIMALS") {
            match decimals.parse::<u8>() {
                Ok(d) => self.currency_decimals = d,
                Err(_) => warn!(value = %decimals, "Ignoring invalid CURRENCY_DECIMALS override"),
            }
        }

        if let Some(len) = lookup("MAX_NOTE_LENGTH") {
            match len.parse::<usize>() {
                Ok(n) => self.max_note_length = n,
                Err(_) => warn!(value = %len, "Ignoring invalid MAX_NOTE_LENGTH override"),
            }
        }
    }

    /// Returns the default settings file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tillpoint", "terminal")
            .map(|dirs| dirs.config_dir().join("terminal.toml"))
    }

    /// Formats an amount in minor units as a currency string.
    ///
    /// `currency_decimals` is clamped to the range `validate` accepts (0..=4),
    /// so unvalidated settings still format without overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::Money;
    /// use tillpoint_session::TerminalSettings;
    ///
    /// let settings = TerminalSettings::default();
    /// assert_eq!(settings.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let decimals = self.currency_decimals.min(MAX_CURRENCY_DECIMALS);
        let minor = amount.cents();
        let divisor = 10_i64.pow(u32::from(decimals));
        let whole = (minor / divisor).unsigned_abs();
        let frac = (minor % divisor).unsigned_abs();
        let sign = if minor < 0 { "-" } else { "" };

        if decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.currency_symbol,
                whole,
                frac,
                width = usize::from(decimals)
            )
        } else {
            format!("{}{}{}", sign, self.currency_symbol, whole)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = TerminalSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_note_length, DEFAULT_MAX_NOTE_LENGTH);
    }

    #[test]
    fn test_format_currency() {
        let settings = TerminalSettings::default();
        assert_eq!(settings.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(settings.format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(settings.format_currency(Money::zero()), "$0.00");
        assert_eq!(settings.format_currency(Money::from_cents(-1234)), "-$12.34");
        assert_eq!(
            settings.format_currency(Money::from_cents(123456789)),
            "$1234567.89"
        );
    }

    #[test]
    fn test_format_currency_without_decimals() {
        let settings = TerminalSettings {
            currency_code: "JPY".to_string(),
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..TerminalSettings::default()
        };
        assert_eq!(settings.format_currency(Money::from_cents(1500)), "¥1500");
    }

    #[test]
    fn test_format_currency_clamps_unvalidated_decimals() {
        let settings = TerminalSettings {
            currency_decimals: 30,
            ..TerminalSettings::default()
        };
        assert!(settings.validate().is_err());
        assert_eq!(settings.format_currency(Money::from_cents(123456)), "$12.3456");
        assert_eq!(
            settings.format_currency(Money::from_cents(i64::MIN)),
            "-$922337203685477.5808"
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = TerminalSettings::default();
        settings.currency_code = "usd1".to_string();
        assert!(settings.validate().is_err());

        let mut settings = TerminalSettings::default();
        settings.currency_decimals = 5;
        assert!(settings.validate().is_err());

        let mut settings = TerminalSettings::default();
        settings.max_note_length = 0;
        assert!(settings.validate().is_err());

        let mut settings = TerminalSettings::default();
        settings.store_name = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terminal.toml");
        std::fs::write(
            &path,
            "store_name = \"Harbour Kiosk\"\nmax_note_length = 120\n",
        )
        .unwrap();

        let settings = TerminalSettings::from_file(&path).unwrap();
        assert_eq!(settings.store_name, "Harbour Kiosk");
        assert_eq!(settings.max_note_length, 120);
        // Unspecified fields keep their defaults
        assert_eq!(settings.currency_code, "USD");
    }

    #[test]
    fn test_overrides_beat_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terminal.toml");
        std::fs::write(&path, "store_name = \"From File\"\ncurrency_decimals = 2\n").unwrap();

        let env: HashMap<&str, &str> = [
            ("STORE_NAME", "From Env"),
            ("CURRENCY_CODE", "eur"),
            ("CURRENCY_DECIMALS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut settings = TerminalSettings::from_file(&path).unwrap();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.store_name, "From Env");
        assert_eq!(settings.currency_code, "EUR");
        // Invalid numbers are skipped, file value stays
        assert_eq!(settings.currency_decimals, 2);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terminal.toml");
        std::fs::write(&path, "currency_decimals = \"two\"\n").unwrap();

        let err = TerminalSettings::load(Some(path.clone())).unwrap_err();
        assert!(err.is_config_error());

        std::fs::write(&path, "currency_decimals = 9\n").unwrap();
        assert!(matches!(
            TerminalSettings::load(Some(path)),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("terminal.toml");

        let settings = TerminalSettings {
            store_name: "Pier 4".to_string(),
            ..TerminalSettings::default()
        };
        settings.save(Some(path.clone())).unwrap();

        let loaded = TerminalSettings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}
