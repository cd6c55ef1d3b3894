//! User settings for buildledger
//!
//! Manages display preferences and the deadline warning threshold.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::deadline::NEAR_DEADLINE_DAYS;
use crate::models::money::DEFAULT_CURRENCY;

/// User settings for buildledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used for new categories and for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// A building client is flagged once this many days (or fewer) remain
    #[serde(default = "default_near_deadline_days")]
    pub near_deadline_days: i64,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Time format used in transaction rows
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_near_deadline_days() -> i64 {
    NEAR_DEADLINE_DAYS
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            near_deadline_days: default_near_deadline_days(),
            date_format: default_date_format(),
            time_format: default_time_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        if settings.near_deadline_days < 0 {
            return Err(LedgerError::Config(format!(
                "near_deadline_days must not be negative (got {})",
                settings.near_deadline_days
            )));
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
