//! In-memory application settings store.
//!
//! One store is created at process start (optionally seeded from config)
//! and mutated only through [`SettingsStore::apply`]; there is no
//! process-global instance. `updated_at` stays empty until the first
//! update, then carries an RFC 3339 UTC timestamp.

use crate::ports::config_port::ConfigPort;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRiskToleranceError;

impl fmt::Display for ParseRiskToleranceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown risk tolerance (expected conservative, moderate, or aggressive)")
    }
}

impl std::error::Error for ParseRiskToleranceError {}

impl FromStr for RiskTolerance {
    type Err = ParseRiskToleranceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            _ => Err(ParseRiskToleranceError),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub auto_balance: bool,
    pub notifications: bool,
    pub risk_tolerance: RiskTolerance,
    pub watch_symbols: Vec<String>,
    pub updated_at: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_balance: true,
            notifications: true,
            risk_tolerance: RiskTolerance::Moderate,
            watch_symbols: vec!["AAPL".into(), "BTC".into(), "VNM".into()],
            updated_at: String::new(),
        }
    }
}

/// Partial update: present fields replace the stored value, absent fields
/// are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub auto_balance: Option<bool>,
    pub notifications: Option<bool>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub watch_symbols: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct SettingsStore {
    settings: Settings,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    /// Seed from a `[settings]` config section; missing or unparseable keys
    /// keep their defaults.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Settings::default();

        let risk_tolerance = config
            .get_string("settings", "risk_tolerance")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.risk_tolerance);

        let watch_symbols = config
            .get_string("settings", "watch_symbols")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|symbols| !symbols.is_empty())
            .unwrap_or(defaults.watch_symbols);

        Self {
            settings: Settings {
                auto_balance: config.get_bool("settings", "auto_balance", defaults.auto_balance),
                notifications: config.get_bool(
                    "settings",
                    "notifications",
                    defaults.notifications,
                ),
                risk_tolerance,
                watch_symbols,
                updated_at: String::new(),
            },
        }
    }

    /// Snapshot of the current settings.
    pub fn current(&self) -> Settings {
        self.settings.clone()
    }

    /// Merge an update into the store and return the new snapshot.
    pub fn apply(&mut self, update: SettingsUpdate) -> Settings {
        if let Some(v) = update.auto_balance {
            self.settings.auto_balance = v;
        }
        if let Some(v) = update.notifications {
            self.settings.notifications = v;
        }
        if let Some(v) = update.risk_tolerance {
            self.settings.risk_tolerance = v;
        }
        if let Some(v) = update.watch_symbols {
            self.settings.watch_symbols = v;
        }
        self.settings.updated_at = Utc::now().to_rfc3339();
        self.settings.clone()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn defaults() {
        let store = SettingsStore::new();
        let settings = store.current();

        assert!(settings.auto_balance);
        assert!(settings.notifications);
        assert_eq!(settings.risk_tolerance, RiskTolerance::Moderate);
        assert_eq!(settings.watch_symbols, vec!["AAPL", "BTC", "VNM"]);
        assert!(settings.updated_at.is_empty());
    }

    #[test]
    fn apply_merges_present_fields_only() {
        let mut store = SettingsStore::new();

        let snapshot = store.apply(SettingsUpdate {
            notifications: Some(false),
            risk_tolerance: Some(RiskTolerance::Aggressive),
            ..SettingsUpdate::default()
        });

        assert!(snapshot.auto_balance);
        assert!(!snapshot.notifications);
        assert_eq!(snapshot.risk_tolerance, RiskTolerance::Aggressive);
        assert_eq!(snapshot.watch_symbols, vec!["AAPL", "BTC", "VNM"]);
    }

    #[test]
    fn apply_stamps_updated_at() {
        let mut store = SettingsStore::new();
        assert!(store.current().updated_at.is_empty());

        let snapshot = store.apply(SettingsUpdate::default());
        assert!(!snapshot.updated_at.is_empty());
    }

    #[test]
    fn from_config_reads_settings_section() {
        let adapter = FileConfigAdapter::from_string(
            "[settings]\nauto_balance = no\nrisk_tolerance = aggressive\nwatch_symbols = eth, btc\n",
        )
        .unwrap();
        let store = SettingsStore::from_config(&adapter);
        let settings = store.current();

        assert!(!settings.auto_balance);
        assert!(settings.notifications);
        assert_eq!(settings.risk_tolerance, RiskTolerance::Aggressive);
        assert_eq!(settings.watch_symbols, vec!["ETH", "BTC"]);
    }

    #[test]
    fn from_config_falls_back_on_invalid_risk_tolerance() {
        let adapter =
            FileConfigAdapter::from_string("[settings]\nrisk_tolerance = yolo\n").unwrap();
        let store = SettingsStore::from_config(&adapter);
        assert_eq!(store.current().risk_tolerance, RiskTolerance::Moderate);
    }

    #[test]
    fn risk_tolerance_parsing() {
        assert_eq!(
            "Aggressive".parse::<RiskTolerance>().unwrap(),
            RiskTolerance::Aggressive
        );
        assert!("reckless".parse::<RiskTolerance>().is_err());
    }
}
