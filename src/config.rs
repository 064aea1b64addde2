//! Configuration management for Strompris
//!
//! This module handles loading and validation of the application
//! configuration from YAML files. The configuration carries everything that
//! is not per-site: endpoints, timeouts, logging and the regulated pricing
//! policy constants that change from year to year.

use crate::error::{Result, StromprisError};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the persisted settings record (site, fees, zone, tokens)
    pub settings_path: String,

    /// IANA timezone the pricing hour is derived in
    pub timezone: String,

    /// Pricing policy (rebate, VAT, day/night hours)
    pub pricing: PricingPolicy,

    /// Remote endpoints and HTTP behaviour
    pub http: HttpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Run lock configuration
    pub lock: LockConfig,
}

/// Regulated pricing constants.
///
/// The rebate threshold and factor are set by the government and are
/// reviewed yearly; override them here rather than in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Spot price (NOK/kWh, ex. VAT) above which the rebate applies
    pub rebate_threshold: f64,

    /// Factor applied to the part of the spot price above the threshold
    pub rebate_factor: f64,

    /// VAT multiplier (1.25 for 25 %)
    pub vat_multiplier: f64,

    /// Day tariff applies for hours strictly after this hour
    pub day_start_hour: u32,

    /// Day tariff applies for hours strictly before this hour
    pub day_end_hour: u32,

    /// Currency code sent to the charger API
    pub currency: String,
}

/// Remote endpoints and HTTP behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base URL of the spot price schedule
    pub price_api_base: String,

    /// Base URL of the charger-management API
    pub charger_api_base: String,

    /// Timeout applied to every request, in seconds
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional log directory; empty disables file logging
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// Run lock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Guard a run with an exclusive lock file
    pub enabled: bool,

    /// A lock older than this is considered abandoned
    pub stale_after_seconds: u64,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let default_paths = ["strompris.yaml", "/etc/strompris/config.yaml"];

        for path in &default_paths {
            if Path::new(path).exists() {
                let config = Self::from_file(path)?;
                config.validate()?;
                return Ok(config);
            }
        }

        // Fall back to default configuration
        Ok(Self::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            StromprisError::validation("timezone", format!("Unknown timezone {}", self.timezone))
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.settings_path.trim().is_empty() {
            return Err(StromprisError::validation(
                "settings_path",
                "Settings path cannot be empty",
            ));
        }

        self.tz()?;

        let pricing = &self.pricing;
        if !(pricing.rebate_threshold.is_finite() && pricing.rebate_threshold >= 0.0) {
            return Err(StromprisError::validation(
                "pricing.rebate_threshold",
                "Must be a non-negative number",
            ));
        }
        if !(0.0..=1.0).contains(&pricing.rebate_factor) {
            return Err(StromprisError::validation(
                "pricing.rebate_factor",
                "Must be between 0 and 1",
            ));
        }
        if !(pricing.vat_multiplier.is_finite() && pricing.vat_multiplier >= 1.0) {
            return Err(StromprisError::validation(
                "pricing.vat_multiplier",
                "Must be at least 1.0",
            ));
        }
        if pricing.day_start_hour >= pricing.day_end_hour || pricing.day_end_hour > 24 {
            return Err(StromprisError::validation(
                "pricing.day_start_hour",
                "Day window must satisfy day_start_hour < day_end_hour <= 24",
            ));
        }
        if pricing.currency.trim().is_empty() {
            return Err(StromprisError::validation(
                "pricing.currency",
                "Currency cannot be empty",
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(StromprisError::validation(
                "http.timeout_seconds",
                "Must be greater than 0",
            ));
        }
        for (field, url) in [
            ("http.price_api_base", &self.http.price_api_base),
            ("http.charger_api_base", &self.http.charger_api_base),
        ] {
            if reqwest::Url::parse(url).is_err() {
                return Err(StromprisError::validation(field, "Must be an absolute URL"));
            }
        }

        Ok(())
    }
}
