//! Persisted per-site settings
//!
//! The settings record is a flat JSON object holding the charger site, the
//! grid operator's fees, the pricing zone and the current API token pair. It
//! is created once by onboarding, rewritten wholesale whenever the tokens are
//! refreshed, and never deleted by this program.

use crate::error::{Result, StromprisError};
use crate::logging::get_logger;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Norwegian electricity pricing zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Zone {
    No1,
    No2,
    No3,
    No4,
    No5,
    No6,
}

impl Zone {
    pub const ALL: [Self; 6] = [
        Self::No1,
        Self::No2,
        Self::No3,
        Self::No4,
        Self::No5,
        Self::No6,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::No1 => "NO1",
            Self::No2 => "NO2",
            Self::No3 => "NO3",
            Self::No4 => "NO4",
            Self::No5 => "NO5",
            Self::No6 => "NO6",
        }
    }
}

impl FromStr for Zone {
    type Err = StromprisError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|zone| zone.as_str() == upper)
            .ok_or_else(|| {
                StromprisError::validation("zone", format!("Unknown pricing zone: {}", s))
            })
    }
}

impl TryFrom<String> for Zone {
    type Error = StromprisError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.as_str().to_string()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access and refresh token, always replaced together
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new<A: Into<String>, R: Into<String>>(access_token: A, refresh_token: R) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Never print credentials
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Per-site settings record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Easee site id
    pub site_id: u64,

    /// Day transmission fee in øre/kWh
    pub transmission_day: f64,

    /// Night transmission fee in øre/kWh
    pub transmission_night: f64,

    /// Misc costs, stored as the operator's input divided by 100
    pub misc_costs: f64,

    /// Pricing zone
    pub zone: Zone,

    /// Current API credentials
    #[serde(flatten)]
    pub tokens: TokenPair,
}

impl Settings {
    /// Swap in a freshly issued token pair
    pub fn replace_tokens(&mut self, tokens: TokenPair) -> TokenPair {
        std::mem::replace(&mut self.tokens, tokens)
    }
}

/// Loads and saves the settings record
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    logger: crate::logging::StructuredLogger,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            logger: get_logger("settings"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record; `SettingsNotFound` on first run
    pub fn load(&self) -> Result<Settings> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StromprisError::settings_not_found(
                    self.path.display().to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        let settings: Settings = serde_json::from_str(&contents)?;
        self.logger.debug(&format!(
            "Loaded settings for site {} ({})",
            settings.site_id, settings.zone
        ));
        Ok(settings)
    }

    /// Rewrite the whole record
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let contents = serde_json::to_string_pretty(settings)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        self.logger.debug("Saved settings to disk");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_parsing_is_case_insensitive() {
        assert_eq!("no5".parse::<Zone>().unwrap(), Zone::No5);
        assert_eq!(" NO1 ".parse::<Zone>().unwrap(), Zone::No1);
        assert!("SE3".parse::<Zone>().is_err());
        assert_eq!(Zone::No6.to_string(), "NO6");
    }

    #[test]
    fn test_token_pair_debug_is_redacted() {
        let pair = TokenPair::new("secret-access", "secret-refresh");
        let debug = format!("{:?}", pair);
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_replace_tokens_swaps_both() {
        let mut settings = Settings {
            site_id: 1,
            transmission_day: 30.0,
            transmission_night: 20.0,
            misc_costs: 0.02,
            zone: Zone::No1,
            tokens: TokenPair::new("a1", "r1"),
        };
        let old = settings.replace_tokens(TokenPair::new("a2", "r2"));
        assert_eq!(old, TokenPair::new("a1", "r1"));
        assert_eq!(settings.tokens, TokenPair::new("a2", "r2"));
    }
}
