//! # Strompris - hourly spot price sync for Easee chargers
//!
//! Fetches the current hour's electricity spot price for a Norwegian pricing
//! zone, turns it into the price a charging customer pays (government
//! rebate, misc costs, VAT and grid transmission fee) and sets it as the
//! site price in the Easee cloud. Meant to be run once an hour by cron or a
//! systemd timer.
//!
//! ## Architecture
//!
//! The run is a linear pipeline:
//!
//! - `settings`: persisted site, fees, zone and token pair
//! - `onboarding`: first-run console prompts
//! - `period`: the hour being priced
//! - `spot`: spot price schedule client
//! - `pricing`: spot price to billable price
//! - `charger`: Easee API client and transport errors
//! - `credentials`: token refresh
//! - `updater`: submission state machine with one refresh-and-retry
//! - `job`: the pipeline
//! - `lock`: single-flight guard
//! - `config`, `logging`, `error`: ambient plumbing

pub mod charger;
pub mod config;
pub mod credentials;
pub mod error;
pub mod job;
pub mod lock;
pub mod logging;
pub mod onboarding;
pub mod period;
pub mod pricing;
pub mod settings;
pub mod spot;
pub mod updater;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, StromprisError};
pub use settings::{Settings, SettingsStore, TokenPair, Zone};
