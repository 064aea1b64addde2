use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// One entry of a day schedule
#[derive(Debug, Clone, Deserialize)]
pub struct PriceEntry {
    #[serde(rename = "NOK_per_kWh")]
    pub nok_per_kwh: f64,

    #[serde(default)]
    pub time_start: Option<DateTime<FixedOffset>>,
}
