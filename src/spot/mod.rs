//! Spot price schedule (hvakosterstrommen.no)
//!
//! The upstream publishes one JSON array per day and zone. Entries carry
//! their own start and end timestamps, which is what we select on; the
//! array position is only used when timestamps are missing.

pub mod client;
pub mod types;

use crate::error::{Result, StromprisError};
use crate::period::PriceQuotePeriod;
use crate::pricing::RawPrice;

pub use client::HvaKosterStrommenClient;
pub use types::PriceEntry;

/// Source of the raw spot price for one period
#[async_trait::async_trait]
pub trait SpotPriceSource: Send + Sync {
    async fn fetch(&self, period: &PriceQuotePeriod) -> Result<RawPrice>;
}

/// Pick the period's price out of a day schedule.
///
/// Entries starting inside the period hour are averaged, so a schedule with
/// quarter-hour resolution yields the hourly mean. DST days with 23 or 25
/// entries resolve correctly because entries are matched by instant.
pub fn select_hour_price(entries: &[PriceEntry], period: &PriceQuotePeriod) -> Result<RawPrice> {
    let starts = period.starts_at;
    let ends = period.ends_at();

    let timed: Vec<&PriceEntry> = entries.iter().filter(|e| e.time_start.is_some()).collect();
    if timed.len() == entries.len() && !entries.is_empty() {
        let in_hour: Vec<f64> = timed
            .iter()
            .filter(|e| e.time_start.is_some_and(|t| t >= starts && t < ends))
            .map(|e| e.nok_per_kwh)
            .collect();
        if in_hour.is_empty() {
            return Err(StromprisError::malformed_response(format!(
                "no price for {} in schedule of {} entries",
                starts.format("%Y-%m-%d %H:%M%:z"),
                entries.len()
            )));
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = in_hour.iter().sum::<f64>() / in_hour.len() as f64;
        return Ok(mean);
    }

    entries
        .get(period.hour as usize)
        .map(|e| e.nok_per_kwh)
        .ok_or_else(|| {
            StromprisError::malformed_response(format!(
                "hour {} missing from schedule of {} entries",
                period.hour,
                entries.len()
            ))
        })
}
