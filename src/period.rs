//! The hour a run prices
//!
//! A run prices exactly one clock hour in one zone. The period is derived once
//! at start-up from the wall clock in the configured timezone and is never
//! recomputed, so a run that crosses an hour boundary still submits the
//! price of the hour it started in.

use crate::settings::Zone;
use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike};

/// Date, hour and zone addressing one upstream price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuotePeriod {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Local hour of day, 0-23
    pub hour: u32,
    pub zone: Zone,
    /// Local start of the hour
    pub starts_at: DateTime<FixedOffset>,
}

impl PriceQuotePeriod {
    /// Derive the period containing `now`
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>, zone: Zone) -> Self {
        let local = now.fixed_offset();
        let into_hour = chrono::TimeDelta::seconds(i64::from(local.minute() * 60 + local.second()))
            + chrono::TimeDelta::nanoseconds(i64::from(local.nanosecond()));
        Self {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            zone,
            starts_at: local - into_hour,
        }
    }

    /// Zero-padded month
    pub fn month_str(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Zero-padded day
    pub fn day_str(&self) -> String {
        format!("{:02}", self.day)
    }

    /// Resource path of the day's schedule, e.g. `2024/03-07_NO1.json`
    pub fn resource_key(&self) -> String {
        format!(
            "{}/{}-{}_{}.json",
            self.year,
            self.month_str(),
            self.day_str(),
            self.zone.as_str().to_uppercase()
        )
    }

    /// End of the priced hour
    pub fn ends_at(&self) -> DateTime<FixedOffset> {
        self.starts_at + chrono::TimeDelta::hours(1)
    }
}
