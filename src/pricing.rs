//! Spot price to billable price
//!
//! The billable per-kWh price is derived from the raw spot price in a fixed
//! order: government rebate, misc costs, VAT, transmission fee, rounding.
//! The order matters (VAT is charged on misc costs but not on transmission)
//! and must not be rearranged.

use crate::config::PricingPolicy;
use crate::logging::get_logger;
use crate::settings::Settings;
use serde::{Serialize, Serializer};
use std::fmt;

/// Spot price in NOK/kWh as published for one hour
pub type RawPrice = f64;

/// Billable price in NOK/kWh, held in øre so it always has two decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComputedPrice {
    ore: i64,
}

impl ComputedPrice {
    /// Round a NOK amount half away from zero to whole øre
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_nok(nok: f64) -> Self {
        Self {
            ore: (nok * 100.0).round() as i64,
        }
    }

    pub const fn from_ore(ore: i64) -> Self {
        Self { ore }
    }

    pub const fn ore(&self) -> i64 {
        self.ore
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_nok(&self) -> f64 {
        self.ore as f64 / 100.0
    }
}

impl fmt::Display for ComputedPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.ore < 0 { "-" } else { "" };
        let abs = self.ore.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for ComputedPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_nok())
    }
}

/// Pure price transformation under a pricing policy
#[derive(Debug, Clone)]
pub struct PriceCalculator {
    policy: PricingPolicy,
    logger: crate::logging::StructuredLogger,
}

impl PriceCalculator {
    pub fn new(policy: PricingPolicy) -> Self {
        Self {
            policy,
            logger: get_logger("pricing"),
        }
    }

    /// Spot price after the government rebate
    pub fn apply_rebate(&self, raw: RawPrice) -> f64 {
        let threshold = self.policy.rebate_threshold;
        if raw > threshold {
            threshold + (raw - threshold) * self.policy.rebate_factor
        } else {
            raw
        }
    }

    /// Whether `hour` is billed at the day transmission rate.
    ///
    /// Both bounds are exclusive: 06 and 22 are night hours.
    pub const fn is_day_hour(&self, hour: u32) -> bool {
        self.policy.day_start_hour < hour && hour < self.policy.day_end_hour
    }

    /// Transmission fee in NOK/kWh for `hour`
    pub fn transmission_fee(&self, settings: &Settings, hour: u32) -> f64 {
        if self.is_day_hour(hour) {
            settings.transmission_day / 100.0
        } else {
            settings.transmission_night / 100.0
        }
    }

    /// Unrounded billable price
    pub fn compute_unrounded(&self, raw: RawPrice, settings: &Settings, hour: u32) -> f64 {
        let spot = self.apply_rebate(raw);
        // misc_costs is stored pre-divided; the second division is intended
        let with_misc = spot + settings.misc_costs / 100.0;
        let with_vat = with_misc * self.policy.vat_multiplier;
        with_vat + self.transmission_fee(settings, hour)
    }

    /// Billable price for `hour`, rounded to øre
    pub fn compute(&self, raw: RawPrice, settings: &Settings, hour: u32) -> ComputedPrice {
        let price = ComputedPrice::from_nok(self.compute_unrounded(raw, settings, hour));
        self.logger.info(&format!(
            "Calculated kWh price at {}: {} {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            price,
            self.policy.currency
        ));
        price
    }
}
