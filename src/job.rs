//! One pass of the hourly job: fetch, compute, submit

use crate::charger::ChargerApi;
use crate::config::Config;
use crate::error::Result;
use crate::logging::get_logger;
use crate::period::PriceQuotePeriod;
use crate::pricing::{ComputedPrice, PriceCalculator, RawPrice};
use crate::settings::{Settings, SettingsStore};
use crate::spot::SpotPriceSource;
use crate::updater::{PriceUpdater, UpdateReport};
use chrono::{DateTime, TimeZone};

/// What a successful run did
#[derive(Debug, Clone)]
pub struct RunReport {
    pub period: PriceQuotePeriod,
    pub raw: RawPrice,
    pub price: ComputedPrice,
    pub update: UpdateReport,
}

impl RunReport {
    /// Human-readable summary printed at exit
    pub fn status_line(&self) -> String {
        let refreshed = if self.update.refreshed {
            " (after token refresh)"
        } else {
            ""
        };
        format!(
            "Price was updated successfully{}: {} {:02}:00 {} = {} per kWh.",
            refreshed,
            self.period.zone,
            self.period.hour,
            self.period.starts_at.format("%Y-%m-%d"),
            self.price
        )
    }
}

/// Collaborators a run needs
pub struct Job<'a> {
    pub config: &'a Config,
    pub store: &'a SettingsStore,
    pub source: &'a dyn SpotPriceSource,
    pub api: &'a dyn ChargerApi,
}

impl Job<'_> {
    /// Price the hour containing `now` and submit it
    pub async fn run_once<Tz: TimeZone>(
        &self,
        settings: &mut Settings,
        now: &DateTime<Tz>,
    ) -> Result<RunReport> {
        let logger = get_logger("job");
        let period = PriceQuotePeriod::at(now, settings.zone);
        logger.info(&format!(
            "Pricing {} for {} hour {:02}",
            period.zone,
            period.starts_at.format("%Y-%m-%d"),
            period.hour
        ));

        let raw = self.source.fetch(&period).await?;

        let calculator = PriceCalculator::new(self.config.pricing.clone());
        let price = calculator.compute(raw, settings, period.hour);

        let update = PriceUpdater::new(self.api, self.store)
            .update(settings, price)
            .await?;

        Ok(RunReport {
            period,
            raw,
            price,
            update,
        })
    }
}
