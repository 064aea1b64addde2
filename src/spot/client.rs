use crate::config::Config;
use crate::error::{Result, StromprisError};
use crate::logging::get_logger;
use crate::period::PriceQuotePeriod;
use crate::pricing::RawPrice;
use crate::spot::types::PriceEntry;
use crate::spot::{SpotPriceSource, select_hour_price};
use reqwest::header::{ACCEPT, USER_AGENT};
use std::time::Duration;

/// Client for the hvakosterstrommen.no price API
pub struct HvaKosterStrommenClient {
    http: reqwest::Client,
    base_url: String,
    logger: crate::logging::StructuredLogger,
}

impl HvaKosterStrommenClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            logger: get_logger("spot"),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.http.price_api_base,
            Duration::from_secs(config.http.timeout_seconds),
        )
    }

    pub fn schedule_url(&self, period: &PriceQuotePeriod) -> String {
        format!("{}/{}", self.base_url, period.resource_key())
    }

    /// Fetch the whole day schedule for the period's date and zone
    pub async fn fetch_schedule(&self, period: &PriceQuotePeriod) -> Result<Vec<PriceEntry>> {
        let url = self.schedule_url(period);
        self.logger.debug(&format!("GET {}", url));

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("strompris/", env!("APP_VERSION")))
            .send()
            .await
            .map_err(|e| StromprisError::upstream_unavailable(format!("{}: {}", url, e)))?;

        if !resp.status().is_success() {
            return Err(StromprisError::upstream_unavailable(format!(
                "{} answered HTTP {}",
                url,
                resp.status().as_u16()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| StromprisError::upstream_unavailable(format!("{}: {}", url, e)))?;
        serde_json::from_str(&body)
            .map_err(|e| StromprisError::malformed_response(format!("{}: {}", url, e)))
    }
}

#[async_trait::async_trait]
impl SpotPriceSource for HvaKosterStrommenClient {
    async fn fetch(&self, period: &PriceQuotePeriod) -> Result<RawPrice> {
        let entries = self.fetch_schedule(period).await?;
        let price = select_hour_price(&entries, period)?;
        self.logger.info(&format!(
            "Spot price {} hour {:02}: {:.5} NOK/kWh",
            period.zone, period.hour, price
        ));
        Ok(price)
    }
}
