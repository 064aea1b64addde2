use crate::charger::transport::{ChargerApi, TransportError};
use crate::charger::types::{PriceUpdateRequest, RefreshTokenRequest, RefreshTokenResponse};
use crate::config::Config;
use crate::error::Result;
use crate::logging::get_logger;
use crate::pricing::ComputedPrice;
use crate::settings::TokenPair;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use std::time::Duration;

const APP_USER_AGENT: &str = concat!("strompris/", env!("APP_VERSION"));

/// Easee cloud API client
pub struct EaseeClient {
    http: reqwest::Client,
    base_url: String,
    currency: String,
    logger: crate::logging::StructuredLogger,
}

impl EaseeClient {
    pub fn new(base_url: &str, currency: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            currency: currency.to_string(),
            logger: get_logger("easee"),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.http.charger_api_base,
            &config.pricing.currency,
            Duration::from_secs(config.http.timeout_seconds),
        )
    }

    fn price_url(&self, site_id: u64) -> String {
        format!("{}/sites/{}/price", self.base_url, site_id)
    }

    fn refresh_url(&self) -> String {
        format!("{}/accounts/refresh_token", self.base_url)
    }

    /// Map a non-success response to `TransportError::Status`
    async fn check_status(resp: reqwest::Response) -> std::result::Result<reqwest::Response, TransportError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }
}

#[async_trait::async_trait]
impl ChargerApi for EaseeClient {
    async fn submit_price(
        &self,
        site_id: u64,
        access_token: &str,
        price: ComputedPrice,
    ) -> std::result::Result<(), TransportError> {
        let body = PriceUpdateRequest {
            currency_id: self.currency.clone(),
            cost_per_kwh: price,
        };
        self.logger
            .debug(&format!("POST {} costPerKWh={}", self.price_url(site_id), price));
        let resp = self
            .http
            .post(self.price_url(site_id))
            .header(AUTHORIZATION, format!("Bearer {}", access_token.trim()))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, APP_USER_AGENT)
            .json(&body)
            .send()
            .await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn refresh_tokens(
        &self,
        current: &TokenPair,
    ) -> std::result::Result<TokenPair, TransportError> {
        self.logger.debug(&format!("POST {}", self.refresh_url()));
        let resp = self
            .http
            .post(self.refresh_url())
            .header(
                AUTHORIZATION,
                format!("Bearer {}", current.access_token.trim()),
            )
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, APP_USER_AGENT)
            .json(&RefreshTokenRequest::from(current))
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        let body: RefreshTokenResponse = resp
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(body.into())
    }
}
