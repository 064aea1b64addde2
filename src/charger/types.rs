use crate::pricing::ComputedPrice;
use crate::settings::TokenPair;
use serde::{Deserialize, Serialize};

/// Body of `POST /sites/{id}/price`
#[derive(Debug, Clone, Serialize)]
pub struct PriceUpdateRequest {
    #[serde(rename = "currencyId")]
    pub currency_id: String,

    #[serde(rename = "costPerKWh")]
    pub cost_per_kwh: ComputedPrice,
}

/// Body of `POST /accounts/refresh_token`
#[derive(Serialize)]
pub struct RefreshTokenRequest<'a> {
    #[serde(rename = "accessToken")]
    pub access_token: &'a str,

    #[serde(rename = "refreshToken")]
    pub refresh_token: &'a str,
}

impl<'a> From<&'a TokenPair> for RefreshTokenRequest<'a> {
    fn from(pair: &'a TokenPair) -> Self {
        Self {
            access_token: &pair.access_token,
            refresh_token: &pair.refresh_token,
        }
    }
}

/// Relevant part of the refresh response
#[derive(Deserialize)]
pub struct RefreshTokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,

    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

impl From<RefreshTokenResponse> for TokenPair {
    fn from(response: RefreshTokenResponse) -> Self {
        Self::new(response.access_token, response.refresh_token)
    }
}
