//! Access token refresh
//!
//! The charger API issues short-lived access tokens together with a refresh
//! token. Both are rotated on every exchange and the new pair must reach disk
//! before it is used.

use crate::charger::ChargerApi;
use crate::error::{Result, StromprisError};
use crate::logging::get_logger;
use crate::settings::{Settings, SettingsStore, TokenPair};

/// Exchanges the stored refresh token for a new token pair
pub struct CredentialRefresher<'a> {
    api: &'a dyn ChargerApi,
    store: &'a SettingsStore,
    logger: crate::logging::StructuredLogger,
}

impl<'a> CredentialRefresher<'a> {
    pub fn new(api: &'a dyn ChargerApi, store: &'a SettingsStore) -> Self {
        Self {
            api,
            store,
            logger: get_logger("credentials"),
        }
    }

    /// Refresh the pair held in `settings`, persist it and return it.
    ///
    /// A rejected exchange is terminal for the run. On success both tokens are
    /// replaced together and the full record is saved before returning.
    pub async fn refresh(&self, settings: &mut Settings) -> Result<TokenPair> {
        self.logger.info("Refreshing access token");
        let fresh = self
            .api
            .refresh_tokens(&settings.tokens)
            .await
            .map_err(|e| {
                self.logger.error(&format!("Token refresh rejected: {}", e));
                StromprisError::auth(e.status(), format!("token refresh failed: {}", e))
            })?;

        if fresh.access_token.trim().is_empty() || fresh.refresh_token.trim().is_empty() {
            return Err(StromprisError::auth(
                None,
                "token refresh returned an empty token",
            ));
        }

        settings.replace_tokens(fresh.clone());
        self.store.save(settings).map_err(|e| {
            self.logger.error(&format!("Refreshed tokens could not be saved: {}", e));
            StromprisError::io(format!(
                "refreshed tokens could not be saved to {}: {}; the stored refresh token \
                 is likely revoked, run setup again by removing the settings file",
                self.store.path().display(),
                e
            ))
        })?;
        self.logger.info("Tokens were refreshed");
        Ok(fresh)
    }
}
