//! Price submission with a single refresh-and-retry
//!
//! ```text
//! Idle -> Submitting -> Succeeded
//!                    -> OtherFailed
//!                    -> AuthFailed -> Refreshing -> RefreshFailed
//!                                                -> Retrying -> Succeeded
//!                                                            -> OtherFailed
//! ```
//!
//! Only a 401 on the first submission leads to a refresh, and at most one
//! retry is made. Any other failure is terminal for the run; the next
//! scheduled run an hour later starts over.

use crate::charger::{ChargerApi, TransportError};
use crate::credentials::CredentialRefresher;
use crate::error::{Result, StromprisError};
use crate::logging::{LogContext, get_logger_with_context};
use crate::pricing::ComputedPrice;
use crate::settings::{Settings, SettingsStore};
use std::fmt;

/// States of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Idle,
    Submitting,
    AuthFailed,
    Refreshing,
    Retrying,
    Succeeded,
    OtherFailed,
    RefreshFailed,
}

impl UpdateState {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::OtherFailed | Self::RefreshFailed)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::AuthFailed => "auth_failed",
            Self::Refreshing => "refreshing",
            Self::Retrying => "retrying",
            Self::Succeeded => "succeeded",
            Self::OtherFailed => "other_failed",
            Self::RefreshFailed => "refresh_failed",
        }
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub state: UpdateState,
    /// Whether the token pair was refreshed on the way
    pub refreshed: bool,
    /// Submission attempts made (1 or 2)
    pub attempts: u32,
    /// Every state visited, in order
    pub trace: Vec<UpdateState>,
}

/// Submits a computed price for the configured site
pub struct PriceUpdater<'a> {
    api: &'a dyn ChargerApi,
    store: &'a SettingsStore,
}

impl<'a> PriceUpdater<'a> {
    pub fn new(api: &'a dyn ChargerApi, store: &'a SettingsStore) -> Self {
        Self { api, store }
    }

    async fn submit(&self, settings: &Settings, price: ComputedPrice) -> std::result::Result<(), TransportError> {
        self.api
            .submit_price(settings.site_id, &settings.tokens.access_token, price)
            .await
    }

    /// Drive the state machine to a terminal state
    pub async fn update(&self, settings: &mut Settings, price: ComputedPrice) -> Result<UpdateReport> {
        let logger = get_logger_with_context(
            LogContext::new("updater")
                .with_site_id(settings.site_id)
                .with_zone(settings.zone.as_str()),
        );
        let refresher = CredentialRefresher::new(self.api, self.store);

        let mut state = UpdateState::Idle;
        let mut trace = vec![state];
        let mut attempts = 0;
        let mut refreshed = false;
        let mut failure: Option<StromprisError> = None;

        while !state.is_terminal() {
            state = match state {
                UpdateState::Idle => UpdateState::Submitting,
                UpdateState::Submitting => {
                    attempts += 1;
                    match self.submit(settings, price).await {
                        Ok(()) => UpdateState::Succeeded,
                        Err(e) if e.is_unauthorized() => {
                            logger.warn("Access token rejected, refreshing");
                            UpdateState::AuthFailed
                        }
                        Err(e) => {
                            failure = Some(StromprisError::submission_failed(
                                e.status(),
                                format!("price update failed: {}", e),
                            ));
                            UpdateState::OtherFailed
                        }
                    }
                }
                UpdateState::AuthFailed => UpdateState::Refreshing,
                UpdateState::Refreshing => match refresher.refresh(settings).await {
                    Ok(_) => {
                        refreshed = true;
                        UpdateState::Retrying
                    }
                    Err(e) => {
                        failure = Some(e);
                        UpdateState::RefreshFailed
                    }
                },
                UpdateState::Retrying => {
                    attempts += 1;
                    match self.submit(settings, price).await {
                        Ok(()) => UpdateState::Succeeded,
                        Err(e) => {
                            failure = Some(StromprisError::submission_failed(
                                e.status(),
                                format!("unable to update price after token refresh: {}", e),
                            ));
                            UpdateState::OtherFailed
                        }
                    }
                }
                terminal => terminal,
            };
            trace.push(state);
        }

        logger.debug(&format!(
            "Submission path: {}",
            trace.iter().map(UpdateState::as_str).collect::<Vec<_>>().join(" -> ")
        ));

        match failure {
            None if state == UpdateState::Succeeded => {
                logger.info(&format!("Price {} was updated successfully", price));
                Ok(UpdateReport {
                    state,
                    refreshed,
                    attempts,
                    trace,
                })
            }
            Some(e) => {
                logger.error(&format!("Price update ended in {}: {}", state, e));
                Err(e)
            }
            None => Err(StromprisError::submission_failed(
                None,
                format!("price update ended in {}", state),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(UpdateState::Succeeded.is_terminal());
        assert!(UpdateState::OtherFailed.is_terminal());
        assert!(UpdateState::RefreshFailed.is_terminal());
        assert!(!UpdateState::AuthFailed.is_terminal());
        assert!(!UpdateState::Retrying.is_terminal());
        assert_eq!(UpdateState::RefreshFailed.to_string(), "refresh_failed");
    }
}
