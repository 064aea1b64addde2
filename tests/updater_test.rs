#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use strompris::charger::{ChargerApi, TransportError};
use strompris::credentials::CredentialRefresher;
use strompris::error::StromprisError;
use strompris::pricing::ComputedPrice;
use strompris::settings::{Settings, SettingsStore, TokenPair, Zone};
use strompris::updater::{PriceUpdater, UpdateState};

/// Scripted charger API
#[derive(Default)]
struct FakeCharger {
    submit_results: Mutex<VecDeque<Result<(), TransportError>>>,
    refresh_result: Mutex<Option<Result<TokenPair, TransportError>>>,
    submitted_with: Mutex<Vec<String>>,
    refresh_calls: Mutex<u32>,
}

impl FakeCharger {
    fn new(
        submits: Vec<Result<(), TransportError>>,
        refresh: Option<Result<TokenPair, TransportError>>,
    ) -> Self {
        Self {
            submit_results: Mutex::new(submits.into()),
            refresh_result: Mutex::new(refresh),
            ..Self::default()
        }
    }

    fn submit_count(&self) -> usize {
        self.submitted_with.lock().unwrap().len()
    }

    fn refresh_count(&self) -> u32 {
        *self.refresh_calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ChargerApi for FakeCharger {
    async fn submit_price(
        &self,
        _site_id: u64,
        access_token: &str,
        _price: ComputedPrice,
    ) -> Result<(), TransportError> {
        self.submitted_with
            .lock()
            .unwrap()
            .push(access_token.to_string());
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn refresh_tokens(&self, _current: &TokenPair) -> Result<TokenPair, TransportError> {
        *self.refresh_calls.lock().unwrap() += 1;
        self.refresh_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(TransportError::Timeout))
    }
}

fn status(code: u16) -> TransportError {
    TransportError::Status {
        status: code,
        body: String::new(),
    }
}

fn settings() -> Settings {
    Settings {
        site_id: 42,
        transmission_day: 30.0,
        transmission_night: 20.0,
        misc_costs: 0.02,
        zone: Zone::No2,
        tokens: TokenPair::new("old-access", "old-refresh"),
    }
}

fn store() -> (tempfile::TempDir, SettingsStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("data.json"));
    (dir, store)
}

#[tokio::test]
async fn first_submission_succeeds_without_refresh() {
    let (_dir, store) = store();
    let api = FakeCharger::new(vec![Ok(())], None);
    let mut s = settings();

    let report = PriceUpdater::new(&api, &store)
        .update(&mut s, ComputedPrice::from_ore(93))
        .await
        .unwrap();

    assert_eq!(report.state, UpdateState::Succeeded);
    assert!(!report.refreshed);
    assert_eq!(report.attempts, 1);
    assert_eq!(api.refresh_count(), 0);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn scenario_c_unauthorized_then_refresh_then_success() {
    let (_dir, store) = store();
    let api = FakeCharger::new(
        vec![Err(status(401)), Ok(())],
        Some(Ok(TokenPair::new("new-access", "new-refresh"))),
    );
    let mut s = settings();

    let report = PriceUpdater::new(&api, &store)
        .update(&mut s, ComputedPrice::from_ore(93))
        .await
        .unwrap();

    assert_eq!(report.state, UpdateState::Succeeded);
    assert!(report.refreshed);
    assert_eq!(report.attempts, 2);
    assert_eq!(api.refresh_count(), 1);
    assert_eq!(
        report.trace,
        vec![
            UpdateState::Idle,
            UpdateState::Submitting,
            UpdateState::AuthFailed,
            UpdateState::Refreshing,
            UpdateState::Retrying,
            UpdateState::Succeeded,
        ]
    );
    // retry used the new token
    assert_eq!(
        *api.submitted_with.lock().unwrap(),
        vec!["old-access".to_string(), "new-access".to_string()]
    );
    // both tokens replaced and persisted before the retry
    assert_eq!(s.tokens, TokenPair::new("new-access", "new-refresh"));
    assert_eq!(store.load().unwrap(), s);
}

#[tokio::test]
async fn scenario_d_refresh_rejected_no_retry() {
    let (_dir, store) = store();
    let api = FakeCharger::new(vec![Err(status(401))], Some(Err(status(400))));
    let mut s = settings();

    let err = PriceUpdater::new(&api, &store)
        .update(&mut s, ComputedPrice::from_ore(93))
        .await
        .unwrap_err();

    assert!(matches!(err, StromprisError::Auth { status: Some(400), .. }));
    assert_eq!(api.refresh_count(), 1);
    assert_eq!(api.submit_count(), 1);
    assert_eq!(s.tokens, TokenPair::new("old-access", "old-refresh"));
    assert!(!store.path().exists());
}

#[tokio::test]
async fn scenario_e_server_error_is_not_retried() {
    let (_dir, store) = store();
    let api = FakeCharger::new(
        vec![Err(status(500))],
        Some(Ok(TokenPair::new("unused", "unused"))),
    );
    let mut s = settings();

    let err = PriceUpdater::new(&api, &store)
        .update(&mut s, ComputedPrice::from_ore(93))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StromprisError::SubmissionFailed {
            status: Some(500),
            ..
        }
    ));
    assert_eq!(api.refresh_count(), 0);
    assert_eq!(api.submit_count(), 1);
}

#[tokio::test]
async fn forbidden_and_timeouts_are_not_auth_failures() {
    for failure in [status(403), TransportError::Timeout, TransportError::Connect("refused".into())] {
        let (_dir, store) = store();
        let api = FakeCharger::new(vec![Err(failure)], None);
        let mut s = settings();
        let err = PriceUpdater::new(&api, &store)
            .update(&mut s, ComputedPrice::from_ore(93))
            .await
            .unwrap_err();
        assert!(matches!(err, StromprisError::SubmissionFailed { .. }));
        assert_eq!(api.refresh_count(), 0);
    }
}

#[tokio::test]
async fn retry_failure_is_terminal_without_second_refresh() {
    let (_dir, store) = store();
    let api = FakeCharger::new(
        vec![Err(status(401)), Err(status(401)), Ok(())],
        Some(Ok(TokenPair::new("new-access", "new-refresh"))),
    );
    let mut s = settings();

    let err = PriceUpdater::new(&api, &store)
        .update(&mut s, ComputedPrice::from_ore(93))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StromprisError::SubmissionFailed {
            status: Some(401),
            ..
        }
    ));
    assert_eq!(api.refresh_count(), 1);
    assert_eq!(api.submit_count(), 2);
    // the refreshed pair is still kept
    assert_eq!(store.load().unwrap().tokens, TokenPair::new("new-access", "new-refresh"));
}

#[tokio::test]
async fn empty_token_from_exchange_is_rejected() {
    let (_dir, store) = store();
    let api = FakeCharger::new(
        vec![Err(status(401)), Ok(())],
        Some(Ok(TokenPair::new("", "new-refresh"))),
    );
    let mut s = settings();

    let err = PriceUpdater::new(&api, &store)
        .update(&mut s, ComputedPrice::from_ore(93))
        .await
        .unwrap_err();

    assert!(matches!(err, StromprisError::Auth { status: None, .. }));
    assert_eq!(api.refresh_count(), 1);
    assert_eq!(api.submit_count(), 1);
    assert_eq!(s.tokens, TokenPair::new("old-access", "old-refresh"));
    assert!(!store.path().exists());
}

#[tokio::test]
async fn unsaved_refresh_is_terminal_and_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("missing").join("data.json"));
    let api = FakeCharger::new(
        vec![Err(status(401)), Ok(())],
        Some(Ok(TokenPair::new("new-access", "new-refresh"))),
    );
    let mut s = settings();

    let err = PriceUpdater::new(&api, &store)
        .update(&mut s, ComputedPrice::from_ore(93))
        .await
        .unwrap_err();

    assert!(matches!(err, StromprisError::Io { .. }));
    assert!(err.to_string().contains("revoked"));
    assert_eq!(api.refresh_count(), 1);
    assert_eq!(api.submit_count(), 1);
    assert_eq!(s.tokens, TokenPair::new("new-access", "new-refresh"));
}

#[tokio::test]
async fn refresher_persists_the_new_pair() {
    let (_dir, store) = store();
    let api = FakeCharger::new(vec![], Some(Ok(TokenPair::new("a2", "r2"))));
    let mut s = settings();

    let fresh = CredentialRefresher::new(&api, &store)
        .refresh(&mut s)
        .await
        .unwrap();

    assert_eq!(fresh, TokenPair::new("a2", "r2"));
    assert_eq!(store.load().unwrap().tokens, fresh);
}
