//! Easee charger-management API
//!
//! The API is reached through the [`ChargerApi`] trait so the submission
//! state machine can be driven by in-memory fakes in tests. Every failure,
//! whether the server answered with an error status or the request never
//! completed, is reported as one [`TransportError`].

pub mod client;
pub mod transport;
pub mod types;

pub use client::EaseeClient;
pub use transport::{ChargerApi, TransportError};
pub use types::{PriceUpdateRequest, RefreshTokenRequest, RefreshTokenResponse};
