use crate::pricing::ComputedPrice;
use crate::settings::TokenPair;
use std::fmt;

/// HTTP status signalling an expired or invalid access token
pub const UNAUTHORIZED: u16 = 401;

/// Every way an outbound call can fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-success status
    Status { status: u16, body: String },
    /// No answer within the configured timeout
    Timeout,
    /// The request could not be sent
    Connect(String),
    /// The server answered with a body we could not read
    Decode(String),
}

impl TransportError {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Only a 401 response counts; 403 and friends are not recoverable by refresh
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: UNAUTHORIZED, .. })
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, body } if body.is_empty() => write!(f, "HTTP {}", status),
            Self::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
            Self::Timeout => f.write_str("request timed out"),
            Self::Connect(message) => write!(f, "connection failed: {}", message),
            Self::Decode(message) => write!(f, "invalid response body: {}", message),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Connect(err.to_string())
        }
    }
}

/// Operations the job needs from the charger-management API
#[async_trait::async_trait]
pub trait ChargerApi: Send + Sync {
    /// Set the site's price per kWh using `access_token` as bearer
    async fn submit_price(
        &self,
        site_id: u64,
        access_token: &str,
        price: ComputedPrice,
    ) -> Result<(), TransportError>;

    /// Exchange the current pair for a new one
    async fn refresh_tokens(&self, current: &TokenPair) -> Result<TokenPair, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_401_is_unauthorized() {
        let unauthorized = TransportError::Status {
            status: 401,
            body: String::new(),
        };
        assert!(unauthorized.is_unauthorized());
        assert_eq!(unauthorized.status(), Some(401));

        let forbidden = TransportError::Status {
            status: 403,
            body: "nope".into(),
        };
        assert!(!forbidden.is_unauthorized());
        assert!(!TransportError::Timeout.is_unauthorized());
        assert_eq!(TransportError::Timeout.status(), None);
    }

    #[test]
    fn test_display() {
        let err = TransportError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
    }
}
