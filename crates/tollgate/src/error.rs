//! Error types for the license gate.

use chrono::{DateTime, Utc};

/// License and gating errors.
#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    /// License envelope could not be decoded.
    #[error("malformed license: {reason}")]
    Malformed { reason: String },

    /// Signature did not verify against the bundled key.
    #[error("license signature verification failed")]
    SignatureInvalid,

    /// License expired before evaluation time.
    #[error("license expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },

    /// License state read before a successful evaluation populated it.
    #[error("license state accessed before initialization")]
    NotInitialized,

    /// Network error while refreshing the feature set.
    #[error("network error: {message}")]
    Network { message: String },

    /// Malformed response from the entitlement endpoint.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl LicenseError {
    /// Whether the error is a license validation failure, as opposed to
    /// absence, call ordering, or transport trouble.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Malformed { .. } | Self::SignatureInvalid | Self::Expired { .. }
        )
    }
}

impl From<reqwest::Error> for LicenseError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for gate operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
