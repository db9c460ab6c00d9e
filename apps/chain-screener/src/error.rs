//! Crate-level error type.
//!
//! Only configuration and acquisition failures surface as errors. Missing
//! quote data and degenerate combinations are handled inside the screening
//! pipeline by exclusion and never reach the caller.
//!
//! | Code | Usage |
//! |------|-------|
//! | `INVALID_CONFIG` | Malformed or contradictory constraints |
//! | `INVALID_SNAPSHOT` | Snapshot could not be read or has no spot |
//! | `FETCH_FAILED` | Live chain acquisition failed |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::feed::{FetchError, SnapshotError};

/// Error codes for the screener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Configuration could not be loaded or failed validation.
    InvalidConfig,
    /// Snapshot could not be parsed into a quote universe.
    InvalidSnapshot,
    /// Chain data could not be fetched.
    FetchFailed,
}

impl ErrorCode {
    /// Stable reason string for logs and process output.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::InvalidSnapshot => "INVALID_SNAPSHOT",
            Self::FetchFailed => "FETCH_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors surfaced by a screening run.
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Snapshot error.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Chain fetch error.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ScreenerError {
    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::InvalidConfig,
            Self::Snapshot(_) => ErrorCode::InvalidSnapshot,
            Self::Fetch(_) => ErrorCode::FetchFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_maps_to_invalid_config() {
        let error: ScreenerError = ConfigError::ValidationError("rr_range".to_string()).into();
        assert_eq!(error.code(), ErrorCode::InvalidConfig);
        assert!(error.to_string().contains("rr_range"));
    }

    #[test]
    fn test_snapshot_error_maps_to_invalid_snapshot() {
        let error: ScreenerError = SnapshotError::MissingSpot.into();
        assert_eq!(error.code(), ErrorCode::InvalidSnapshot);
    }

    #[test]
    fn test_fetch_error_maps_to_fetch_failed() {
        let error: ScreenerError = FetchError::RateLimited.into();
        assert_eq!(error.code(), ErrorCode::FetchFailed);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidConfig.to_string(), "INVALID_CONFIG");
        assert_eq!(ErrorCode::FetchFailed.reason(), "FETCH_FAILED");
    }
}
