// ── Core error types ──
//
// Pipeline-level errors from trasua-core. Consumers never see reqwest
// errors or JSON parse failures directly; the `From<trasua_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

use crate::model::Tier;

/// Unified error type for the core crate.
///
/// Every variant is recoverable: the selector records the display string
/// in its state and stays usable at the last good selection.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ────────────────────────────────────────────────────────
    /// Geocoding was requested before any address part was chosen.
    #[error("{message}")]
    ValidationEmpty { message: String },

    // ── Fetching ─────────────────────────────────────────────────────
    /// A tier list or geocode request failed; `operation` names which.
    #[error("Failed to load {operation}: {message}")]
    FetchFailed { operation: String, message: String },

    /// Request superseded by a newer one. Never shown to users.
    #[error("Request cancelled")]
    Cancelled,

    // ── Resolution ───────────────────────────────────────────────────
    /// A label fragment matched none of the loaded units of `tier`.
    #[error("No {tier} matches '{fragment}'")]
    NoMatch { tier: Tier, fragment: String },

    /// The chosen suggestion is not in the current dropdown.
    #[error("No suggestion with id '{id}'")]
    UnknownSuggestion { id: String },

    /// A code was selected that is not in the loaded list of its tier.
    #[error("Unknown {tier} code: {code}")]
    UnknownCode { tier: Tier, code: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for superseded requests that callers drop silently.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Wrap a failure of `operation` into `FetchFailed`, keeping cancellations intact.
    pub(crate) fn fetch(operation: impl Into<String>, err: Self) -> Self {
        match err {
            Self::Cancelled => Self::Cancelled,
            Self::FetchFailed { .. } | Self::ValidationEmpty { .. } => err,
            other => Self::FetchFailed {
                operation: operation.into(),
                message: other.to_string(),
            },
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<trasua_api::Error> for CoreError {
    fn from(err: trasua_api::Error) -> Self {
        match err {
            trasua_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            trasua_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            trasua_api::Error::InvalidBaseUrl { url } => CoreError::Config {
                message: format!("Base URL cannot carry API paths: {url}"),
            },
            trasua_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            trasua_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            trasua_api::Error::Cancelled => CoreError::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_translate() {
        let err: CoreError = trasua_api::Error::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert!(matches!(
            err,
            CoreError::Api {
                status: Some(500),
                ..
            }
        ));

        let err: CoreError = trasua_api::Error::Cancelled.into();
        assert!(err.is_cancelled());
    }

    #[test]
    fn fetch_wrapping_preserves_cancellation() {
        assert!(CoreError::fetch("districts", CoreError::Cancelled).is_cancelled());

        let wrapped = CoreError::fetch("districts", CoreError::Timeout);
        assert_eq!(
            wrapped.to_string(),
            "Failed to load districts: Request timed out"
        );
    }
}
