use thiserror::Error;

/// Top-level error type for the `trasua-api` crate.
///
/// Covers every failure mode of the address endpoints: transport,
/// upstream status errors, body decoding, and caller-driven cancellation.
/// `trasua-core` maps these into pipeline-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for API paths: {url}")]
    InvalidBaseUrl { url: String },

    // ── Upstream ────────────────────────────────────────────────────
    /// Non-2xx response. `message` comes from the `{message}` body when present.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Caller ──────────────────────────────────────────────────────
    /// The request was abandoned because its cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// Returns `true` if the request was superseded and dropped on purpose.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
