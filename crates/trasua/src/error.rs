//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use trasua_config::ConfigError;
use trasua_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(trasua::connection_failed),
        help(
            "Check that the service is reachable.\n\
             URL: {url}\n\
             Override it with --divisions-url / --places-url or `trasua config set`."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(trasua::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout,

    // ── Lookup ───────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(trasua::not_found),
        help("Run: trasua {list_command} to see available codes")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No suggestions for '{query}'")]
    #[diagnostic(
        code(trasua::no_suggestions),
        help("Try a longer or differently spelled query.")
    )]
    NoSuggestions { query: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(trasua::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(trasua::validation))]
    Validation { field: String, reason: String },

    #[error("Nothing to geocode")]
    #[diagnostic(
        code(trasua::empty_address),
        help("{message}\nPass --street and/or --province/--district/--ward.")
    )]
    EmptyAddress { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(trasua::profile_not_found),
        help(
            "Config file: {path}\n\
             Create one with: trasua config init"
        )
    )]
    ProfileNotFound { name: String, path: String },

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(trasua::config_exists),
        help("Found {path}\nPass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(trasua::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Interactive prompt failed: {reason}")]
    #[diagnostic(
        code(trasua::interactive),
        help("`trasua pick` needs a terminal; use `trasua resolve` in scripts.")
    )]
    Interactive { reason: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(trasua::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(trasua::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(trasua::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::NoSuggestions { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::EmptyAddress { .. }
            | Self::ProfileNotFound { .. }
            | Self::ConfigExists { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name, path } => Self::ProfileNotFound { name, path },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}

impl From<trasua_api::Error> for CliError {
    fn from(err: trasua_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::ValidationEmpty { message } => CliError::EmptyAddress { message },

            CoreError::UnknownCode { tier, code } => CliError::NotFound {
                list_command: match tier {
                    trasua_core::Tier::Province => "provinces".into(),
                    trasua_core::Tier::District => "districts <PROVINCE>".into(),
                    trasua_core::Tier::Ward => "wards <DISTRICT>".into(),
                },
                resource_type: tier.to_string(),
                identifier: code,
            },

            CoreError::UnknownSuggestion { id } => CliError::NotFound {
                resource_type: "suggestion".into(),
                identifier: id,
                list_command: "search <QUERY>".into(),
            },

            CoreError::NoMatch { tier, fragment } => CliError::NotFound {
                resource_type: tier.to_string(),
                identifier: fragment,
                list_command: "parse <LABEL>".into(),
            },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::FetchFailed { operation, message } => CliError::ApiError {
                status: None,
                message: format!("loading {operation} failed: {message}"),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "endpoint".into(),
                reason: message,
            },

            CoreError::Cancelled => CliError::Internal("request was cancelled".into()),

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let err: CliError = CoreError::Timeout.into();
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);

        let err: CliError = CoreError::UnknownCode {
            tier: trasua_core::Tier::Ward,
            code: "1".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);

        let err: CliError = CoreError::ValidationEmpty {
            message: "empty".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn api_status_is_shown_when_known() {
        let err = CliError::ApiError {
            status: Some(422),
            message: "Address not found".into(),
        };
        assert_eq!(err.to_string(), "API error (422): Address not found");
    }
}
