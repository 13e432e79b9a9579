//! CLI error types with miette diagnostics.
//!
//! Maps action failures into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use bodega_config::ConfigError;
use bodega_core::export::ExportError;
use bodega_core::{ActionResult, CoreError, ErrorKind, SessionError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(bodega::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             Override the URL with --api-url or: bodega config set api_url <URL>"
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No autenticado")]
    #[diagnostic(
        code(bodega::not_logged_in),
        help("Log in first with: bodega login --profile {profile}")
    )]
    NotLoggedIn { profile: String },

    #[error("{message}")]
    #[diagnostic(
        code(bodega::auth_failed),
        help("Your session may have expired. Run: bodega login")
    )]
    AuthFailed { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(bodega::forbidden),
        help("Your role ({role}) cannot perform this operation.")
    )]
    Forbidden { message: String, role: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(bodega::not_found), help("Run: bodega {list_command}"))]
    NotFound {
        message: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(bodega::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(bodega::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(bodega::validation))]
    Validation { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bodega::invalid_argument))]
    InvalidArgument { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(bodega::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: bodega config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(bodega::config))]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(
        code(bodega::session),
        help("Remove the session file and log in again: bodega logout && bodega login")
    )]
    Session(#[from] SessionError),

    // ── Export ───────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(bodega::export))]
    Export(#[from] ExportError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(bodega::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(bodega::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(bodega::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotLoggedIn { .. } | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidArgument { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Classify an action failure by its error kind.
    pub fn from_action(message: String, kind: ErrorKind, ctx: &FailureContext<'_>) -> Self {
        match kind {
            ErrorKind::AuthMissing => Self::NotLoggedIn {
                profile: ctx.profile.to_owned(),
            },
            ErrorKind::Http { status: 401 } => Self::AuthFailed { message },
            ErrorKind::Http { status: 403 } => Self::Forbidden {
                message,
                role: ctx.role.to_owned(),
            },
            ErrorKind::Http { status: 404 } => Self::NotFound {
                message,
                list_command: ctx.list_command.to_owned(),
            },
            ErrorKind::Http { status: 409 } => Self::Conflict { message },
            ErrorKind::Validation => Self::Validation { message },
            ErrorKind::Network => Self::ConnectionFailed { message },
            ErrorKind::Http { .. } | ErrorKind::Parse | ErrorKind::Session => {
                Self::ApiError { message }
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let kind = err.kind();
        Self::from_action(err.to_string(), kind, &FailureContext::default())
    }
}

/// What the failing command was about, for help text.
#[derive(Debug, Clone, Copy)]
pub struct FailureContext<'a> {
    pub profile: &'a str,
    pub role: &'a str,
    pub list_command: &'a str,
}

impl Default for FailureContext<'_> {
    fn default() -> Self {
        Self {
            profile: "default",
            role: "-",
            list_command: "--help",
        }
    }
}

/// Turn an [`ActionResult`] into a `Result` for `?` in command handlers.
pub trait ActionResultExt<T> {
    fn or_fail(self, ctx: &FailureContext<'_>) -> Result<T, CliError>;
}

impl<T> ActionResultExt<T> for ActionResult<T> {
    fn or_fail(self, ctx: &FailureContext<'_>) -> Result<T, CliError> {
        self.into_result()
            .map_err(|(message, kind)| CliError::from_action(message, kind, ctx))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_exit_codes() {
        let ctx = FailureContext::default();
        let cases = [
            (ErrorKind::AuthMissing, exit_code::AUTH),
            (ErrorKind::Http { status: 401 }, exit_code::AUTH),
            (ErrorKind::Http { status: 403 }, exit_code::PERMISSION),
            (ErrorKind::Http { status: 404 }, exit_code::NOT_FOUND),
            (ErrorKind::Http { status: 409 }, exit_code::CONFLICT),
            (ErrorKind::Http { status: 500 }, exit_code::GENERAL),
            (ErrorKind::Network, exit_code::CONNECTION),
            (ErrorKind::Validation, exit_code::USAGE),
        ];
        for (kind, code) in cases {
            let err = CliError::from_action("x".into(), kind, &ctx);
            assert_eq!(err.exit_code(), code, "{kind:?}");
        }
    }

    #[test]
    fn server_message_is_kept_verbatim() {
        let err = CliError::from_action(
            "Error 403 en la API: No tienes permisos".into(),
            ErrorKind::Http { status: 403 },
            &FailureContext::default(),
        );
        assert_eq!(err.to_string(), "Error 403 en la API: No tienes permisos");
    }
}
