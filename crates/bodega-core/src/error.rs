// ── Core error types ──
//
// Every failure an action can hit. Actions never return these directly:
// `ActionResult` carries the display text plus the `ErrorKind`, which is
// all a presentation layer needs to pick a notification or exit code.

use serde::Serialize;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("No autenticado")]
    NotAuthenticated,

    #[error("No se encontraron datos del usuario")]
    MissingUserData,

    #[error(transparent)]
    Session(#[from] SessionError),

    // ── Input errors ─────────────────────────────────────────────────
    #[error("{message}")]
    Validation { message: String },

    // ── API errors ───────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] bodega_api::Error),
}

/// Failure persisting or clearing the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No se pudo guardar la sesión en {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Sesión almacenada inválida: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Closed classification of action failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ErrorKind {
    /// No session token; nothing was sent.
    AuthMissing,
    /// The API answered with a non-success status.
    Http { status: u16 },
    /// No response reached us.
    Network,
    /// A success response did not decode.
    Parse,
    /// Input rejected before any request.
    Validation,
    /// The session store failed.
    Session,
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated | Self::MissingUserData => ErrorKind::AuthMissing,
            Self::Session(_) => ErrorKind::Session,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Api(err) => match err {
                bodega_api::Error::Http { status, .. } => ErrorKind::Http { status: *status },
                bodega_api::Error::Connection(_) | bodega_api::Error::Timeout { .. } => {
                    ErrorKind::Network
                }
                bodega_api::Error::Deserialization { .. } => ErrorKind::Parse,
                bodega_api::Error::InvalidUrl(_) | bodega_api::Error::Client(_) => {
                    ErrorKind::Validation
                }
            },
        }
    }
}

impl ErrorKind {
    /// The API rejected the token; the user has to log in again.
    pub fn is_unauthorized(self) -> bool {
        matches!(self, Self::AuthMissing | Self::Http { status: 401 })
    }
}
