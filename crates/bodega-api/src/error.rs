use thiserror::Error;

/// Top-level error type for the `bodega-api` crate.
///
/// Mirrors the failure modes of a single request: the API answered with a
/// non-success status, no response arrived at all, or a success body could
/// not be decoded. `bodega-core` folds these into its `ErrorKind` taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the body's `message` field, the raw
    /// body, or the status reason phrase, in that order of preference.
    #[error("Error {status} en la API: {message}")]
    Http { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// No response (connection refused, DNS failure, reset).
    #[error("Error de conexión con el servidor (verifique la red o la URL de la API)")]
    Connection(#[source] reqwest::Error),

    /// Request timed out.
    #[error("La solicitud excedió el tiempo límite de {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("URL inválida: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client itself could not be built.
    #[error("No se pudo construir el cliente HTTP: {0}")]
    Client(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Respuesta inválida de la API: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status of an API rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Returns `true` if no response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout { .. })
    }
}
