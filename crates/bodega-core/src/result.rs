// ── Action result envelope ──

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{CoreError, ErrorKind};

/// Uniform outcome of every action.
///
/// Serializes as `{"success": true, "data": …}` or
/// `{"success": false, "error": "…"}`; the kind stays in-process.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success { data: T },
    Failure { error: String, kind: ErrorKind },
}

impl<T> ActionResult<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(err: &CoreError) -> Self {
        Self::Failure {
            error: err.to_string(),
            kind: err.kind(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            Self::Success { data } => ActionResult::Success { data: f(data) },
            Self::Failure { error, kind } => ActionResult::Failure { error, kind },
        }
    }

    /// Split into the data or a `(message, kind)` pair.
    pub fn into_result(self) -> Result<T, (String, ErrorKind)> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { error, kind } => Err((error, kind)),
        }
    }
}

impl<T> From<Result<T, CoreError>> for ActionResult<T> {
    fn from(result: Result<T, CoreError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ActionResult", 2)?;
        match self {
            Self::Success { data } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure { error, .. } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_success_shape() {
        let ok = ActionResult::success(vec![1, 2]);
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn serializes_failure_shape() {
        let err: ActionResult<()> = ActionResult::failure(&CoreError::NotAuthenticated);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"success": false, "error": "No autenticado"})
        );
        assert_eq!(err.kind(), Some(ErrorKind::AuthMissing));
    }

    #[test]
    fn map_keeps_failure() {
        let err = ActionResult::<u32>::from(Err(CoreError::validation("x")));
        let mapped = err.map(|n| n + 1);
        assert_eq!(mapped.error(), Some("x"));
        assert_eq!(mapped.kind(), Some(ErrorKind::Validation));
    }
}
