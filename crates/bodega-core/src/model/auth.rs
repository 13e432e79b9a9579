// ── Authentication payloads ──

use secrecy::SecretString;
use serde::Serialize;

use super::user::{DocumentType, Role};

/// Email/password pair for `/auth/login`.
///
/// Not `Serialize`: the password is exposed only when the login body is built.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub name: String,
    pub last_name: String,
    pub id_number: String,
    pub type_document: DocumentType,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub status: bool,
}
