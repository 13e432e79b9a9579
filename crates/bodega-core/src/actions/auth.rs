use bodega_api::ApiResponse;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::info;

use super::{Actions, finish, into_data};
use crate::error::CoreError;
use crate::invalidate::View;
use crate::model::{LoginCredentials, RegisterData, User};
use crate::result::ActionResult;

impl Actions {
    /// Authenticate and store the returned token and profile as the session.
    pub async fn login(&self, credentials: &LoginCredentials) -> ActionResult<User> {
        let result = async {
            let email = credentials.email.trim();
            let password = credentials.password.expose_secret();
            if email.is_empty() || password.is_empty() {
                return Err(CoreError::validation("Email y contraseña son requeridos"));
            }

            let body = json!({ "email": email, "password": password });
            let resp: ApiResponse<User> = self.api().post("/auth/login", &body, None).await?;
            let token = resp.token.clone().ok_or_else(|| {
                CoreError::Api(bodega_api::Error::Deserialization {
                    message: "la respuesta de inicio de sesión no incluye token".into(),
                    body: String::new(),
                })
            })?;
            let user = into_data(resp)?;

            self.session().set(SecretString::from(token), user.clone())?;
            info!(email = %user.email, role = %user.role, "logged in");
            self.invalidate([View::Home]);
            Ok(user)
        }
        .await;
        finish("auth.login", result)
    }

    /// Create an account. Needs no session.
    pub async fn register(&self, data: &RegisterData) -> ActionResult<User> {
        let result = async {
            let resp: ApiResponse<User> = self.api().post("/auth/register", data, None).await?;
            into_data(resp)
        }
        .await;
        finish("auth.register", result)
    }

    /// Drop the local session. The API keeps no server-side session.
    pub fn logout(&self) -> ActionResult<()> {
        let result = self.session().clear().map_err(CoreError::from);
        if result.is_ok() {
            info!("logged out");
        }
        finish("auth.logout", result)
    }

    pub fn verify_auth(&self) -> ActionResult<bool> {
        ActionResult::success(self.session().is_authenticated())
    }
}
