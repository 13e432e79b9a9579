use bodega_api::ApiResponse;
use serde_json::{Value, json};

use super::{Actions, finish, into_data};
use crate::error::CoreError;
use crate::invalidate::View;
use crate::model::{UpdateUser, User};
use crate::result::ActionResult;

impl Actions {
    /// The profile cached at login. Never contacts the API.
    pub fn user_data(&self) -> ActionResult<User> {
        finish(
            "profile.user_data",
            self.session().user().ok_or(CoreError::MissingUserData),
        )
    }

    /// Fresh profile of the session's user.
    pub async fn profile(&self) -> ActionResult<User> {
        self.authed("profile.get", |token| async move {
            let resp: ApiResponse<User> = self.api().get("/auth/profile", Some(&token)).await?;
            into_data(resp)
        })
        .await
    }

    /// Update a profile. When it is the session's own, the cached copy follows.
    pub async fn update_profile(&self, user_id: &str, data: &UpdateUser) -> ActionResult<User> {
        self.authed("profile.update", |token| async move {
            let resp: ApiResponse<User> = self
                .api()
                .put(&format!("/user/{user_id}"), data, Some(&token))
                .await?;
            let user = into_data(resp)?;
            if self.session().user().is_some_and(|u| u.id == user.id) {
                self.session().refresh_user(user.clone())?;
            }
            self.invalidate([View::Profile]);
            Ok(user)
        })
        .await
    }

    /// Change a password through the generic user update.
    ///
    /// `current` must be non-empty but is neither sent nor checked here;
    /// whether the API verifies it is unknown.
    pub async fn change_password(
        &self,
        user_id: &str,
        current: &str,
        new: &str,
    ) -> ActionResult<()> {
        let body = json!({ "password": new });
        self.authed("profile.password", |token| async move {
            if current.is_empty() {
                return Err(CoreError::validation("La contraseña actual es requerida"));
            }
            if new.is_empty() {
                return Err(CoreError::validation("La nueva contraseña es requerida"));
            }
            let _: Value = self
                .api()
                .put(&format!("/user/{user_id}"), &body, Some(&token))
                .await?;
            Ok(())
        })
        .await
    }
}
