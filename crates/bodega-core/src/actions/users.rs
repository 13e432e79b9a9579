use bodega_api::{ApiResponse, Query};
use serde_json::Value;

use super::{Actions, Page, into_data};
use crate::invalidate::View;
use crate::model::{CreateUser, UpdateUser, User, UserFilters, UserStats};
use crate::result::ActionResult;

pub const USER_PAGE_LIMIT: u32 = 10;

impl Actions {
    pub async fn list_users(
        &self,
        page: u32,
        limit: u32,
        filters: &UserFilters,
    ) -> ActionResult<Page<User>> {
        let query = filters.apply(Query::paged(page, limit));
        self.authed("users.list", |token| async move {
            Ok(self
                .api()
                .get_with_params("/user", &query, Some(&token))
                .await?)
        })
        .await
    }

    pub async fn get_user(&self, id: &str) -> ActionResult<User> {
        self.authed("users.get", |token| async move {
            let resp: ApiResponse<User> =
                self.api().get(&format!("/user/{id}"), Some(&token)).await?;
            into_data(resp)
        })
        .await
    }

    pub async fn create_user(&self, data: &CreateUser) -> ActionResult<User> {
        self.authed("users.create", |token| async move {
            let resp: ApiResponse<User> = self.api().post("/user", data, Some(&token)).await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Users]);
            Ok(saved)
        })
        .await
    }

    pub async fn update_user(&self, id: &str, data: &UpdateUser) -> ActionResult<User> {
        self.authed("users.update", |token| async move {
            let resp: ApiResponse<User> = self
                .api()
                .put(&format!("/user/{id}"), data, Some(&token))
                .await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Users, View::User(id.to_owned())]);
            Ok(saved)
        })
        .await
    }

    /// Soft delete: the API marks the user inactive.
    pub async fn deactivate_user(&self, id: &str) -> ActionResult<()> {
        self.authed("users.deactivate", |token| async move {
            let _: Value = self
                .api()
                .delete(&format!("/user/{id}/soft"), Some(&token))
                .await?;
            self.invalidate([View::Users]);
            Ok(())
        })
        .await
    }

    /// Permanent delete.
    pub async fn delete_user(&self, id: &str) -> ActionResult<()> {
        self.authed("users.delete", |token| async move {
            let _: Value = self
                .api()
                .delete(&format!("/user/{id}"), Some(&token))
                .await?;
            self.invalidate([View::Users]);
            Ok(())
        })
        .await
    }

    pub async fn user_stats(&self) -> ActionResult<UserStats> {
        self.authed("users.stats", |token| async move {
            let resp: ApiResponse<UserStats> = self.api().get("/user/stats", Some(&token)).await?;
            into_data(resp)
        })
        .await
    }
}
