use bodega_api::{ApiResponse, Query};
use serde_json::Value;

use super::{Actions, Page, into_data};
use crate::invalidate::View;
use crate::model::{Category, CategoryFilters, CreateCategory, UpdateCategory};
use crate::result::ActionResult;

/// Default page size of the categories screen.
pub const CATEGORY_PAGE_LIMIT: u32 = 100;

/// Upper bound used when loading categories for a picker.
const ALL_CATEGORIES_LIMIT: u32 = 1000;

impl Actions {
    pub async fn list_categories(
        &self,
        page: u32,
        limit: u32,
        filters: &CategoryFilters,
    ) -> ActionResult<Page<Category>> {
        let query = filters.apply(Query::paged(page, limit));
        self.authed("categories.list", |token| async move {
            Ok(self
                .api()
                .get_with_params("/category", &query, Some(&token))
                .await?)
        })
        .await
    }

    /// Every category, unpaginated, for select inputs.
    pub async fn all_categories(&self) -> ActionResult<Vec<Category>> {
        let query = Query::new().push("limit", ALL_CATEGORIES_LIMIT);
        self.authed("categories.all", |token| async move {
            let resp: Page<Category> = self
                .api()
                .get_with_params("/category", &query, Some(&token))
                .await?;
            Ok(resp.data_or_default())
        })
        .await
    }

    pub async fn get_category(&self, id: &str) -> ActionResult<Category> {
        self.authed("categories.get", |token| async move {
            let resp: ApiResponse<Category> = self
                .api()
                .get(&format!("/category/{id}"), Some(&token))
                .await?;
            into_data(resp)
        })
        .await
    }

    pub async fn create_category(&self, data: &CreateCategory) -> ActionResult<Category> {
        self.authed("categories.create", |token| async move {
            let resp: ApiResponse<Category> =
                self.api().post("/category", data, Some(&token)).await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Categories]);
            Ok(saved)
        })
        .await
    }

    pub async fn update_category(&self, id: &str, data: &UpdateCategory) -> ActionResult<Category> {
        self.authed("categories.update", |token| async move {
            let resp: ApiResponse<Category> = self
                .api()
                .put(&format!("/category/{id}"), data, Some(&token))
                .await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Categories, View::Category(id.to_owned())]);
            Ok(saved)
        })
        .await
    }

    pub async fn delete_category(&self, id: &str) -> ActionResult<()> {
        self.authed("categories.delete", |token| async move {
            let _: Value = self
                .api()
                .delete(&format!("/category/{id}"), Some(&token))
                .await?;
            self.invalidate([View::Categories]);
            Ok(())
        })
        .await
    }
}
