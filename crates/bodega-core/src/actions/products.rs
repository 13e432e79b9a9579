use bodega_api::{ApiResponse, Query};
use serde_json::json;

use super::{Actions, Page, into_data};
use crate::invalidate::View;
use crate::model::{CreateProduct, Product, ProductFilters, UpdateProduct};
use crate::result::ActionResult;

pub const PRODUCT_PAGE_LIMIT: u32 = 10;

impl Actions {
    /// Products visible to the current user, filtered server-side.
    pub async fn list_products(
        &self,
        page: u32,
        limit: u32,
        filters: &ProductFilters,
    ) -> ActionResult<Page<Product>> {
        let query = filters.apply(Query::paged(page, limit));
        self.authed("products.list", |token| async move {
            Ok(self
                .api()
                .get_with_params("/product/user", &query, Some(&token))
                .await?)
        })
        .await
    }

    /// The current user's products, without filters.
    pub async fn my_products(&self, page: u32, limit: u32) -> ActionResult<Page<Product>> {
        let query = Query::paged(page, limit);
        self.authed("products.mine", |token| async move {
            Ok(self
                .api()
                .get_with_params("/product/user", &query, Some(&token))
                .await?)
        })
        .await
    }

    pub async fn get_product(&self, id: &str) -> ActionResult<Product> {
        self.authed("products.get", |token| async move {
            let resp: ApiResponse<Product> = self
                .api()
                .get(&format!("/product/{id}"), Some(&token))
                .await?;
            into_data(resp)
        })
        .await
    }

    pub async fn create_product(&self, data: &CreateProduct) -> ActionResult<Product> {
        self.authed("products.create", |token| async move {
            let resp: ApiResponse<Product> = self
                .api()
                .post("/product/register", data, Some(&token))
                .await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Products]);
            Ok(saved)
        })
        .await
    }

    pub async fn update_product(&self, id: &str, data: &UpdateProduct) -> ActionResult<Product> {
        self.authed("products.update", |token| async move {
            let resp: ApiResponse<Product> = self
                .api()
                .put(&format!("/product/{id}"), data, Some(&token))
                .await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Products, View::Product(id.to_owned())]);
            Ok(saved)
        })
        .await
    }

    /// Set a product's active flag. Callers pass the negated current status.
    pub async fn toggle_product_status(&self, id: &str, status: bool) -> ActionResult<Product> {
        let body = json!({ "status": status });
        self.authed("products.status", |token| async move {
            let resp: ApiResponse<Product> = self
                .api()
                .put(&format!("/product/{id}/status"), &body, Some(&token))
                .await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Products]);
            Ok(saved)
        })
        .await
    }
}
