use bodega_api::{ApiResponse, Query};
use chrono::NaiveDate;
use serde_json::json;

use super::{Actions, Page, into_data};
use crate::invalidate::View;
use crate::model::{CreateSale, Sale, SaleFilters, SaleStatus, SalesStats};
use crate::result::ActionResult;

pub const SALES_PAGE_LIMIT: u32 = 10;

impl Actions {
    pub async fn list_sales(
        &self,
        page: u32,
        limit: u32,
        filters: &SaleFilters,
    ) -> ActionResult<Page<Sale>> {
        let query = filters.apply(Query::paged(page, limit));
        self.authed("sales.list", |token| async move {
            Ok(self
                .api()
                .get_with_params("/sales", &query, Some(&token))
                .await?)
        })
        .await
    }

    pub async fn sales_stats(&self) -> ActionResult<SalesStats> {
        self.authed("sales.stats", |token| async move {
            let resp: ApiResponse<SalesStats> =
                self.api().get("/sales/stats", Some(&token)).await?;
            into_data(resp)
        })
        .await
    }

    pub async fn get_sale(&self, id: &str) -> ActionResult<Sale> {
        self.authed("sales.get", |token| async move {
            let resp: ApiResponse<Sale> =
                self.api().get(&format!("/sales/{id}"), Some(&token)).await?;
            into_data(resp)
        })
        .await
    }

    pub async fn create_sale(&self, data: &CreateSale) -> ActionResult<Sale> {
        self.authed("sales.create", |token| async move {
            let resp: ApiResponse<Sale> = self.api().post("/sales", data, Some(&token)).await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Sales]);
            Ok(saved)
        })
        .await
    }

    pub async fn update_sale_status(&self, id: &str, status: SaleStatus) -> ActionResult<Sale> {
        let body = json!({ "status": status });
        self.authed("sales.status", |token| async move {
            let resp: ApiResponse<Sale> = self
                .api()
                .put(&format!("/sales/{id}/status"), &body, Some(&token))
                .await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Sales]);
            Ok(saved)
        })
        .await
    }

    /// Unpaginated sales report for the spreadsheet export.
    pub async fn sales_for_export(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ActionResult<Vec<Sale>> {
        let query = Query::new()
            .push_opt("startDate", start)
            .push_opt("endDate", end);
        self.authed("sales.export", |token| async move {
            let resp: Page<Sale> = self
                .api()
                .get_with_params("/sales/export", &query, Some(&token))
                .await?;
            Ok(resp.data_or_default())
        })
        .await
    }
}
