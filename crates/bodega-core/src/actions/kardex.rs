use bodega_api::{ApiResponse, Query};
use chrono::NaiveDate;

use super::{Actions, Page, into_data};
use crate::invalidate::View;
use crate::model::{
    CreateKardex, InventoryItem, InventoryStats, Kardex, KardexExportItem, KardexFilters,
};
use crate::result::ActionResult;

pub const KARDEX_PAGE_LIMIT: u32 = 10;

impl Actions {
    /// Current stock of every product with its latest movement.
    pub async fn inventory(&self) -> ActionResult<Vec<InventoryItem>> {
        self.authed("kardex.inventory", |token| async move {
            let resp: Page<InventoryItem> =
                self.api().get("/kardex/inventory", Some(&token)).await?;
            Ok(resp.data_or_default())
        })
        .await
    }

    pub async fn inventory_stats(&self) -> ActionResult<InventoryStats> {
        self.authed("kardex.stats", |token| async move {
            let resp: ApiResponse<InventoryStats> =
                self.api().get("/kardex/stats", Some(&token)).await?;
            into_data(resp)
        })
        .await
    }

    /// Movement history of one product.
    pub async fn kardex_by_product(
        &self,
        product_id: &str,
        page: u32,
        limit: u32,
        filters: &KardexFilters,
    ) -> ActionResult<Page<Kardex>> {
        let query = filters.apply(Query::paged(page, limit));
        self.authed("kardex.by_product", |token| async move {
            Ok(self
                .api()
                .get_with_params(&format!("/kardex/product/{product_id}"), &query, Some(&token))
                .await?)
        })
        .await
    }

    /// Record a stock movement.
    pub async fn create_kardex(&self, data: &CreateKardex) -> ActionResult<Kardex> {
        self.authed("kardex.create", |token| async move {
            let resp: ApiResponse<Kardex> = self.api().post("/kardex", data, Some(&token)).await?;
            let saved = into_data(resp)?;
            self.invalidate([View::Inventory]);
            Ok(saved)
        })
        .await
    }

    /// Unpaginated movement report for the spreadsheet export.
    pub async fn kardex_for_export(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ActionResult<Vec<KardexExportItem>> {
        let query = Query::new()
            .push_opt("startDate", start)
            .push_opt("endDate", end);
        self.authed("kardex.export", |token| async move {
            let resp: Page<KardexExportItem> = self
                .api()
                .get_with_params("/kardex/export", &query, Some(&token))
                .await?;
            Ok(resp.data_or_default())
        })
        .await
    }
}
