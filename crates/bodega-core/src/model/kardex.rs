// ── Kardex (inventory ledger) domain types ──

use bodega_api::Query;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::product::{Product, ProductRef};

/// One inventory movement: a signed quantity delta and the stock it left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kardex {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub comment: String,
    pub quantity: i64,
    pub stock: i64,
    #[serde(rename = "product_id", default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub product: Product,
    pub current_stock: i64,
    #[serde(default)]
    pub last_movement: Option<Kardex>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateKardex {
    pub product_id: String,
    pub comment: String,
    pub quantity: i64,
    /// Stock after applying `quantity`.
    pub stock: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KardexFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl KardexFilters {
    pub fn apply(&self, query: Query) -> Query {
        query
            .push_opt("startDate", self.start_date)
            .push_opt("endDate", self.end_date)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_stock: i64,
    #[serde(default)]
    pub low_stock: u64,
    #[serde(default)]
    pub out_of_stock: u64,
}

/// Row of the kardex export report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KardexExportItem {
    pub product: Product,
    pub kardex: Kardex,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
