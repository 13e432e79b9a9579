// ── Sale domain type ──

use bodega_api::Query;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::product::ProductRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

impl SaleStatus {
    /// Spreadsheet and table label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completada",
            Self::Pending => "Pendiente",
            Self::Cancelled => "Cancelada",
            Self::Other => "Otro",
        }
    }
}

/// One line of a sale as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    pub product_id: ProductRef,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductItem {
    /// Line name, falling back to the populated product, then its id.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.product_id
            .name()
            .unwrap_or_else(|| self.product_id.id())
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub products: Vec<ProductItem>,
    #[serde(default)]
    pub total: f64,
    pub status: SaleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(rename = "payment_id", default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Order number, or the record id when the API did not assign one.
    pub fn order_label(&self) -> &str {
        self.order_number.as_deref().unwrap_or(&self.id)
    }

    pub fn item_count(&self) -> u32 {
        self.products.iter().map(|p| p.quantity).sum()
    }
}

/// A line in a new sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleLine {
    pub product_id: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSale {
    pub products: Vec<SaleLine>,
    pub total: f64,
}

impl CreateSale {
    /// Build a sale whose total is the sum of its lines.
    pub fn from_lines(products: Vec<SaleLine>) -> Self {
        let total = products
            .iter()
            .map(|l| l.price * f64::from(l.quantity))
            .sum();
        Self { products, total }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilters {
    pub status: Option<SaleStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SaleFilters {
    pub fn apply(&self, query: Query) -> Query {
        query
            .push_opt("status", self.status)
            .push_opt("startDate", self.start_date)
            .push_opt("endDate", self.end_date)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub completed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    #[serde(default)]
    pub total_sales: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub status_counts: StatusCounts,
    #[serde(default)]
    pub total_revenue: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_decodes_as_other() {
        let sale: Sale =
            serde_json::from_str(r#"{"_id":"s1","status":"refunded","total":0}"#).unwrap();
        assert_eq!(sale.status, SaleStatus::Other);
        assert_eq!(sale.status.label(), "Otro");
        assert_eq!(sale.order_label(), "s1");
    }

    #[test]
    fn line_name_falls_back_to_populated_product() {
        let item: ProductItem = serde_json::from_str(
            r#"{"product_id":{"_id":"p1","name":"Teclado","price":20},"price":20,"quantity":2}"#,
        )
        .unwrap();
        assert_eq!(item.display_name(), "Teclado");
        assert!((item.subtotal() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn create_sale_totals_its_lines() {
        let sale = CreateSale::from_lines(vec![
            SaleLine { product_id: "a".into(), price: 2.5, quantity: 4 },
            SaleLine { product_id: "b".into(), price: 1.0, quantity: 1 },
        ]);
        assert!((sale.total - 11.0).abs() < f64::EPSILON);
    }
}
