// ── Product domain type ──

use bodega_api::Query;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product's category: a bare id, or the category document when the API
/// populates the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: String,
    },
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Populated { id, .. } => id,
        }
    }

    /// Human label: the category name when populated, else the raw id.
    pub fn label(&self) -> &str {
        match self {
            Self::Populated { name, .. } if !name.is_empty() => name,
            _ => self.id(),
        }
    }
}

impl Default for CategoryRef {
    fn default() -> Self {
        Self::Id(String::new())
    }
}

/// A product referenced from a sale line or kardex entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
}

impl ProductRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Populated { id, .. } => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Populated { name, .. } if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "image_url", default)]
    pub image_url: String,
    #[serde(default)]
    pub cost: f64,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    /// Percentage, 0-100.
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub status: bool,
    #[serde(rename = "category_id", default)]
    pub category_id: CategoryRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price after applying the percentage discount.
    pub fn final_price(&self) -> f64 {
        self.price * (1.0 - self.discount / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub cost: f64,
    pub price: f64,
    pub stock: i64,
    pub discount: f64,
    pub status: bool,
    pub category_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilters {
    pub fn apply(&self, query: Query) -> Query {
        query
            .push_opt("search", self.search.as_deref())
            .push_opt("category_id", self.category_id.as_deref())
            .push_opt("status", self.status)
            .push_opt("minPrice", self.min_price)
            .push_opt("maxPrice", self.max_price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_ref_accepts_id_or_document() {
        let bare: Product = serde_json::from_str(
            r#"{"_id":"p1","name":"Mouse","price":10,"category_id":"c1"}"#,
        )
        .unwrap();
        assert_eq!(bare.category_id.id(), "c1");
        assert_eq!(bare.category_id.label(), "c1");

        let populated: Product = serde_json::from_str(
            r#"{"_id":"p1","name":"Mouse","price":10,"category_id":{"_id":"c1","name":"Periféricos"}}"#,
        )
        .unwrap();
        assert_eq!(populated.category_id.id(), "c1");
        assert_eq!(populated.category_id.label(), "Periféricos");
    }

    #[test]
    fn filters_use_wire_names() {
        let filters = ProductFilters {
            search: Some("mouse".into()),
            status: Some(false),
            min_price: Some(5.0),
            ..ProductFilters::default()
        };
        let q = filters.apply(Query::paged(2, 10));
        assert_eq!(q.get("search"), Some("mouse"));
        assert_eq!(q.get("status"), Some("false"));
        assert_eq!(q.get("minPrice"), Some("5"));
        assert_eq!(q.get("maxPrice"), None);
        assert_eq!(q.get("category_id"), None);
    }

    #[test]
    fn update_skips_absent_fields() {
        let update = UpdateProduct {
            price: Some(12.5),
            ..UpdateProduct::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({"price": 12.5}));
    }
}
