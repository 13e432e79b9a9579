// ── User domain type ──

use bodega_api::Query;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Seller,
    Customer,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrador",
            Self::Seller => "Vendedor",
            Self::Customer => "Cliente",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentType {
    Cc,
    Ce,
    Ti,
    Nit,
    Passport,
}

impl DocumentType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cc => "Cédula de Ciudadanía",
            Self::Ce => "Cédula de Extranjería",
            Self::Ti => "Tarjeta de Identidad",
            Self::Nit => "NIT",
            Self::Passport => "Pasaporte",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub id_number: String,
    pub type_document: DocumentType,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.last_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub last_name: String,
    pub id_number: String,
    pub type_document: DocumentType,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_document: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<bool>,
}

impl UserFilters {
    pub fn apply(&self, query: Query) -> Query {
        query
            .push_opt("search", self.search.as_deref())
            .push_opt("role", self.role)
            .push_opt("status", self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    #[serde(rename = "_id")]
    pub role: Role,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub inactive: u64,
    #[serde(default)]
    pub by_role: Vec<RoleCount>,
}

impl UserStats {
    pub fn count_for(&self, role: Role) -> u64 {
        self.by_role
            .iter()
            .filter(|rc| rc.role == role)
            .map(|rc| rc.count)
            .sum()
    }
}
