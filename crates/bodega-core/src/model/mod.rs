// ── Domain records ──
//
// Mirrors of the API's JSON contract. The API owns every record; these are
// transient copies held by whichever screen fetched them.

pub mod auth;
pub mod category;
pub mod kardex;
pub mod product;
pub mod sale;
pub mod user;

pub use auth::{LoginCredentials, RegisterData};
pub use category::{Category, CategoryFilters, CreateCategory, UpdateCategory};
pub use kardex::{
    CreateKardex, InventoryItem, InventoryStats, Kardex, KardexExportItem, KardexFilters,
};
pub use product::{
    CategoryRef, CreateProduct, Product, ProductFilters, ProductRef, UpdateProduct,
};
pub use sale::{
    CreateSale, ProductItem, Sale, SaleFilters, SaleLine, SaleStatus, SalesStats, StatusCounts,
};
pub use user::{
    CreateUser, DocumentType, Role, RoleCount, UpdateUser, User, UserFilters, UserStats,
};
