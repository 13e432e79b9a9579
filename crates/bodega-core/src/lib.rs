//! Session handling, action layer, and presentation state for the bodega
//! back-office.
//!
//! - **[`Actions`]**: One async method per backend operation. Every call
//!   resolves the token from the [`SessionProvider`], talks to the API
//!   through `bodega-api`, and returns an [`ActionResult`] instead of an
//!   error. Mutations publish the [`View`]s they made stale on the
//!   [`Invalidator`].
//!
//! - **[`SessionProvider`]**: Where the token and cached profile live.
//!   [`MemorySession`] is the in-process implementation; `bodega-config`
//!   adds a file-backed one.
//!
//! - **[`guard`]**: Role-based route access shared by the CLI and TUI.
//!
//! - **[`ui`]**: Paginated list state with stale-response guarding,
//!   debounced search, create/edit dialogs, and dashboard aggregations.
//!
//! - **[`export`]**: Sales and inventory reports reshaped into sheets and
//!   written as CSV.

pub mod actions;
pub mod error;
pub mod export;
pub mod format;
pub mod guard;
pub mod invalidate;
pub mod model;
pub mod result;
pub mod session;
pub mod ui;

// ── Primary re-exports ──────────────────────────────────────────────
pub use actions::{
    Actions, CATEGORY_PAGE_LIMIT, KARDEX_PAGE_LIMIT, PRODUCT_PAGE_LIMIT, Page, SALES_PAGE_LIMIT,
    USER_PAGE_LIMIT,
};
pub use error::{CoreError, ErrorKind, SessionError};
pub use format::{format_date, format_percent, format_price, format_time};
pub use guard::{Route, RouteDecision, route_decision, visible_routes};
pub use invalidate::{Invalidator, View};
pub use result::ActionResult;
pub use session::{MemorySession, Session, SessionProvider, StoredSession};

pub use model::{
    Category, CategoryFilters, CategoryRef, CreateCategory, CreateKardex, CreateProduct,
    CreateSale, CreateUser, DocumentType, InventoryItem, InventoryStats, Kardex,
    KardexExportItem, KardexFilters, LoginCredentials, Product, ProductFilters, ProductItem,
    ProductRef, RegisterData, Role, Sale, SaleFilters, SaleLine, SaleStatus, SalesStats,
    UpdateCategory, UpdateProduct, UpdateUser, User, UserFilters, UserStats,
};
