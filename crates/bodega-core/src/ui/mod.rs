//! Framework-independent presentation state.
//!
//! The CLI and TUI both drive these: list pages with pagination and stale
//! response guarding, debounced search, create/edit dialogs, and the small
//! aggregations screens compute over data they already fetched.

pub mod debounce;
pub mod form;
pub mod list;
pub mod stats;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE, normalize_search};
pub use form::{
    CategoryDraft, FormDialog, FormDraft, FormMode, KardexDraft, MIN_PASSWORD_LEN, PasswordDraft,
    ProductDraft, SaleDraft, Submission, UserDraft,
};
pub use list::{ListPage, LoadState, Ticket};
pub use stats::{DashboardMetrics, PageSalesStats, StockLevel};
