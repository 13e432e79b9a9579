// bodega-api: Async Rust client for the bodega back-office REST API

pub mod client;
pub mod envelope;
pub mod error;
pub mod query;
pub mod transport;

pub use client::ApiClient;
pub use envelope::{ApiResponse, PageMeta};
pub use error::Error;
pub use query::Query;
pub use transport::TransportConfig;

/// Origin used when no API URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3006";
