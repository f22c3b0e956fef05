//! Printful API client.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` with bearer-token auth
//! - Printful is source of truth - NO local sync, direct API calls
//! - No caching here; the `catalog` module owns all TTL caches
//!
//! # Endpoints
//!
//! - `GET /categories` - Full category taxonomy
//! - `GET /store/products` - Products in the connected store
//! - `GET /store/products/{id}` - Product with its sync variants and files
//!
//! # Example
//!
//! ```rust,ignore
//! use printshop_api::printful::{CatalogProvider, PrintfulClient};
//!
//! let client = PrintfulClient::new(&config.printful)?;
//! let products = client.store_products().await?;
//! let detail = client.store_product(products[0].id).await?;
//! ```

mod client;
pub mod types;

use std::future::Future;

use printshop_core::{CategoryEntry, ProductId};
use thiserror::Error;

pub use client::PrintfulClient;
pub use types::{SyncProduct, SyncProductDetail, SyncVariant, VariantFile};

/// Errors that can occur when talking to Printful.
#[derive(Debug, Error)]
pub enum PrintfulError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Printful answered with a non-success status (including 404).
    #[error("Printful returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configured store ID cannot be sent as a header.
    #[error("Invalid store ID header: {0}")]
    InvalidStoreId(#[from] reqwest::header::InvalidHeaderValue),
}

/// Source of raw catalog data.
///
/// Implemented by [`PrintfulClient`]; tests substitute in-memory providers.
pub trait CatalogProvider: Send + Sync + 'static {
    /// Fetch every category.
    fn categories(&self) -> impl Future<Output = Result<Vec<CategoryEntry>, PrintfulError>> + Send;

    /// List the products in the store, in provider order.
    fn store_products(&self)
    -> impl Future<Output = Result<Vec<SyncProduct>, PrintfulError>> + Send;

    /// Fetch one product with all of its sync variants.
    fn store_product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<SyncProductDetail, PrintfulError>> + Send;
}
