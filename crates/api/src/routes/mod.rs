//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/products           - Every product, in Printful listing order
//! GET  /api/products/{id}      - One product by Printful sync product ID
//! ```
//!
//! Upstream failures return `500` and malformed ids return `400`, both
//! with a `{"error": "..."}` body.

pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the catalog API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::index))
        .route("/api/products/{id}", get(products::show))
}
