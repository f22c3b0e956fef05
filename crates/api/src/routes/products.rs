//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use printshop_core::{NormalizedProduct, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// List every product.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<NormalizedProduct>>> {
    let products = state.catalog().get_all_products().await?;
    Ok(Json(products))
}

/// Show one product.
///
/// An id that is not a Printful sync product id is a `400`.
#[instrument(skip(state, id))]
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<ProductId>, PathRejection>,
) -> Result<Json<NormalizedProduct>> {
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected product id");
        AppError::BadRequest("Invalid product ID".to_string())
    })?;
    let product = state.catalog().get_product(id).await?;
    Ok(Json(product))
}
