//! Normalized product representation served to the storefront frontend.
//!
//! Field names serialize in camelCase and prices serialize as JSON numbers,
//! matching what the frontend product grid expects:
//!
//! ```json
//! {
//!   "id": 42,
//!   "title": "Tee",
//!   "price": 19.99,
//!   "category": "Shirts",
//!   "images": { "front": "https://...", "preview": "", "thumbnail": "" },
//!   "rating": { "rate": 0, "count": 0 },
//!   "availabilityStatus": "active",
//!   "variants": [...]
//! }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProductId, VariantId};

/// A product normalized from a provider sync product and its variants.
///
/// Top-level commerce fields (price, sku, currency, color, availability,
/// external ID) are taken from the first sync variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProduct {
    /// Provider sync product ID.
    pub id: ProductId,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Category display title, `"Unknown"` when the category is not listed.
    pub category: String,
    pub images: ProductImages,
    pub rating: ProductRating,
    pub sku: String,
    pub currency: String,
    pub color: String,
    pub availability_status: String,
    pub external_id: String,
    /// Every sync variant, in provider order.
    pub variants: Vec<ProductVariant>,
}

/// Image URLs for a product.
///
/// Missing images are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    pub front: String,
    pub preview: String,
    pub thumbnail: String,
}

/// Product rating.
///
/// The provider has no review data, so this is always zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRating {
    pub rate: u32,
    pub count: u32,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub name: String,
    pub size: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub sku: String,
    pub external_id: String,
    pub color: String,
}
