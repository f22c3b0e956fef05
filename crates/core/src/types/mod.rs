//! Core types for Printshop.
//!
//! This module provides the frontend-facing catalog schema.

pub mod category;
pub mod id;
pub mod product;

pub use category::CategoryEntry;
pub use id::*;
pub use product::{NormalizedProduct, ProductImages, ProductRating, ProductVariant};
