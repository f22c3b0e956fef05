//! Printshop Core - Shared catalog types.
//!
//! This crate provides the normalized catalog shapes served by the
//! `printshop-api` binary to the storefront frontend.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no caching, no HTTP clients.
//! Everything provider-specific (raw Printful responses, normalization) lives
//! in the API crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, categories, and normalized products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
