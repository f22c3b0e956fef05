//! Printshop API library.
//!
//! This crate provides the catalog proxy as a library, allowing it to be
//! tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod printful;
pub mod routes;
pub mod state;
