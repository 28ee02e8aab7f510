//! Fashion Store Core - Shared domain types.
//!
//! This crate provides the types used across all Fashion Store components:
//! - `storefront` - HTTP client, client state store and fetch orchestration
//! - `cli` - Command-line catalog browser
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no runtime.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product records, cart line items, prices and type-safe IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
