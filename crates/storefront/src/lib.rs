//! Fashion Store storefront library.
//!
//! Client-side core of the storefront: the catalog API client, the client
//! state store that views read from and write to, and the fetch
//! orchestration that keeps the two in sync.
//!
//! # Architecture
//!
//! - [`catalog`] - `CatalogApi` trait and its `reqwest` implementation
//! - [`store`] - observable state: catalog, query, cart, loading/error flags
//! - [`fetch`] - loading/error protocol around every remote request
//! - [`config`] - environment-driven client configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use fashion_store_storefront::{CatalogFetcher, ClientConfig, HttpCatalogClient, Store};
//!
//! let config = ClientConfig::from_env()?;
//! let store = Store::new();
//! let fetcher = CatalogFetcher::new(
//!     HttpCatalogClient::new(&config),
//!     store.clone(),
//!     PageRequest::first(config.page_size),
//!     config.recommend_limit,
//! );
//! let _binding = fetcher.bind_query();
//!
//! store.set_query("white sneakers");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod fetch;
pub mod store;

pub use catalog::{CatalogApi, CatalogError, HttpCatalogClient, PageRequest, ProductFilter};
pub use config::{ClientConfig, ConfigError};
pub use fetch::CatalogFetcher;
pub use store::{Store, StoreState};
