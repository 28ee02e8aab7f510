//! Catalog API collaborator.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local persistence, direct API calls
//! - [`CatalogApi`] is the seam the fetch orchestration depends on
//! - [`HttpCatalogClient`] implements it with `reqwest`
//! - Product details are cached in memory via `moka` (5 minute TTL by default)
//!
//! # Endpoints
//!
//! - `GET /products?page&limit` - catalog listing
//! - `GET /products/search?q&page&limit` - text search
//! - `GET /products/filter?...` - attribute filters
//! - `GET /products/{id}` - product detail
//! - `POST /recommend` - recommendations for a free-text query
//!
//! # Example
//!
//! ```rust,ignore
//! use fashion_store_storefront::catalog::{CatalogApi, HttpCatalogClient, PageRequest};
//!
//! let client = HttpCatalogClient::new(&config);
//! let products = client.search_products("shoe", PageRequest::default()).await?;
//! ```

mod cache;
mod client;
mod payload;

pub use client::HttpCatalogClient;

use std::future::Future;
use std::sync::Arc;

use fashion_store_core::{Price, Product, ProductDetail, ProductId, Recommendation};
use reqwest::StatusCode;
use thiserror::Error;

/// Maximum number of upstream body characters kept in errors.
const MAX_ERROR_BODY_CHARS: usize = 200;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure (connection refused, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Response body, truncated.
        body: String,
    },

    /// Response body did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CatalogError {
    /// Build a status error, truncating the body.
    #[must_use]
    pub fn status(status: StatusCode, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }

    /// Single human-readable message recorded in the store's `error` field.
    ///
    /// Transport, status and payload failures all collapse to one string;
    /// internal details (URLs, serde positions) are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(err) if err.is_timeout() => "timeout".to_string(),
            Self::Http(err) if err.is_connect() => {
                "Could not reach the catalog service".to_string()
            }
            Self::Http(_) => "Network error".to_string(),
            Self::Status { status, body } => {
                detail_message(body).unwrap_or_else(|| format!("Request failed ({status})"))
            }
            Self::Parse(_) => "Unexpected response from the catalog service".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::InvalidUrl(_) => "Invalid catalog service URL".to_string(),
        }
    }
}

/// Extract the `detail` message from an error body, when present.
fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Request Types
// =============================================================================

/// Page selection for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
}

impl PageRequest {
    /// First page with the given size.
    #[must_use]
    pub const fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }

    /// Query parameters for this page. Page 0 is sent as page 1.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(20)
    }
}

/// Attribute filters for `GET /products/filter`.
///
/// Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub gender: Option<String>,
    pub master_category: Option<String>,
    pub sub_category: Option<String>,
    pub article_type: Option<String>,
    pub base_colour: Option<String>,
    pub season: Option<String>,
    pub usage: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl ProductFilter {
    /// Query parameters for the set fields, in a stable order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("gender", &self.gender),
            ("master_category", &self.master_category),
            ("sub_category", &self.sub_category),
            ("article_type", &self.article_type),
            ("base_colour", &self.base_colour),
            ("season", &self.season),
            ("usage", &self.usage),
        ];
        let prices = [("min_price", self.min_price), ("max_price", self.max_price)];

        text.into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
            .chain(
                prices
                    .into_iter()
                    .filter_map(|(key, value)| value.map(|p| (key, p.amount().to_string()))),
            )
            .collect()
    }

    /// True when no filter field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

// =============================================================================
// CatalogApi
// =============================================================================

/// Remote catalog operations consumed by the fetch orchestration.
///
/// Every call is a single asynchronous operation that either resolves with
/// data or fails with a [`CatalogError`].
pub trait CatalogApi {
    /// List one page of the catalog.
    fn list_products(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Full-text search.
    fn search_products(
        &self,
        query: &str,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Attribute-filtered listing.
    fn filter_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// A single product with images and attributes.
    fn get_product_detail(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<ProductDetail, CatalogError>> + Send;

    /// Recommendations for a free-text query.
    fn recommend(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Recommendation>, CatalogError>> + Send;
}

impl<T> CatalogApi for Arc<T>
where
    T: CatalogApi + Send + Sync,
{
    fn list_products(
        &self,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
        self.as_ref().list_products(page)
    }

    fn search_products(
        &self,
        query: &str,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
        self.as_ref().search_products(query, page)
    }

    fn filter_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
        self.as_ref().filter_products(filter, page)
    }

    fn get_product_detail(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<ProductDetail, CatalogError>> + Send {
        self.as_ref().get_product_detail(id)
    }

    fn recommend(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Recommendation>, CatalogError>> + Send {
        self.as_ref().recommend(query, limit)
    }
}
