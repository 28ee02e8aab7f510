//! HTTP implementation of the catalog API.
//!
//! Uses `reqwest` for HTTP and `moka` to cache product details and
//! recommendations. Listings and searches are never cached: every
//! orchestrated fetch goes to the network.

use std::sync::Arc;

use fashion_store_core::{Product, ProductDetail, ProductId, Recommendation};
use moka::future::Cache;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::payload::ListPayload;
use super::{CatalogApi, CatalogError, PageRequest, ProductFilter};
use crate::config::ClientConfig;

const CACHE_CAPACITY: u64 = 1000;

/// Body of `POST /recommend`.
#[derive(Debug, Serialize)]
struct RecommendRequest<'a> {
    query: &'a str,
    limit: u32,
}

// =============================================================================
// HttpCatalogClient
// =============================================================================

/// Client for the catalog REST API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct HttpCatalogClient {
    inner: Arc<HttpCatalogClientInner>,
}

struct HttpCatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl HttpCatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a client on top of a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(config: &ClientConfig, client: reqwest::Client) -> Self {
        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Self {
            inner: Arc::new(HttpCatalogClientInner {
                client,
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Build an endpoint URL with query parameters.
    fn endpoint<K, V>(
        &self,
        path: &str,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Url, CatalogError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = Url::parse(&format!("{}{path}", self.inner.base_url))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key.as_ref(), value.as_ref());
            }
        }
        // An empty `?` is left behind when there were no parameters
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// Send a request and decode the JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::status(status, &response_text));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse catalog API response"
            );
            CatalogError::Parse(e)
        })
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, CatalogError> {
        let payload: ListPayload<T> = self.execute(self.inner.client.get(url)).await?;
        Ok(payload.into_vec())
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn remember(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    /// Drop every cached detail and recommendation.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
        }
    }
}

impl CatalogApi for HttpCatalogClient {
    #[instrument(skip(self))]
    async fn list_products(&self, page: PageRequest) -> Result<Vec<Product>, CatalogError> {
        let url = self.endpoint("/products", page.query_pairs())?;
        let products = self.get_list(url).await?;
        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    #[instrument(skip(self), fields(query = %query))]
    async fn search_products(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Product>, CatalogError> {
        let params = std::iter::once(("q", query.to_string())).chain(page.query_pairs());
        let url = self.endpoint("/products/search", params)?;
        let products = self.get_list(url).await?;
        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn filter_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Vec<Product>, CatalogError> {
        let params = filter.query_pairs().into_iter().chain(page.query_pairs());
        let url = self.endpoint("/products/filter", params)?;
        self.get_list(url).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product_detail(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        let cache_key = CacheKey::Detail(id);

        if let Some(CacheValue::Detail(detail)) = self.cached(&cache_key).await {
            debug!("Cache hit for product detail");
            return Ok(*detail);
        }

        let url = self.endpoint(&format!("/products/{id}"), std::iter::empty::<(&str, &str)>())?;
        let detail: ProductDetail = match self.execute(self.inner.client.get(url)).await {
            Err(CatalogError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                return Err(CatalogError::NotFound(format!("Product {id}")));
            }
            other => other?,
        };

        self.remember(cache_key, CacheValue::Detail(Box::new(detail.clone())))
            .await;

        Ok(detail)
    }

    #[instrument(skip(self), fields(query = %query))]
    async fn recommend(&self, query: &str, limit: u32) -> Result<Vec<Recommendation>, CatalogError> {
        let cache_key = CacheKey::Recommendations {
            query: query.to_string(),
            limit,
        };

        if let Some(CacheValue::Recommendations(recommendations)) = self.cached(&cache_key).await {
            debug!("Cache hit for recommendations");
            return Ok(recommendations);
        }

        let url = self.endpoint("/recommend", std::iter::empty::<(&str, &str)>())?;
        let request = self
            .inner
            .client
            .post(url)
            .json(&RecommendRequest { query, limit });
        let payload: ListPayload<Recommendation> = self.execute(request).await?;
        let recommendations = payload.into_vec();

        self.remember(
            cache_key,
            CacheValue::Recommendations(recommendations.clone()),
        )
        .await;

        Ok(recommendations)
    }
}
