//! Integration tests for Fashion Store.
//!
//! The catalog backend is replaced by a `wiremock` server, so the tests
//! exercise the real HTTP client, payload decoding and fetch orchestration
//! without any external service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fashion-store-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_client` - Endpoint paths, parameters, payload shapes and caching
//! - `fetch_flow` - Store updates driven by fetches, failures and stale results

use std::time::Duration;

use fashion_store_storefront::{ClientConfig, HttpCatalogClient};
use serde_json::{Value, json};
use wiremock::MockServer;

/// A mock catalog backend and a client configuration pointing at it.
pub struct TestContext {
    pub server: MockServer,
    pub config: ClientConfig,
}

impl TestContext {
    /// Start a mock server. The API root is the server origin.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid base URL.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        #[allow(clippy::expect_used)]
        let config = ClientConfig::new(&server.uri()).expect("mock server URI is a valid base URL");
        Self { server, config }
    }

    /// Same as [`TestContext::new`] with the detail cache disabled.
    pub async fn without_cache() -> Self {
        let mut ctx = Self::new().await;
        ctx.config.cache_ttl = Duration::ZERO;
        ctx
    }

    #[must_use]
    pub fn client(&self) -> HttpCatalogClient {
        HttpCatalogClient::new(&self.config)
    }

    /// Wait until the server has seen at least `count` requests.
    ///
    /// # Panics
    ///
    /// Panics after two seconds without reaching `count`.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            let seen = self
                .server
                .received_requests()
                .await
                .map_or(0, |requests| requests.len());
            if seen >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("mock server did not receive {count} request(s)");
    }
}

/// Product record as the backend serializes it.
#[must_use]
pub fn product_json(id: i32, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "product_display_name": name,
        "price": price,
        "image": format!("{id}.jpg"),
    })
}
