//! End-to-end fetch orchestration against a mock backend.
//!
//! These tests drive a [`Store`] through a [`CatalogFetcher`] backed by the
//! real HTTP client and check what observers of the store see.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use fashion_store_core::ProductId;
use fashion_store_integration_tests::{TestContext, product_json};
use fashion_store_storefront::{CatalogFetcher, HttpCatalogClient, PageRequest, Store};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn fetcher(ctx: &TestContext) -> CatalogFetcher<HttpCatalogClient> {
    CatalogFetcher::new(
        ctx.client(),
        Store::new(),
        PageRequest::first(ctx.config.page_size),
        ctx.config.recommend_limit,
    )
}

#[tokio::test]
async fn test_search_success_replaces_catalog() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "shoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(5, "Running Shoe", 70.0),
        ])))
        .mount(&ctx.server)
        .await;

    let fetcher = fetcher(&ctx);
    fetcher.search("shoe").await;

    let state = fetcher.store().snapshot();
    let ids: Vec<i32> = state.products.iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, vec![5]);
    assert_eq!(state.query, "shoe");
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_empty_query_uses_listing() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [product_json(1, "Tee", 10.0), product_json(2, "Cap", 8.0)],
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let fetcher = fetcher(&ctx);
    fetcher.refresh().await;

    assert_eq!(fetcher.store().products().len(), 2);
}

#[tokio::test]
async fn test_rejected_fetch_records_error_and_keeps_catalog() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(1, "Tee", 10.0),
        ])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(504).set_body_json(json!({"detail": "timeout"})))
        .mount(&ctx.server)
        .await;

    let fetcher = fetcher(&ctx);
    fetcher.refresh().await;
    let before = fetcher.store().products();

    fetcher.search("anything").await;

    let state = fetcher.store().snapshot();
    assert_eq!(state.error.as_deref(), Some("timeout"));
    assert!(!state.loading);
    assert_eq!(state.products, before);
}

#[tokio::test]
async fn test_unreachable_backend_records_error() {
    let ctx = TestContext::new().await;
    let mut config = ctx.config.clone();
    // Nothing listens on the discard port
    config.api_base_url = "http://127.0.0.1:9".to_string();

    let fetcher = CatalogFetcher::new(
        HttpCatalogClient::new(&config),
        Store::new(),
        PageRequest::first(20),
        10,
    );
    fetcher.refresh().await;

    let state = fetcher.store().snapshot();
    assert!(state.error.is_some());
    assert!(!state.loading);
    assert!(state.products.is_empty());
}

#[tokio::test]
async fn test_next_fetch_clears_previous_error() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&ctx.server)
        .await;

    let fetcher = fetcher(&ctx);
    fetcher.search("broken").await;
    assert_eq!(
        fetcher.store().error().as_deref(),
        Some("Request failed (500 Internal Server Error)")
    );

    fetcher.search("").await;
    assert!(fetcher.store().error().is_none());
    assert!(fetcher.store().products().is_empty());
}

#[tokio::test]
async fn test_stale_search_is_dropped() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "old"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([product_json(1, "Old Result", 10.0)]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([product_json(2, "New Result", 10.0)])),
        )
        .mount(&ctx.server)
        .await;

    let fetcher = fetcher(&ctx);

    let slow = {
        let fetcher = fetcher.clone();
        tokio::spawn(async move { fetcher.search("old").await })
    };
    ctx.wait_for_requests(1).await;

    fetcher.search("new").await;
    slow.await.unwrap();

    let state = fetcher.store().snapshot();
    let ids: Vec<i32> = state.products.iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(state.query, "new");
    assert!(!state.loading);
}

#[tokio::test]
async fn test_bound_query_refetches_on_change() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(1, "Tee", 10.0),
            product_json(2, "Cap", 8.0),
        ])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "cap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(2, "Cap", 8.0),
        ])))
        .mount(&ctx.server)
        .await;

    let fetcher = fetcher(&ctx);
    let store = fetcher.store().clone();
    let mut rx = store.subscribe();
    let binding = fetcher.bind_query();

    tokio::time::timeout(
        Duration::from_secs(2),
        rx.wait_for(|s| s.products.len() == 2 && !s.loading),
    )
    .await
    .unwrap()
    .unwrap();

    store.set_query("cap");

    tokio::time::timeout(
        Duration::from_secs(2),
        rx.wait_for(|s| s.products.len() == 1 && !s.loading),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(store.products()[0].id, ProductId::new(2));
    binding.abort();
}

#[tokio::test]
async fn test_load_detail_keeps_catalog() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json(1, "Tee", 10.0),
        ])))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;

    let fetcher = fetcher(&ctx);
    fetcher.refresh().await;

    assert!(fetcher.load_detail(ProductId::new(42)).await.is_err());

    let state = fetcher.store().snapshot();
    assert_eq!(state.products.len(), 1);
    assert_eq!(state.error.as_deref(), Some("Product 42 not found"));
    assert!(!state.loading);
}
