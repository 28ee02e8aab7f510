//! One-shot catalog commands.
//!
//! Each command issues a single API call and prints the result.

use fashion_store_core::ProductId;
use fashion_store_storefront::{CatalogApi, ClientConfig, PageRequest, ProductFilter};
use tracing::info;

use super::{client, emit};
use crate::render;

/// List one catalog page.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn products(
    config: &ClientConfig,
    page: u32,
    limit: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = PageRequest {
        page,
        limit: limit.unwrap_or(config.page_size),
    };
    let products = client(config).list_products(page).await?;
    emit(&render::product_list(&products));
    Ok(())
}

/// Search the catalog.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn search(config: &ClientConfig, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let products = client(config)
        .search_products(query, PageRequest::first(config.page_size))
        .await?;
    info!(query = %query, count = products.len(), "Search complete");
    emit(&render::product_list(&products));
    Ok(())
}

/// Show a product detail.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn show(config: &ClientConfig, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let detail = client(config).get_product_detail(id).await?;
    emit(&render::detail(&detail, &config.image_base_url));
    Ok(())
}

/// List products matching attribute filters.
///
/// # Errors
///
/// Returns an error if no filter is given or the request fails.
pub async fn filter(
    config: &ClientConfig,
    filter: &ProductFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    if filter.is_empty() {
        return Err("at least one filter is required".into());
    }
    let products = client(config)
        .filter_products(filter, PageRequest::first(config.page_size))
        .await?;
    emit(&render::product_list(&products));
    Ok(())
}

/// Recommend products for a free-text query.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn recommend(
    config: &ClientConfig,
    query: &str,
    limit: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let limit = limit.unwrap_or(config.recommend_limit);
    let recommendations = client(config).recommend(query, limit).await?;
    emit(&render::recommendations(&recommendations));
    Ok(())
}
