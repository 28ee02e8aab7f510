//! CLI command implementations.

pub mod browse;
pub mod catalog;

use fashion_store_storefront::{ClientConfig, HttpCatalogClient};

/// Write rendered output to stdout.
#[allow(clippy::print_stdout)]
fn emit(text: &str) {
    print!("{text}");
}

fn client(config: &ClientConfig) -> HttpCatalogClient {
    tracing::debug!(base_url = %config.api_base_url, "Using catalog API");
    HttpCatalogClient::new(config)
}
