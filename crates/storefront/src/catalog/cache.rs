//! Cache types for catalog API responses.

use fashion_store_core::{ProductDetail, ProductId, Recommendation};

/// Cache key for product details and recommendations.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Detail(ProductId),
    Recommendations { query: String, limit: u32 },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Detail(Box<ProductDetail>),
    Recommendations(Vec<Recommendation>),
}
