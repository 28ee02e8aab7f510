//! Canonical product image URL rule.
//!
//! The backend serves images from `/images` at its root, next to (not
//! under) the `/api/v1` prefix. Every view resolves a product image the
//! same way: `{image_base}/images/{file}`, where `file` is the product's
//! image reference when it has one and `{id}.jpg` otherwise.

use super::product::Product;

/// Build the image URL for a product.
///
/// `image_base` is the origin that serves `/images`; a trailing slash is
/// ignored.
///
/// ```
/// use fashion_store_core::{Price, Product, ProductId, image_url};
///
/// let product = Product::new(ProductId::new(15970), "Shirt", Price::ZERO);
/// assert_eq!(
///     image_url("http://localhost:8000/", &product),
///     "http://localhost:8000/images/15970.jpg"
/// );
/// ```
#[must_use]
pub fn image_url(image_base: &str, product: &Product) -> String {
    let base = image_base.trim_end_matches('/');
    match product
        .image
        .as_deref()
        .map(|file| file.trim_start_matches('/'))
        .filter(|file| !file.is_empty())
    {
        Some(file) => format!("{base}/images/{file}"),
        None => format!("{base}/images/{}.jpg", product.id),
    }
}
