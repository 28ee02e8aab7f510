//! Product records as returned by the catalog API.
//!
//! These types provide a clean, ergonomic API over the backend's wire
//! format. The backend has historically exposed the display name as both
//! `product_display_name` and `name`, and the image reference as both
//! `image` and `image_url`; both spellings deserialize into the same field.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// Immutable once fetched; the catalog is replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable product ID.
    pub id: ProductId,
    /// Human-readable product name.
    #[serde(rename = "product_display_name", alias = "name", default)]
    pub display_name: String,
    /// Unit price. `None` when the backend has no price for the product;
    /// such products are listed but do not count toward cart totals.
    #[serde(default)]
    pub price: Option<Price>,
    /// Image file name, relative to the image root.
    #[serde(alias = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Create a priced product without an image reference.
    #[must_use]
    pub fn new(id: ProductId, display_name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            price: Some(price),
            image: None,
        }
    }

    /// Create a product the backend has no price for.
    #[must_use]
    pub fn unpriced(id: ProductId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            price: None,
            image: None,
        }
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

// =============================================================================
// Product Detail
// =============================================================================

/// Product image metadata from the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image role, e.g. `front`, `back`, `search`.
    pub image_type: String,
    /// Image location as stored by the backend.
    pub image_url: String,
    /// Whether this is the product's main image.
    #[serde(default)]
    pub is_primary: bool,
    /// Sort position among the product's images.
    #[serde(default)]
    pub display_order: i32,
}

/// Free-form key/value attribute attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub attribute_key: String,
    pub attribute_value: String,
}

/// Full product record returned by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Additional images.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Extra attributes (material, fit, ...).
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
}

impl ProductDetail {
    /// The image flagged as primary, else the one with the lowest display order.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.iter().min_by_key(|img| img.display_order))
    }
}

// =============================================================================
// Recommendation
// =============================================================================

/// A product suggested by the recommendation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: ProductId,
    /// Relevance score, higher is better.
    #[serde(rename = "matchScore", alias = "match_score")]
    pub match_score: f64,
    /// Why the product was suggested.
    #[serde(default)]
    pub reason: String,
}
