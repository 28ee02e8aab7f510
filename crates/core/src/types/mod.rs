//! Core types for Fashion Store.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod image;
pub mod price;
pub mod product;

pub use cart::CartItem;
pub use id::*;
pub use image::image_url;
pub use price::{Price, PriceError};
pub use product::{Product, ProductAttribute, ProductDetail, ProductImage, Recommendation};
