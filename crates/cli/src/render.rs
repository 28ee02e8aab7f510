//! Plain-text rendering of store state and catalog records.

use std::fmt::Write as _;

use fashion_store_core::{Product, ProductDetail, Recommendation, image_url};
use fashion_store_storefront::StoreState;

/// One line per product: id, name, price.
pub fn product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }

    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "{:>7}  {:<48}  {:>10}",
            product.id,
            product.display_name,
            price_label(product)
        );
    }
    out
}

fn price_label(product: &Product) -> String {
    product
        .price
        .map_or_else(|| "n/a".to_string(), |price| price.to_string())
}

/// Catalog region of the browse view: error replaces the list.
pub fn catalog(state: &StoreState) -> String {
    if state.loading {
        return "Loading...\n".to_string();
    }
    if let Some(error) = &state.error {
        return format!("Error: {error}\n");
    }
    product_list(&state.products)
}

pub fn cart(state: &StoreState) -> String {
    if state.cart.is_empty() {
        return "Cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for item in &state.cart {
        let line_total = item
            .line_total()
            .map_or_else(|| "-".to_string(), |total| total.to_string());
        let _ = writeln!(
            out,
            "{:>7}  {:<40} x{:<4}  {:>10}",
            item.product.id, item.product.display_name, item.quantity, line_total
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), subtotal {}",
        state.cart_item_count(),
        state.cart_subtotal()
    );
    out
}

pub fn detail(detail: &ProductDetail, image_base: &str) -> String {
    let product = &detail.product;
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.display_name, product.id);
    let _ = writeln!(out, "Price: {}", price_label(product));
    let _ = writeln!(out, "Image: {}", image_url(image_base, product));
    if let Some(description) = detail.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "\n{description}");
    }
    if !detail.attributes.is_empty() {
        out.push('\n');
        for attribute in &detail.attributes {
            let _ = writeln!(
                out,
                "  {}: {}",
                attribute.attribute_key, attribute.attribute_value
            );
        }
    }
    out
}

pub fn recommendations(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return "No recommendations.\n".to_string();
    }

    let mut out = String::new();
    for rec in recommendations {
        let _ = writeln!(
            out,
            "{:>7}  {:>5.2}  {}",
            rec.product_id, rec.match_score, rec.reason
        );
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fashion_store_core::{CartItem, Price, ProductAttribute, ProductId};

    use super::*;

    fn product(id: i32, name: &str, price: u32) -> Product {
        Product::new(ProductId::new(id), name, Price::from(price))
    }

    #[test]
    fn test_catalog_shows_error_instead_of_products() {
        let state = StoreState {
            products: vec![product(1, "Tee", 10)],
            error: Some("timeout".to_string()),
            ..StoreState::default()
        };
        assert_eq!(catalog(&state), "Error: timeout\n");
    }

    #[test]
    fn test_catalog_lists_products() {
        let state = StoreState {
            products: vec![product(1, "Tee", 10), product(2, "Cap", 5)],
            ..StoreState::default()
        };
        let out = catalog(&state);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("Tee"));
        assert!(out.contains("$5.00"));
    }

    #[test]
    fn test_unpriced_product_is_listed() {
        let out = product_list(&[Product::unpriced(ProductId::new(4), "Scarf")]);
        assert!(out.contains("Scarf"));
        assert!(out.trim_end().ends_with("n/a"));
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(catalog(&StoreState::default()), "No products found.\n");
    }

    #[test]
    fn test_cart_totals() {
        let state = StoreState {
            cart: vec![
                CartItem::new(product(1, "Tee", 10), 2),
                CartItem::new(product(2, "Cap", 5), 1),
            ],
            ..StoreState::default()
        };
        let out = cart(&state);
        assert!(out.contains("x2"));
        assert!(out.ends_with("3 item(s), subtotal $25.00\n"));
    }

    #[test]
    fn test_detail_uses_canonical_image_url() {
        let detail = ProductDetail {
            product: product(15970, "Navy Shirt", 30),
            description: Some("Cotton shirt".to_string()),
            images: vec![],
            attributes: vec![ProductAttribute {
                attribute_key: "fit".to_string(),
                attribute_value: "slim".to_string(),
            }],
        };
        let out = super::detail(&detail, "http://localhost:8000");
        assert!(out.contains("Image: http://localhost:8000/images/15970.jpg"));
        assert!(out.contains("fit: slim"));
    }
}
