//! Interactive browsing session.
//!
//! Reads one command per line from stdin and drives a [`Store`] through a
//! [`CatalogFetcher`]. Catalog output is always rendered from the store, so
//! failed fetches show the recorded error rather than a stale listing.
//!
//! # Commands
//!
//! - `search <text>` - Set the query and refresh the catalog
//! - `list` - Clear the query and refresh the catalog
//! - `add <id> [qty]` - Add a product to the cart (quantity at least 1, default 1)
//! - `remove <id>` - Remove a cart line
//! - `qty <id> <n>` - Set a line's quantity (0 removes it)
//! - `cart` - Show the cart
//! - `clear` - Empty the cart
//! - `show <id>` - Product detail
//! - `quit` - Leave the session

use fashion_store_core::{Product, ProductId};
use fashion_store_storefront::{CatalogApi, CatalogFetcher, ClientConfig, PageRequest, Store};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use super::{client, emit};
use crate::render;

const HELP: &str = "Commands: search <text> | list | add <id> [qty] | remove <id> | \
qty <id> <n> | cart | clear | show <id> | quit\n";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    List,
    Add { id: ProductId, quantity: u32 },
    Remove(ProductId),
    Quantity { id: ProductId, quantity: u32 },
    Cart,
    Clear,
    Show(ProductId),
    Help,
    Quit,
}

/// Errors from parsing a session line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

impl BrowseCommand {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for unknown commands or malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match word.to_ascii_lowercase().as_str() {
            // The query is kept as typed, inner spacing included
            "search" => Self::Search(rest.to_string()),
            "list" => Self::List,
            "add" => {
                let id = parse_id(args.next(), "add <id> [qty]")?;
                let quantity = args.next().map_or(Ok(1), parse_quantity)?;
                if quantity == 0 {
                    return Err(ParseError::ZeroQuantity);
                }
                Self::Add { id, quantity }
            }
            "remove" | "rm" => Self::Remove(parse_id(args.next(), "remove <id>")?),
            "qty" => {
                let id = parse_id(args.next(), "qty <id> <n>")?;
                let quantity = args.next().ok_or(ParseError::Usage("qty <id> <n>"))?;
                let quantity = parse_quantity(quantity)?;
                Self::Quantity { id, quantity }
            }
            "cart" => Self::Cart,
            "clear" => Self::Clear,
            "show" => Self::Show(parse_id(args.next(), "show <id>")?),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_id(arg: Option<&str>, usage: &'static str) -> Result<ProductId, ParseError> {
    let arg = arg.ok_or(ParseError::Usage(usage))?;
    arg.parse()
        .map_err(|_| ParseError::InvalidNumber(arg.to_string()))
}

fn parse_quantity(arg: &str) -> Result<u32, ParseError> {
    arg.parse()
        .map_err(|_| ParseError::InvalidNumber(arg.to_string()))
}

// =============================================================================
// Session
// =============================================================================

/// One browsing session: a store, a fetcher and the image origin for details.
pub struct Session<A> {
    fetcher: CatalogFetcher<A>,
    image_base: String,
}

impl<A: CatalogApi> Session<A> {
    #[must_use]
    pub fn new(api: A, page: PageRequest, recommend_limit: u32, image_base: &str) -> Self {
        Self {
            fetcher: CatalogFetcher::new(api, Store::new(), page, recommend_limit),
            image_base: image_base.to_string(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        self.fetcher.store()
    }

    /// Execute a command and return the text to show. `None` ends the session.
    pub async fn handle(&self, command: BrowseCommand) -> Option<String> {
        let store = self.fetcher.store();

        let output = match command {
            BrowseCommand::Search(query) => {
                self.fetcher.search(query).await;
                render::catalog(&store.snapshot())
            }
            BrowseCommand::List => {
                self.fetcher.search(String::new()).await;
                render::catalog(&store.snapshot())
            }
            BrowseCommand::Add { id, quantity } => match self.find_product(id).await {
                Some(product) => {
                    let name = product.display_name.clone();
                    store.add_to_cart(product, quantity);
                    format!(
                        "Added {quantity} x {name}. Cart: {} item(s)\n",
                        store.cart_item_count()
                    )
                }
                None => error_line(store),
            },
            BrowseCommand::Remove(id) => {
                store.remove_from_cart(id);
                render::cart(&store.snapshot())
            }
            BrowseCommand::Quantity { id, quantity } => {
                store.set_quantity(id, quantity);
                render::cart(&store.snapshot())
            }
            BrowseCommand::Cart => render::cart(&store.snapshot()),
            BrowseCommand::Clear => {
                store.clear_cart();
                render::cart(&store.snapshot())
            }
            BrowseCommand::Show(id) => match self.fetcher.load_detail(id).await {
                Ok(detail) => render::detail(&detail, &self.image_base),
                Err(_) => error_line(store),
            },
            BrowseCommand::Help => HELP.to_string(),
            BrowseCommand::Quit => return None,
        };

        Some(output)
    }

    /// Product from the current catalog, or from a detail fetch.
    async fn find_product(&self, id: ProductId) -> Option<Product> {
        let listed = self
            .fetcher
            .store()
            .read(|s| s.products.iter().find(|p| p.id == id).cloned());
        if listed.is_some() {
            return listed;
        }

        self.fetcher
            .load_detail(id)
            .await
            .ok()
            .map(|detail| detail.product)
    }
}

fn error_line(store: &Store) -> String {
    let message = store.error().unwrap_or_else(|| "Request failed".to_string());
    format!("Error: {message}\n")
}

/// Run an interactive session on stdin.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn run(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::new(
        client(config),
        PageRequest::first(config.page_size),
        config.recommend_limit,
        &config.image_base_url,
    );
    info!("Starting browse session");

    emit(HELP);
    if let Some(output) = session.handle(BrowseCommand::List).await {
        emit(&output);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match BrowseCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                emit(&format!("{e}\n"));
                continue;
            }
        };

        match session.handle(command).await {
            Some(output) => emit(&output),
            None => break,
        }
    }

    info!(
        cart_items = session.store().cart_item_count(),
        "Browse session ended"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use fashion_store_core::{Price, ProductDetail, Recommendation};
    use fashion_store_storefront::{CatalogError, ProductFilter};

    use super::*;

    fn product(id: i32, name: &str) -> Product {
        Product::new(ProductId::new(id), name, Price::from(12))
    }

    /// Catalog with a fixed product set; searches match on name.
    struct StubCatalog {
        products: HashMap<i32, Product>,
    }

    impl StubCatalog {
        fn new(products: Vec<Product>) -> Self {
            Self {
                products: products
                    .into_iter()
                    .map(|p| (p.id.as_i32(), p))
                    .collect(),
            }
        }

        fn sorted(&self) -> Vec<Product> {
            let mut products: Vec<_> = self.products.values().cloned().collect();
            products.sort_by_key(|p| p.id);
            products
        }
    }

    impl CatalogApi for StubCatalog {
        async fn list_products(&self, _page: PageRequest) -> Result<Vec<Product>, CatalogError> {
            Ok(self.sorted())
        }

        async fn search_products(
            &self,
            query: &str,
            _page: PageRequest,
        ) -> Result<Vec<Product>, CatalogError> {
            let needle = query.to_lowercase();
            Ok(self
                .sorted()
                .into_iter()
                .filter(|p| p.display_name.to_lowercase().contains(&needle))
                .collect())
        }

        async fn filter_products(
            &self,
            _filter: &ProductFilter,
            _page: PageRequest,
        ) -> Result<Vec<Product>, CatalogError> {
            Ok(Vec::new())
        }

        async fn get_product_detail(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
            self.products
                .get(&id.as_i32())
                .map(|product| ProductDetail {
                    product: product.clone(),
                    description: None,
                    images: Vec::new(),
                    attributes: Vec::new(),
                })
                .ok_or_else(|| CatalogError::NotFound(format!("Product {id}")))
        }

        async fn recommend(
            &self,
            _query: &str,
            _limit: u32,
        ) -> Result<Vec<Recommendation>, CatalogError> {
            Ok(Vec::new())
        }
    }

    fn session() -> Session<StubCatalog> {
        let api = StubCatalog::new(vec![
            product(1, "White Canvas Shoe"),
            product(2, "Denim Jacket"),
            product(3, "Running Shoe"),
        ]);
        Session::new(api, PageRequest::first(20), 10, "http://localhost:8000")
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            BrowseCommand::parse("search white  shoe").unwrap(),
            Some(BrowseCommand::Search("white  shoe".to_string()))
        );
        assert_eq!(
            BrowseCommand::parse("add 15970").unwrap(),
            Some(BrowseCommand::Add {
                id: ProductId::new(15970),
                quantity: 1
            })
        );
        assert_eq!(
            BrowseCommand::parse("ADD 3 4").unwrap(),
            Some(BrowseCommand::Add {
                id: ProductId::new(3),
                quantity: 4
            })
        );
        assert_eq!(
            BrowseCommand::parse("qty 3 0").unwrap(),
            Some(BrowseCommand::Quantity {
                id: ProductId::new(3),
                quantity: 0
            })
        );
        assert_eq!(BrowseCommand::parse("  ").unwrap(), None);
        assert_eq!(BrowseCommand::parse("quit").unwrap(), Some(BrowseCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            BrowseCommand::parse("dance").unwrap_err(),
            ParseError::Unknown("dance".to_string())
        );
        assert_eq!(
            BrowseCommand::parse("remove").unwrap_err(),
            ParseError::Usage("remove <id>")
        );
        assert_eq!(
            BrowseCommand::parse("add x").unwrap_err(),
            ParseError::InvalidNumber("x".to_string())
        );
        assert_eq!(
            BrowseCommand::parse("qty 1").unwrap_err(),
            ParseError::Usage("qty <id> <n>")
        );
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        assert_eq!(
            BrowseCommand::parse("add 3 0").unwrap_err(),
            ParseError::ZeroQuantity
        );
        assert_eq!(
            ParseError::ZeroQuantity.to_string(),
            "quantity must be at least 1"
        );
        // Setting a line to zero still removes it
        assert!(BrowseCommand::parse("qty 3 0").is_ok());
    }

    #[test]
    fn test_empty_search_is_a_list() {
        assert_eq!(
            BrowseCommand::parse("search").unwrap(),
            Some(BrowseCommand::Search(String::new()))
        );
    }

    #[tokio::test]
    async fn test_search_renders_from_store() {
        let session = session();
        let output = session
            .handle(BrowseCommand::Search("shoe".to_string()))
            .await
            .unwrap();

        assert_eq!(session.store().query(), "shoe");
        assert_eq!(session.store().products().len(), 2);
        assert!(output.contains("White Canvas Shoe"));
        assert!(!output.contains("Denim Jacket"));
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let session = session();
        session.handle(BrowseCommand::List).await.unwrap();

        let added = session
            .handle(BrowseCommand::Add {
                id: ProductId::new(2),
                quantity: 2,
            })
            .await
            .unwrap();
        assert_eq!(added, "Added 2 x Denim Jacket. Cart: 2 item(s)\n");

        session
            .handle(BrowseCommand::Add {
                id: ProductId::new(2),
                quantity: 1,
            })
            .await;
        let cart = session.handle(BrowseCommand::Cart).await.unwrap();
        assert!(cart.ends_with("3 item(s), subtotal $36.00\n"));

        let cart = session
            .handle(BrowseCommand::Remove(ProductId::new(2)))
            .await
            .unwrap();
        assert_eq!(cart, "Cart is empty.\n");
    }

    #[tokio::test]
    async fn test_add_unlisted_product_uses_detail() {
        let session = session();
        session
            .handle(BrowseCommand::Search("jacket".to_string()))
            .await;

        session
            .handle(BrowseCommand::Add {
                id: ProductId::new(3),
                quantity: 1,
            })
            .await;

        let cart = session.store().cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].product.display_name, "Running Shoe");
    }

    #[tokio::test]
    async fn test_add_unknown_product_reports_error() {
        let session = session();
        let output = session
            .handle(BrowseCommand::Add {
                id: ProductId::new(99),
                quantity: 1,
            })
            .await
            .unwrap();

        assert_eq!(output, "Error: Product 99 not found\n");
        assert!(session.store().cart().is_empty());
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        assert!(session().handle(BrowseCommand::Quit).await.is_none());
    }
}
