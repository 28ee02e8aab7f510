//! Fashion Store CLI - Catalog browsing and cart session.
//!
//! # Usage
//!
//! ```bash
//! # List the first page of the catalog
//! fashion-cli products
//!
//! # Search the catalog
//! fashion-cli search "white shoe"
//!
//! # Show a product with its images and attributes
//! fashion-cli show 15970
//!
//! # Filter by attributes
//! fashion-cli filter --gender Women --colour White --max-price 80
//!
//! # Ask for recommendations
//! fashion-cli recommend "summer casual" --limit 5
//!
//! # Interactive session with a cart
//! fashion-cli browse
//! ```
//!
//! # Commands
//!
//! - `products` - List a catalog page
//! - `search` - Full-text search
//! - `show` - Product detail
//! - `filter` - Attribute-filtered listing
//! - `recommend` - Recommendations for a free-text query
//! - `browse` - Interactive session driving the client store

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use fashion_store_core::{Price, PriceError, ProductId};
use fashion_store_storefront::{ClientConfig, ProductFilter};
use rust_decimal::Decimal;

mod commands;
mod render;
mod telemetry;

#[derive(Parser)]
#[command(name = "fashion-cli")]
#[command(author, version, about = "Fashion Store catalog browser")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a page of the catalog
    Products {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Products per page (default: `FASHION_PAGE_SIZE`)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Search the catalog
    Search {
        /// Search text
        query: String,
    },
    /// Show a product detail
    Show {
        /// Product ID
        id: ProductId,
    },
    /// List products matching attribute filters
    Filter(FilterArgs),
    /// Recommend products for a free-text query
    Recommend {
        /// What you are looking for
        query: String,

        /// Number of recommendations (default: `FASHION_RECOMMEND_LIMIT`)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Interactive browsing session with a cart
    Browse,
}

#[derive(clap::Args)]
struct FilterArgs {
    #[arg(long)]
    gender: Option<String>,

    #[arg(long)]
    master_category: Option<String>,

    #[arg(long)]
    sub_category: Option<String>,

    #[arg(long)]
    article_type: Option<String>,

    /// Base colour
    #[arg(long)]
    colour: Option<String>,

    #[arg(long)]
    season: Option<String>,

    #[arg(long)]
    usage: Option<String>,

    #[arg(long)]
    min_price: Option<Decimal>,

    #[arg(long)]
    max_price: Option<Decimal>,
}

impl FilterArgs {
    fn into_filter(self) -> Result<ProductFilter, PriceError> {
        Ok(ProductFilter {
            gender: self.gender,
            master_category: self.master_category,
            sub_category: self.sub_category,
            article_type: self.article_type,
            base_colour: self.colour,
            season: self.season,
            usage: self.usage,
            min_price: self.min_price.map(Price::new).transpose()?,
            max_price: self.max_price.map(Price::new).transpose()?,
        })
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Sentry first so the tracing layer has a client to report to
    let _sentry_guard = telemetry::init_sentry();
    telemetry::init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;

    match cli.command {
        Commands::Products { page, limit } => {
            commands::catalog::products(&config, page, limit).await?;
        }
        Commands::Search { query } => commands::catalog::search(&config, &query).await?,
        Commands::Show { id } => commands::catalog::show(&config, id).await?,
        Commands::Filter(args) => {
            commands::catalog::filter(&config, &args.into_filter()?).await?;
        }
        Commands::Recommend { query, limit } => {
            commands::catalog::recommend(&config, &query, limit).await?;
        }
        Commands::Browse => commands::browse::run(&config).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_args_map_colour_and_prices() {
        let cli = Cli::try_parse_from([
            "fashion-cli",
            "filter",
            "--gender",
            "Women",
            "--colour",
            "White",
            "--max-price",
            "79.99",
        ])
        .unwrap();
        let Commands::Filter(args) = cli.command else {
            panic!("expected filter command");
        };

        let filter = args.into_filter().unwrap();
        assert_eq!(filter.gender.as_deref(), Some("Women"));
        assert_eq!(filter.base_colour.as_deref(), Some("White"));
        assert_eq!(filter.max_price.unwrap().amount(), Decimal::new(7999, 2));
        assert!(filter.min_price.is_none());
    }

    #[test]
    fn test_filter_rejects_negative_price() {
        let cli = Cli::try_parse_from(["fashion-cli", "filter", "--min-price=-5"]).unwrap();
        let Commands::Filter(args) = cli.command else {
            panic!("expected filter command");
        };
        assert!(args.into_filter().is_err());
    }

    #[test]
    fn test_show_parses_product_id() {
        let cli = Cli::try_parse_from(["fashion-cli", "show", "15970"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { id } if id == ProductId::new(15970)));
    }
}
