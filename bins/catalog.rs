//! Catalog CLI - inspect and edit the product document without the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # List the first two products
//! catalog --file data/products.json list --limit 2
//!
//! # Add a product
//! catalog add --title T-shirt --description "White cotton t-shirt" \
//!     --price 150 --thumbnail img1.jpg --code A01 --stock 200
//!
//! # Change only the price
//! catalog update 1 --price 500
//!
//! # Run the sample scenario against a fresh document
//! catalog --file /tmp/demo.json demo
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use models::{NewProduct, ProductPatch};
use service::{catalog::ProductStore, pagination::Limit};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(version, about = "Product catalog maintenance tool")]
struct Cli {
    /// Backing JSON document; defaults to the configured catalog file
    #[arg(short, long, global = true)]
    file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print all products in stored order
    List {
        /// Keep only the first N products
        #[arg(short, long)]
        limit: Option<String>,
    },
    /// Print one product
    Get { id: u64 },
    /// Create a product
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        thumbnail: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        stock: u32,
    },
    /// Change selected fields of a product
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        thumbnail: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        stock: Option<u32>,
    },
    /// Remove a product
    Delete { id: u64 },
    /// Insert two sample products, list them and look up ids 1 and 999
    Demo,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_stderr();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("command failed: {e:#}");
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file = match cli.file {
        Some(file) => file,
        None => configs::AppConfig::load_or_env()?.catalog.data_file,
    };
    let store = ProductStore::open(&file).await?;

    match cli.command {
        Commands::List { limit } => {
            let products = Limit::parse(limit.as_deref()).apply(store.list_all().await?);
            print_json(&products)?;
        }
        Commands::Get { id } => match store.get_by_id(id).await? {
            Some(product) => print_json(&product)?,
            None => anyhow::bail!("product {id} not found"),
        },
        Commands::Add { title, description, price, thumbnail, code, stock } => {
            let product = store
                .create(NewProduct { title, description, price, thumbnail, code, stock })
                .await?;
            print_json(&product)?;
        }
        Commands::Update { id, title, description, price, thumbnail, code, stock } => {
            let patch = ProductPatch { title, description, price, thumbnail, code, stock };
            if patch.is_empty() {
                warn!(id, "no fields supplied, product left unchanged");
            }
            let product = store.update(id, patch).await?;
            print_json(&product)?;
        }
        Commands::Delete { id } => {
            if store.delete(id).await? {
                info!(id, "product deleted");
            } else {
                anyhow::bail!("nothing to delete: product {id} not found");
            }
        }
        Commands::Demo => demo(store).await?,
    }
    Ok(())
}

async fn demo(store: Arc<ProductStore>) -> anyhow::Result<()> {
    store
        .create(NewProduct {
            title: "T-shirt".into(),
            description: "White cotton t-shirt".into(),
            price: 150.0,
            thumbnail: "img1.jpg".into(),
            code: "A01".into(),
            stock: 200,
        })
        .await?;
    store
        .create(NewProduct {
            title: "Pants".into(),
            description: "Blue jeans".into(),
            price: 200.0,
            thumbnail: "img2.jpg".into(),
            code: "A002".into(),
            stock: 140,
        })
        .await?;

    print_json(&store.list_all().await?)?;

    for id in [1, 999] {
        match store.get_by_id(id).await? {
            Some(product) => print_json(&product)?,
            None => warn!(id, "Producto no encontrado"),
        }
    }
    Ok(())
}
