//! Petcare CLI - Order sync and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Merge the local cache with the backend's orders for a user
//! petcare sync --email owner@example.com
//!
//! # Show cached orders, newest first, only shipped ones
//! petcare list --status shipped --sort date-desc
//!
//! # Record an adoption request
//! petcare place --product "Adopt: Biscuit" --buyer "Ana" --email ana@example.com
//!
//! # Local edits
//! petcare status order-real-1717228800000-k2j9x0a1b delivered
//! petcare delete order-real-1717228800000-k2j9x0a1b
//! petcare clear
//! ```
//!
//! # Commands
//!
//! - `sync` - Reconcile cached orders with the backend
//! - `list` - Filter and sort cached orders
//! - `place` - Record a new order locally
//! - `delete` / `clear` - Remove cached orders
//! - `status` - Change an order's status locally
//! - `summary` - Dashboard totals

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use petcare_core::{Email, OrderId, OrderStatus, OrderType, SortKey};
use petcare_orders::SyncConfig;
use petcare_orders::config::parse_api_url;
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "petcare")]
#[command(author, version, about = "Petcare order tools")]
struct Cli {
    /// Backend API root (overrides `PETCARE_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for the local order cache (overrides `PETCARE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile cached orders with the backend
    Sync {
        /// Whose orders to fetch (overrides `PETCARE_USER_EMAIL`)
        #[arg(short, long)]
        email: Option<Email>,
    },
    /// List cached orders
    List {
        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,

        /// Only adoptions or purchases (`adoption`, `purchase`)
        #[arg(long = "type")]
        order_type: Option<OrderType>,

        /// Case-insensitive text match on id, product, buyer or email
        #[arg(long)]
        search: Option<String>,

        /// `date-asc`, `date-desc`, `price-asc` or `price-desc`
        #[arg(long, default_value = "date-desc")]
        sort: SortKey,
    },
    /// Record a new order locally
    Place {
        /// Product or pet name
        #[arg(short, long)]
        product: String,

        /// Buyer display name
        #[arg(short, long)]
        buyer: String,

        /// Buyer email
        #[arg(short, long)]
        email: Email,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,

        /// Unit price; 0 records a free adoption
        #[arg(long, default_value = "0")]
        price: Decimal,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Delete cached orders by id
    Delete {
        #[arg(required = true)]
        ids: Vec<OrderId>,
    },
    /// Delete every cached order
    Clear,
    /// Change an order's status locally
    Status {
        id: OrderId,
        status: OrderStatus,
    },
    /// Show order counts and revenue
    Summary,
}

/// Human-readable logs locally, JSON when `PETCARE_LOG_JSON` is set.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "petcare_cli=info,petcare_orders=info".into());

    let json = std::env::var("PETCARE_LOG_JSON").is_ok();
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), petcare_orders::Error> {
    let mut config = SyncConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = parse_api_url(&url)?;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let mut reconciler = petcare_orders::open(&config)?;

    match cli.command {
        Commands::Sync { email } => {
            let email = email.or_else(|| config.user_email.clone());
            commands::sync::run(&mut reconciler, email.as_ref()).await;
        }
        Commands::List {
            status,
            order_type,
            search,
            sort,
        } => commands::orders::list(
            reconciler.book(),
            &petcare_core::OrderQuery {
                status,
                order_type,
                search,
                sort: Some(sort),
            },
        ),
        Commands::Place {
            product,
            buyer,
            email,
            phone,
            address,
            price,
            quantity,
        } => {
            let price = petcare_core::Price::new(price).ok_or_else(|| {
                petcare_orders::Error::BadRequest("price cannot be negative".to_string())
            })?;
            commands::orders::place(
                reconciler.book_mut(),
                petcare_core::NewOrder {
                    product_name: product,
                    buyer_name: buyer,
                    email: email.into_inner(),
                    phone,
                    address,
                    price,
                    quantity,
                },
            )?;
        }
        Commands::Delete { ids } => commands::orders::delete(reconciler.book_mut(), &ids)?,
        Commands::Clear => commands::orders::clear(reconciler.book_mut())?,
        Commands::Status { id, status } => {
            commands::orders::set_status(reconciler.book_mut(), &id, status)?;
        }
        Commands::Summary => commands::orders::summary(reconciler.book()),
    }
    Ok(())
}
