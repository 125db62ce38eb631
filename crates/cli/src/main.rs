//! Balance Guru CLI - browse the catalog and run simulated checkouts.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, optionally filtered
//! bg-cli catalog
//! bg-cli catalog --category apparel
//! bg-cli catalog --featured --json
//!
//! # Show a product with its related products
//! bg-cli product guru-training-tee
//!
//! # Run a checkout end to end
//! bg-cli checkout -i pro-balance-board -i guru-training-tee:2:M:Black \
//!     --email jordan@example.com
//!
//! # Send the contact form
//! bg-cli contact -n "Jordan Lee" -e jordan@example.com -s Hello -m "Great boards"
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products
//! - `product` - Show one product
//! - `checkout` - Fill a cart and pay with the simulated gateway
//! - `contact` - Submit the simulated contact form
//!
//! Configuration comes from `STOREFRONT_*` environment variables and `.env`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balance_guru_storefront::StorefrontConfig;

mod commands;

use commands::checkout::{CheckoutArgs, LineArg};

#[derive(Parser)]
#[command(name = "bg-cli")]
#[command(author, version, about = "Balance Guru storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only featured products
        #[arg(short, long)]
        featured: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a product and related products
    Product {
        /// Product ID
        id: String,
    },
    /// Run a simulated checkout
    Checkout {
        /// Cart line as `id[:quantity[:size[:color]]]`; repeatable
        #[arg(short, long = "item", required = true)]
        items: Vec<LineArg>,

        /// Shipping email address
        #[arg(short, long)]
        email: String,

        /// Shipping first name
        #[arg(long, default_value = "Jordan")]
        first_name: String,

        /// Shipping last name
        #[arg(long, default_value = "Lee")]
        last_name: String,

        /// Leave checkout this many milliseconds into the payment
        #[arg(long)]
        leave_after_ms: Option<u64>,
    },
    /// Submit the contact form
    Contact {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        subject: String,

        #[arg(short, long)]
        message: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Warnings and errors become Sentry events; info and debug become
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "balance_guru_storefront=info,bg_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog {
            category,
            featured,
            json,
        } => commands::catalog::list(config, category.as_deref(), featured, json)?,
        Commands::Product { id } => commands::catalog::show(config, &id)?,
        Commands::Checkout {
            items,
            email,
            first_name,
            last_name,
            leave_after_ms,
        } => {
            let args = CheckoutArgs {
                items,
                email,
                first_name,
                last_name,
                leave_after_ms,
            };
            commands::checkout::run(config, args).await?;
        }
        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => commands::contact::send(config, name, email, subject, message).await?,
    }
    Ok(())
}
