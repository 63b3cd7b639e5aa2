//! Shopmate CLI - chat front end for the product assistant.
//!
//! # Usage
//!
//! ```bash
//! # Ask an anonymous question
//! shopmate ask "What products do you have?"
//!
//! # Ask with order history available
//! shopmate ask "Where is my order?" --user-id u-1 --token <bearer>
//!
//! # Generate a product description
//! shopmate describe 64f1c0ffee
//!
//! # Check the status of an order
//! shopmate order-status o-1 --token <bearer>
//! ```
//!
//! The CLI dispatches each command to the assistant pipeline and prints the
//! plain response value; no pipeline logic lives here.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopmate_assistant::gateway::GatewayError;
use shopmate_assistant::{Assistant, AssistantConfig, ConfigError, UserContext};
use shopmate_core::{OrderId, ProductId, UserId};

#[derive(Parser)]
#[command(name = "shopmate")]
#[command(author, version, about = "Shopmate assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the assistant a free-text question about products
    Ask {
        /// The question to ask
        query: String,

        /// Backend user ID; enables order-history answers
        #[arg(long, requires = "token")]
        user_id: Option<String>,

        /// Bearer credential for the backend order endpoints
        #[arg(long, requires = "user_id")]
        token: Option<String>,
    },
    /// Generate a marketing description for a catalog product
    Describe {
        /// The product ID
        product_id: String,
    },
    /// Look up the status of an order
    OrderStatus {
        /// The order ID
        order_id: String,

        /// Bearer credential for the backend order endpoints
        #[arg(long)]
        token: String,
    },
}

/// Errors that terminate the CLI with a nonzero exit code.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The backend HTTP client could not be built.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The requested product does not exist or could not be fetched.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// The requested order does not exist or could not be fetched.
    #[error("order not found: {0}")]
    OrderNotFound(String),
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shopmate=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AssistantConfig::from_env()?;
    let assistant = Assistant::from_config(&config)?;

    match cli.command {
        Commands::Ask {
            query,
            user_id,
            token,
        } => {
            let user = user_id.zip(token).map(|(id, token)| UserContext {
                id: UserId::new(id),
                token: SecretString::from(token),
            });

            let reply = assistant.ask_about_products(&query, user.as_ref()).await;
            println!("{reply}");
        }
        Commands::Describe { product_id } => {
            let description = assistant
                .describe_product(&ProductId::new(product_id.clone()))
                .await
                .ok_or(CliError::ProductNotFound(product_id))?;
            println!("{description}");
        }
        Commands::OrderStatus { order_id, token } => {
            let order = assistant
                .order_status(&OrderId::new(order_id.clone()), &SecretString::from(token))
                .await
                .ok_or(CliError::OrderNotFound(order_id))?;
            println!(
                "Order {} is {} (placed {}, total ${})",
                order.id,
                order.status,
                order.created_at.format("%Y-%m-%d"),
                order.amount
            );
        }
    }

    Ok(())
}
