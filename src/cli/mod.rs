use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod caches;
pub mod push;
pub mod register;
pub mod seed;
pub mod serve;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Run the worker host and serve the app shell through it
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Install and activate the worker, purging stale caches
    Register {},
    /// List cache bucket names
    Caches {
        /// Show the entries stored in each bucket
        #[arg(long, action, default_value = "false")]
        entries: bool,
    },
    /// Store a response in a cache bucket
    Seed {
        /// Request url (path or absolute) the response is stored under
        #[arg(long)]
        url: String,
        /// File containing the response body
        #[arg(long)]
        file: String,
        /// Bucket to store into, defaults to the current cache name
        #[arg(long)]
        cache: Option<String>,
        #[arg(long, default_value = "200")]
        status: u16,
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Deliver a push message to the worker and print the notification
    Push {
        /// JSON payload, e.g. '{"title":"Standup","body":"In 5 minutes"}'
        #[arg(long)]
        payload: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub(crate) fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Register {}) => {
            register::run(&config).await?;
        }
        Some(Command::Caches { entries }) => {
            caches::run(entries, &config).await?;
        }
        Some(Command::Seed {
            url,
            file,
            cache,
            status,
            content_type,
        }) => {
            seed::run(&url, &file, cache, status, content_type, &config).await?;
        }
        Some(Command::Push { payload }) => {
            push::run(payload, &config).await?;
        }
        None => {}
    }

    Ok(())
}
