mod compare;
mod deals;
mod render;
mod session;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::session::Session;

#[derive(Debug, Parser)]
#[command(name = "vinyldeals")]
#[command(about = "Find discounted vinyl across record stores")]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List configured stores and rejected site profiles
    Shops,
    /// Show every discounted listing of one store
    Deals {
        /// Store name as configured in the site profiles
        #[arg(long)]
        shop: String,
    },
    /// Show a store's listings that appear in the reference album list
    Recommend {
        #[arg(long)]
        shop: String,
    },
    /// Compare prices of recommended albums in other stores
    Compare {
        /// Store the recommendations come from
        #[arg(long)]
        shop: String,
        /// Recommendation IDs, comma-separated (e.g. "0, 1, 5")
        #[arg(long)]
        ids: String,
        /// Store to compare against; repeatable, defaults to every other store
        #[arg(long)]
        against: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = vinyl_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("vinyldeals: run with --help to list commands");
        return Ok(());
    };

    tracing::debug!(env = %config.env, sites = %config.sites_path.display(), "starting");
    let session = Session::load(config)?;

    match command {
        Commands::Shops => deals::run_shops(&session, cli.json),
        Commands::Deals { shop } => deals::run_deals(&session, &shop, cli.json).await,
        Commands::Recommend { shop } => deals::run_recommend(&session, &shop, cli.json).await,
        Commands::Compare { shop, ids, against } => {
            compare::run_compare(&session, &shop, &ids, &against, cli.json).await
        }
    }
}
