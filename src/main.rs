use anyhow::Result;
use clap::{Parser, Subcommand};
use job_portal::fixtures::FixtureLoader;
use job_portal::{start_web_server, ConfigManager, DatabaseConfig};
use std::path::PathBuf;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobdeck", about = "Job portal backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server
    Serve,
    /// Load reference-data CSV fixtures into the database
    Seed {
        /// Fixture directory; defaults to the configured path
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("job_portal=info,jobdeck=info,rocket=warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = ConfigManager::load()?;
    config.ensure_directories().await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Environment: {}", std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string()));
            info!("Database: {}", config.environment.database_path.display());
            info!("Home country: {}", config.search.home_country);
            start_web_server(config).await
        }
        Command::Seed { fixtures } => {
            let dir = fixtures.unwrap_or_else(|| config.environment.fixtures_path.clone());
            info!("Seeding reference data from {}", dir.display());

            let mut db_config = DatabaseConfig::new(config.environment.database_path.clone());
            db_config.init_pool().await?;
            db_config.migrate().await?;

            FixtureLoader::new(db_config.pool()?, dir).load_all().await
        }
    }
}
