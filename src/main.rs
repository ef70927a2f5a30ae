//! CLI entry point: import a registrant CSV into the local user store.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rollcall::config::{DEFAULT_BATCH_SIZE, DEFAULT_HASH_COST};
use rollcall::{bulk_upload_file, AppError, BulkUploadResponse, Database, IngestConfig};

/// Bulk registrant CSV import with idempotent batched inserts.
#[derive(Debug, Parser)]
#[command(name = "rollcall", version, about)]
struct Cli {
    /// Path to the registrant CSV file
    csv: PathBuf,

    /// Path to the SQLite user store
    #[arg(long, default_value = "rollcall.db")]
    db: PathBuf,

    /// Default credential assigned to every newly imported user
    #[arg(long, default_value = "Student@123")]
    default_password: String,

    /// Records per batch transaction
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// bcrypt cost factor for the shared password hash
    #[arg(long, default_value_t = DEFAULT_HASH_COST)]
    hash_cost: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(response) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&response).expect("response serializes")
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!(
                "{}",
                serde_json::to_string(&err).expect("error serializes")
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<BulkUploadResponse, AppError> {
    let db = Database::init(cli.db).await?;
    let config = IngestConfig::default()
        .batch_size(cli.batch_size)
        .hash_cost(cli.hash_cost);

    bulk_upload_file(&db, config, &cli.csv, &cli.default_password).await
}
