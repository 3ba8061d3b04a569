use anyhow::Result;
use clap::Parser;
use uuid::Uuid;

use kisan_cli::render_report;
use kisan_core::models::UserContext;
use kisan_core::{AppError, Config};
use kisan_infra::{init_telemetry, log_error, shutdown_telemetry, ErrorReport};
use kisan_services::StorageDiagnostics;
use kisan_storage::create_storage;

#[derive(Parser, Debug)]
#[command(name = "storage_check")]
#[command(about = "Verify the document bucket accepts uploads")]
struct Args {
    /// User whose prefix receives the probe object; without it only
    /// reachability is checked
    #[arg(long, value_name = "UUID")]
    user_id: Option<Uuid>,

    /// Output format: json or table (default: table)
    #[arg(long, default_value = "table")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry("storage_check")?;
    let args = Args::parse();

    let config = Config::from_env()?;
    tracing::info!(
        backend = %config.storage_backend,
        bucket = %config.storage_bucket,
        "Checking document storage"
    );

    let storage = match create_storage(&config).await {
        Ok(storage) => storage,
        Err(e) => {
            let err = AppError::from(e);
            log_error(&err);
            eprintln!("{}", serde_json::to_string_pretty(&ErrorReport::from(&err))?);
            anyhow::bail!("storage backend could not be created");
        }
    };

    let diagnostics = StorageDiagnostics::new(storage);
    let report = match args.user_id {
        Some(user_id) => {
            diagnostics
                .run_for_user(Some(&UserContext::new(user_id)))
                .await
        }
        None => diagnostics.check_storage().await,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => println!("{}", render_report(&report)),
    }

    shutdown_telemetry().await;

    if !report.is_healthy() {
        anyhow::bail!("storage check failed");
    }
    Ok(())
}
