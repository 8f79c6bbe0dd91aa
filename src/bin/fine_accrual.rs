//! Daily fine accrual batch entrypoint
//!
//! Intended to run from a scheduler once per day:
//!
//! ```text
//! fine-accrual [YYYY-MM-DD]
//! ```
//!
//! With no argument the sweep runs for today. Exits 0 only when the run
//! committed with zero errors, so the scheduler can alert on anything else.

use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use circulation_server::{config::AppConfig, repository::Repository, services::Services};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("circulation_server={}", config.logging.level).into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let as_of = match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("invalid date '{}': {}", arg, e))?,
        None => Utc::now().date_naive(),
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config.accrual);

    tracing::info!(%as_of, "running fine accrual sweep");

    match services.accrual.run_daily_accrual(as_of).await {
        Ok(report) => {
            println!(
                "accrual {}: processed={} inserted={} updated={} skipped={} errors={}",
                as_of,
                report.processed,
                report.inserted,
                report.updated,
                report.skipped,
                report.errors.len()
            );
            for error in &report.errors {
                eprintln!("error: {}", error);
            }
            if report.is_clean() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Err(e) => {
            eprintln!("accrual {} failed and rolled back: {}", as_of, e);
            Ok(ExitCode::FAILURE)
        }
    }
}
