//! One-shot schema setup: `cargo run --bin db-init`.
//!
//! Reads `DATABASE_URL` from the environment, `.env`, or `.env.local`, in that
//! order. Exits non-zero on any failure.

use std::process::ExitCode;

use wellness_api::{config::Config, db};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellness_api=info,db_init=info".into()),
        )
        .init();

    match run().await {
        Ok(()) => {
            tracing::info!(
                username = db::schema::DEMO_USERNAME,
                password = db::schema::DEMO_PASSWORD,
                "Database ready; demo account available"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Database initialization failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config).await?;

    let result = db::schema::initialize(&pool).await;
    pool.close().await;

    Ok(result?)
}
