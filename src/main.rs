use anyhow::Context;

use wellness_api::{build_router, config::Config, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellness_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config)
        .await
        .context("Failed to create database pool")?;

    if config.auto_init_schema {
        db::schema::initialize(&pool)
            .await
            .context("Failed to initialize database schema")?;
    }

    let addr = config.listen_addr();
    let app = build_router(AppState::new(pool));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
