use anyhow::Context;
use fitness_center::api::{create_routes, AppState};
use fitness_center::config::{AppConfig, DatabaseConfig};
use fitness_center::services::ensure_schema;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Storage credentials usually live in a local .env file
    let _ = dotenvy::dotenv();

    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.log_level)),
        )
        .init();

    info!(environment = %app_config.environment, "Fitness center server starting");

    let pool = db_config.create_pool().await?;
    if db_config.init_schema {
        ensure_schema(&pool).await?;
    }

    let app = create_routes(AppState::postgres(pool));

    let address = app_config.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Fitness center server listening on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
