use kiddo_motivate::infrastructure::config::AppConfig;
use kiddo_motivate::infrastructure::db;
use kiddo_motivate::infrastructure::state::AppState;
use kiddo_motivate::presentation;

use dotenvy::dotenv;
use std::env;
use std::future::Future;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // ignore the error: tests may initialise the subscriber more than once
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "kiddo_motivate=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let config = AppConfig::from_env()?;

    run(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run<F>(config: AppConfig, shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (listener, app) = bootstrap(config).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

async fn bootstrap(config: AppConfig) -> anyhow::Result<(tokio::net::TcpListener, axum::Router)> {
    let pool = db::create_pool(&config.database_url, &config.pool).await?;
    db::ensure_schema(&pool).await?;

    let addr = config.socket_addr()?;
    let app = presentation::router::app(AppState::new(pool, Arc::new(config)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    Ok((listener, app))
}
