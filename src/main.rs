use anyhow::Context;
use frota::config::AppConfig;
use frota::error::AppError;
use frota::routes::create_router;
use frota::services::store::ChecklistStore;
use frota::state::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    if !config.static_dir.is_dir() {
        warn!("static dir {} not found", config.static_dir.display());
    }
    if let Some(limit) = config.stale_after {
        info!("in-transit trips flagged as overdue after {}h", limit.num_hours());
    }

    // Submissions live in memory only and are gone after a restart.
    let store = ChecklistStore::new();
    let state = AppState::new(config.clone(), store);

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,frota=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
