use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use app::config::prepare_sqlite_file;
use app::{AppState, Cli, Command, Settings, create_router};
use clap::Parser;
use services::{AppServices, Clock};
use storage::catalog::seed_catalog;
use storage::repository::Storage;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "app=info,services=info,storage=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real env vars still apply.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command() {
        Command::Serve => serve(&cli.settings).await,
        Command::Seed => seed(&cli.settings).await,
    }
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let db_url = settings.database_url();
    prepare_sqlite_file(&db_url)?;

    let services = AppServices::new_sqlite(
        &db_url,
        Clock::system(),
        settings.speech(),
        settings.images(),
    )
    .await
    .with_context(|| format!("failed to open {db_url}"))?;
    let state = Arc::new(AppState::new(services, settings.session_idle_timeout()));
    tokio::spawn(sweep_idle_sessions(Arc::clone(&state)));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;
    tracing::info!(addr = %listener.local_addr()?, db = %db_url, "story reader listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn seed(settings: &Settings) -> anyhow::Result<()> {
    let db_url = settings.database_url();
    prepare_sqlite_file(&db_url)?;

    let storage = Storage::sqlite(&db_url)
        .await
        .with_context(|| format!("failed to open {db_url}"))?;
    let report = seed_catalog(storage.content.as_ref()).await?;
    tracing::info!(
        sentences = report.sentences,
        questions = report.questions,
        db = %db_url,
        "catalog seeded"
    );
    Ok(())
}

async fn sweep_idle_sessions(state: Arc<AppState>) {
    let period = state.sessions.idle_timeout().min(Duration::from_secs(60));
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        let dropped = state.sessions.sweep().await;
        if dropped > 0 {
            tracing::info!(dropped, "idle sessions dropped");
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
