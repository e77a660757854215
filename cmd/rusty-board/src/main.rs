//! # Rusty-Board Binary
//!
//! Serves articles and their comment trees over HTTP from an in-memory,
//! optionally seeded, repository.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use configs::{LogSettings, Settings};
use services::ArticleService;
use storage_adapters::{load_seed, InMemoryArticleRepository};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    let repo = match &settings.storage.seed_path {
        Some(path) => {
            let seed = load_seed(path).await?;
            InMemoryArticleRepository::from_seed(seed).context("seeding repository")?
        }
        None => InMemoryArticleRepository::new(),
    };

    let state = AppState {
        articles: ArticleService::new(Arc::new(repo), settings.comments),
    };

    let addr = settings.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, policy = ?settings.comments, "rusty-board listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    if log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
