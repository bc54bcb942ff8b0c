use anyhow::{Context, Result};
use axum::{http::Request, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Settings;
use crate::data::ReadingStore;

pub struct AppState {
    pub store: ReadingStore,
}

/// JSON api and html pages behind one router.
pub fn build_router(store: ReadingStore) -> Router {
    let state = Arc::new(AppState { store });

    Router::new()
        .merge(crate::api::router())
        .merge(crate::web::router())
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                tracing::info_span!("http", method = %req.method(), uri = %req.uri())
            }),
        )
        .layer(CorsLayer::permissive())
}

pub async fn serve(settings: &Settings, store: ReadingStore) -> Result<()> {
    let app = build_router(store);

    let addr = settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Couldn't bind {}", addr))?;

    info!("Serving on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("interrupted by user, stopping server");
    }
}
