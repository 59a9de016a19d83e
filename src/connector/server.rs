use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{decompression::RequestDecompressionLayer, set_header::SetResponseHeaderLayer};
use tracing::info;

use super::{
    models::{CONNECTOR_API_VERSION, CONNECTOR_API_VERSION_HEADER, ZOTERO_VERSION, ZOTERO_VERSION_HEADER},
    services::{not_found, ping_page, ping_prefs, save_items, save_snapshot, selected_collection},
    state::AppState,
};
use crate::config::Config;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Connector routes with protocol headers and request logging
///
/// Both Zotero headers are set on every response, including 404/405 and
/// error bodies.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/connector/ping", get(ping_page).post(ping_prefs))
        .route("/connector/getSelectedCollection", post(selected_collection))
        .route("/connector/saveSnapshot", post(save_snapshot))
        .route("/connector/saveItems", post(save_items))
        .fallback(not_found)
        .with_state(state)
        .layer(RequestDecompressionLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(ZOTERO_VERSION_HEADER),
            HeaderValue::from_static(ZOTERO_VERSION),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(CONNECTOR_API_VERSION_HEADER),
            HeaderValue::from(CONNECTOR_API_VERSION),
        ))
        .layer(middleware::from_fn(log_request))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(%method, %path, status = response.status().as_u16(), "Connector request");
    response
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    let address = config.server.bind_addr;
    info!(
        library = %config.library.name,
        provider = ?config.library.provider,
        enrichment = config.enrichment.enabled,
        "Starting connector server"
    );

    let state = AppState::from_config(config)?;
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Zotero connector listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
