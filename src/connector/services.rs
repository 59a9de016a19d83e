use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use http_body_util::BodyExt;
use tracing::{debug, error, info};

use super::{
    error::ApiError,
    models::{PING_PAGE, PING_PREFS, SaveItemsRequest, SelectedCollection},
    state::AppState,
};

/// Liveness probe, browser flavour (GET /connector/ping)
pub async fn ping_page() -> impl IntoResponse {
    debug!("Received a GET ping");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html")],
        PING_PAGE,
    )
}

/// Liveness probe, connector flavour (POST /connector/ping)
pub async fn ping_prefs() -> impl IntoResponse {
    debug!("Received a POST ping");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        PING_PREFS,
    )
}

/// Describe the target library (POST /connector/getSelectedCollection)
pub async fn selected_collection(State(state): State<AppState>) -> impl IntoResponse {
    let name = state.library.library_name();
    (StatusCode::OK, Json(SelectedCollection::library(name)))
}

/// Snapshot capture is not supported (POST /connector/saveSnapshot)
///
/// Still answers 201 so the connector does not report a failed save.
pub async fn save_snapshot() -> impl IntoResponse {
    error!("Snapshot not implemented, acknowledging without saving");
    StatusCode::CREATED
}

/// Batch import entry point (POST /connector/saveItems)
///
/// ## Flow:
/// 1. Read the full body, enforcing `server.max_payload_bytes`
/// 2. Decode `{"items": [...]}`; a body that does not decode fails the whole
///    request before any item is touched
/// 3. Import every item through the pipeline; per-item failures are only
///    logged, the wire protocol has no channel for them
/// 4. Answer 201 with the request body echoed back unchanged
pub async fn save_items(
    State(state): State<AppState>,
    body: Body,
) -> Result<impl IntoResponse, ApiError> {
    info!("Adding items from the Zotero Connector");

    let limit = state.config.server.max_payload_bytes.as_usize();
    let raw = read_body(body, limit).await?;

    let request: SaveItemsRequest = serde_json::from_slice(&raw)?;
    let count = request.items.len();

    let report = state.pipeline.import_batch(request.items).await;
    info!(
        items = count,
        imported = report.imported(),
        failed = report.failed(),
        "Finished saveItems batch"
    );
    debug!(metrics = ?state.pipeline.metrics().snapshot(), "Import counters");

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "application/json")],
        raw,
    ))
}

/// Collect the request body, failing once it exceeds `max_size`
async fn read_body(body: Body, max_size: usize) -> Result<Bytes, ApiError> {
    let limited = http_body_util::Limited::new(body, max_size);
    let collected = limited.collect().await.map_err(|err| {
        if err.is::<http_body_util::LengthLimitError>() {
            ApiError::PayloadTooLarge { limit: max_size }
        } else {
            ApiError::MalformedPayload(format!("failed to read body: {err}"))
        }
    })?;

    Ok(collected.to_bytes())
}

/// Unknown connector endpoint
pub async fn not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}
