use super::service::HitStore;
use super::types::{HitCountResponse, HitError, HitRequest};

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Public endpoint for recording (POST) and counting (GET) hits.
pub const ENDPOINT_SITE: &str = "/sites/:site_id";

/// Builds the HTTP API. Each request gets a child of `shutdown`, so cancelling
/// it abandons in-flight store calls.
pub fn router(store: Arc<HitStore>, shutdown: CancellationToken) -> Router {
    Router::new()
        .route(ENDPOINT_SITE, post(handle_record_hit).get(handle_count_hits))
        .layer(Extension(store))
        .layer(Extension(shutdown))
}

pub async fn handle_record_hit(
    Extension(store): Extension<Arc<HitStore>>,
    Extension(shutdown): Extension<CancellationToken>,
    Path(site_id): Path<String>,
    body: Result<Json<HitRequest>, JsonRejection>,
) -> StatusCode {
    let fingerprint = match body {
        Ok(Json(req)) => req.fingerprint.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Rejected hit for site {}: {}", site_id, e);
            return StatusCode::BAD_REQUEST;
        }
    };

    let cancel = shutdown.child_token();
    match store.record_hit(&site_id, &fingerprint, &cancel).await {
        Ok(()) => StatusCode::OK,
        Err(e) => failure_status(&site_id, &e),
    }
}

pub async fn handle_count_hits(
    Extension(store): Extension<Arc<HitStore>>,
    Extension(shutdown): Extension<CancellationToken>,
    Path(site_id): Path<String>,
) -> Result<Json<HitCountResponse>, StatusCode> {
    let cancel = shutdown.child_token();
    match store.count_hits(&site_id, &cancel).await {
        Ok(hit_count) => Ok(Json(HitCountResponse { hit_count })),
        Err(e) => Err(failure_status(&site_id, &e)),
    }
}

fn failure_status(site_id: &str, error: &HitError) -> StatusCode {
    if error.is_client_error() {
        tracing::warn!("Rejected request for site {}: {}", site_id, error);
    } else {
        tracing::error!("Request for site {} failed: {}", site_id, error);
    }
    error.status_code()
}
