use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fxdeals_core::deals::DealRecord;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{Deal, DealCount, DealRequest, ImportReport},
};

/// Imports a batch of deals. Per-record failures are part of the 201 report;
/// only an undecodable payload is rejected as a whole.
#[utoipa::path(
    post,
    path = "/api/v1/deals/import",
    request_body = [DealRequest],
    responses(
        (status = 201, description = "Batch processed", body = ImportReport),
        (status = 400, description = "Request body is malformed")
    )
)]
pub async fn import_deals(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<DealRequest>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ImportReport>)> {
    let Json(requests) = payload?;
    let records: Vec<DealRecord> = requests.into_iter().map(DealRecord::from).collect();
    let report = state.deal_service.import_deals(records).await;
    Ok((StatusCode::CREATED, Json(ImportReport::from(report))))
}

#[utoipa::path(
    get,
    path = "/api/v1/deals/{id}",
    params(("id" = String, Path, description = "Deal unique id")),
    responses((status = 200, body = Deal), (status = 404, description = "Unknown deal"))
)]
pub async fn get_deal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Deal>> {
    let deal = state
        .deal_service
        .get_deal(&id)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(Deal::from(deal)))
}

#[utoipa::path(get, path = "/api/v1/deals-count", responses((status = 200, body = DealCount)))]
pub async fn count_deals(State(state): State<Arc<AppState>>) -> ApiResult<Json<DealCount>> {
    let count = state.deal_service.count_deals()?;
    Ok(Json(DealCount { count }))
}

/// Read-only deal routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deals-count", get(count_deals))
        .route("/deals/{id}", get(get_deal))
}

/// The import route. It runs to the end of the batch once started, so it
/// must stay outside the request timeout layer.
pub fn import_router() -> Router<Arc<AppState>> {
    Router::new().route("/deals/import", post(import_deals))
}
