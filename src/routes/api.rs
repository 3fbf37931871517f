use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::{
    error::AppError,
    models::{checklist::ChecklistRecord, draft::NewChecklist, trip::Trip},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checklists", get(list_checklists).post(create_checklist))
        .route("/checklists/:id", get(get_checklist))
        .route("/trips", get(list_trips))
}

async fn list_checklists(State(state): State<AppState>) -> Json<Vec<Arc<ChecklistRecord>>> {
    Json(state.store.snapshot().await.to_vec())
}

async fn create_checklist(
    State(state): State<AppState>,
    Json(new): Json<NewChecklist>,
) -> Result<(StatusCode, Json<Arc<ChecklistRecord>>), AppError> {
    let kind = new.kind;
    let record = new
        .validate(state.config.max_photo_bytes, Utc::now())
        .map_err(|errors| {
            warn!(%kind, %errors, "checklist rejected");
            AppError::Validation(errors)
        })?;
    let saved = state.store.append(record).await;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn get_checklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Arc<ChecklistRecord>>, AppError> {
    state.store.find(&id).await.map(Json).ok_or(AppError::NotFound)
}

#[derive(Serialize)]
struct TripSummary<'a> {
    #[serde(flatten)]
    trip: &'a Trip,
    distance_km: Option<i64>,
    overdue: bool,
}

async fn list_trips(State(state): State<AppState>) -> Response {
    let trips = state.store.trips().await;
    let now = Utc::now();
    let summaries: Vec<TripSummary<'_>> = trips
        .iter()
        .map(|trip| TripSummary {
            trip,
            distance_km: trip.distance_km(),
            overdue: trip.is_overdue(now, state.config.stale_after),
        })
        .collect();
    Json(summaries).into_response()
}
