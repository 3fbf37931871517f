pub mod api;
pub mod dashboard;
pub mod public;

use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Local, Utc};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{error::AppError, models::checklist::ChecklistKind, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .merge(public::router())
        .merge(dashboard::router())
        .nest("/api", api::router())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Path segment (`saida` / `chegada`) to kind; anything else is a 404.
fn parse_kind(raw: &str) -> Result<ChecklistKind, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}

fn format_date(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d/%m/%Y").to_string()
}

fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::create_router;
    use crate::{config::AppConfig, services::store::ChecklistStore, state::AppState};

    fn app() -> (Router, ChecklistStore) {
        let store = ChecklistStore::new();
        let state = AppState::new(AppConfig::default(), store.clone());
        (create_router(state), store)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    const FULL_FORM: &str = "driver_name=Maria&vehicle_plate=abc1234&vehicle_model=fiorino\
        &odometer_km=1000&fluids_ok=sim&lights_ok=sim&emergency_kit_ok=sim&roadworthy=nao\
        &observations=&photo_front=&photo_right=&photo_left=&photo_rear=&photo_odometer=";

    #[tokio::test]
    async fn landing_page_renders() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Registrar Novo Checklist"));
    }

    #[tokio::test]
    async fn unknown_checklist_kind_is_not_found() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/checklists/voo/new").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn valid_form_redirects_to_dashboard() {
        let (app, store) = app();
        let response = app
            .oneshot(post_form("/checklists/saida/new", FULL_FORM))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");

        let records = store.snapshot().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].vehicle_plate.as_str(), "ABC1234");
        assert_eq!(records[0].answers.roadworthy, Some(false));
    }

    #[tokio::test]
    async fn invalid_form_is_rendered_again_with_errors() {
        let (app, store) = app();
        let response = app
            .oneshot(post_form(
                "/checklists/chegada/new",
                "driver_name=Maria&vehicle_plate=abc1234",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("KM final é obrigatório"));
        assert!(html.contains("ABC1234") || html.contains("abc1234"));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn dashboard_shows_empty_state_then_trips() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(Request::get("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Nenhum checklist enviado"));

        app.clone()
            .oneshot(post_form("/checklists/saida/new", FULL_FORM))
            .await
            .unwrap();
        let response = app
            .oneshot(Request::get("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("ABC1234"));
        assert!(html.contains("Em Trânsito"));
    }

    #[tokio::test]
    async fn json_api_records_and_reconciles() {
        let (app, _) = app();
        let departure = json!({
            "kind": "saida",
            "driver_name": "Maria",
            "vehicle_plate": "ABC1234",
            "vehicle_model": "vuc",
            "odometer_km": 1000,
            "submitted_at": "2024-01-01T08:00:00Z"
        });
        let arrival = json!({
            "kind": "chegada",
            "driver_name": "Maria",
            "vehicle_plate": "abc1234",
            "vehicle_model": "vuc",
            "odometer_km": 1180,
            "submitted_at": "2024-01-01T17:00:00Z"
        });
        let stray = json!({
            "kind": "chegada",
            "driver_name": "João",
            "vehicle_plate": "XYZ9999",
            "vehicle_model": "fiorino",
            "submitted_at": "2024-01-01T09:00:00Z"
        });

        for body in [departure, arrival, stray] {
            let response = app
                .clone()
                .oneshot(post_json("/api/checklists", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .clone()
            .oneshot(Request::get("/api/trips").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let trips = body_json(response).await;
        let trips = trips.as_array().unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0]["vehicle_plate"], "ABC1234");
        assert_eq!(trips[0]["status"], "complete");
        assert_eq!(trips[0]["distance_km"], 180);
        assert_eq!(trips[0]["latest_timestamp"], "2024-01-01T17:00:00Z");
        assert_eq!(trips[1]["vehicle_plate"], "XYZ9999");
        assert_eq!(trips[1]["status"], "arrival_only");
        assert!(trips[1]["distance_km"].is_null());
        assert!(trips[1]["departure"].is_null());

        let response = app
            .oneshot(Request::get("/api/checklists").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn json_validation_errors_are_unprocessable() {
        let (app, _) = app();
        let response = app
            .oneshot(post_json(
                "/api/checklists",
                json!({ "kind": "saida", "vehicle_plate": "  " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(
            body["errors"]["vehicle_plate"],
            "Placa do veículo é obrigatória."
        );
        assert!(body["errors"]["driver_name"].is_string());
    }

    #[tokio::test]
    async fn checklist_lookup_by_id() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/checklists",
                json!({
                    "kind": "saida",
                    "driver_name": "Maria",
                    "vehicle_plate": "ABC1234",
                    "vehicle_model": "vuc"
                }),
            ))
            .await
            .unwrap();
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/api/checklists/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["vehicle_plate"], "ABC1234");

        let response = app
            .oneshot(
                Request::get("/api/checklists/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
