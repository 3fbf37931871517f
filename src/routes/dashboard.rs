use std::sync::Arc;

use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use chrono::{DateTime, Duration, Utc};

use super::{format_date, format_time};
use crate::{
    models::{
        checklist::{ChecklistKind, ChecklistRecord},
        trip::Trip,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    submission_count: usize,
    trips: Vec<TripCard>,
}

struct TripCard {
    plate: String,
    model: String,
    status_label: &'static str,
    status_class: &'static str,
    has_distance: bool,
    distance_km: i64,
    overdue: bool,
    /// Departure panel first, arrival panel second.
    panels: Vec<ChecklistPanel>,
}

struct ChecklistPanel {
    present: bool,
    title: &'static str,
    kind_name: &'static str,
    driver_name: String,
    odometer_label: &'static str,
    odometer: String,
    date: String,
    time: String,
    answers: Vec<AnswerRow>,
    has_observations: bool,
    observations: String,
    photos: Vec<PhotoThumb>,
}

struct AnswerRow {
    label: &'static str,
    ok: bool,
    text: &'static str,
}

struct PhotoThumb {
    label: &'static str,
    has_url: bool,
    url: String,
}

async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let submission_count = state.store.len().await;
    let trips = state.store.trips().await;
    let now = Utc::now();
    let cards = trips
        .iter()
        .map(|trip| trip_card(trip, now, state.config.stale_after))
        .collect();
    AskamaTemplateResponse::into_response(DashboardTemplate {
        submission_count,
        trips: cards,
    })
}

fn trip_card(trip: &Trip, now: DateTime<Utc>, stale_after: Option<Duration>) -> TripCard {
    let distance = trip.distance_km();
    TripCard {
        plate: trip.vehicle_plate.to_string(),
        model: trip
            .vehicle_model()
            .map(|model| model.label().to_string())
            .unwrap_or_default(),
        status_label: trip.status.label(),
        status_class: trip.status.css_class(),
        has_distance: distance.is_some(),
        distance_km: distance.unwrap_or_default(),
        overdue: trip.is_overdue(now, stale_after),
        panels: vec![
            checklist_panel(ChecklistKind::Departure, trip.departure.as_ref()),
            checklist_panel(ChecklistKind::Arrival, trip.arrival.as_ref()),
        ],
    }
}

fn checklist_panel(kind: ChecklistKind, record: Option<&Arc<ChecklistRecord>>) -> ChecklistPanel {
    let (title, kind_name) = match kind {
        ChecklistKind::Departure => ("Dados da Saída", "saída"),
        ChecklistKind::Arrival => ("Dados da Chegada", "chegada"),
    };
    let Some(record) = record else {
        return ChecklistPanel {
            present: false,
            title,
            kind_name,
            driver_name: String::new(),
            odometer_label: kind.odometer_label(),
            odometer: String::new(),
            date: String::new(),
            time: String::new(),
            answers: Vec::new(),
            has_observations: false,
            observations: String::new(),
            photos: Vec::new(),
        };
    };

    ChecklistPanel {
        present: true,
        title,
        kind_name,
        driver_name: record.driver_name.clone(),
        odometer_label: kind.odometer_label(),
        odometer: record.odometer_text(),
        date: format_date(record.submitted_at),
        time: format_time(record.submitted_at),
        answers: record
            .answers
            .items()
            .into_iter()
            .map(|(label, answer)| AnswerRow {
                label,
                ok: answer == Some(true),
                text: match answer {
                    Some(true) => "Sim",
                    Some(false) => "Não",
                    None => "–",
                },
            })
            .collect(),
        has_observations: record.observations.is_some(),
        observations: record.observations_text().to_string(),
        photos: record
            .photos
            .slots()
            .into_iter()
            .map(|(label, url)| PhotoThumb {
                label,
                has_url: url.is_some(),
                url: url.unwrap_or_default().to_string(),
            })
            .collect(),
    }
}
