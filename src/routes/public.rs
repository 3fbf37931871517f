use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use chrono::Utc;
use tracing::warn;

use super::parse_kind;
use crate::{
    error::AppError,
    models::{
        checklist::{ChecklistKind, VehicleModel},
        draft::{ChecklistForm, ValidationErrors},
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(landing)).route(
        "/checklists/:kind/new",
        get(checklist_form).post(checklist_submit),
    )
}

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingTemplate {
    submission_count: usize,
}

async fn landing(State(state): State<AppState>) -> impl IntoResponse {
    AskamaTemplateResponse::into_response(LandingTemplate {
        submission_count: state.store.len().await,
    })
}

#[derive(Template)]
#[template(path = "checklist_form.html")]
struct ChecklistFormTemplate {
    submission_count: usize,
    kind_slug: &'static str,
    title: &'static str,
    odometer_label: &'static str,
    form: ChecklistForm,
    errors: ValidationErrors,
    models: Vec<ModelOption>,
    questions: Vec<QuestionField>,
    photos: Vec<PhotoField>,
}

struct ModelOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

struct QuestionField {
    name: &'static str,
    label: &'static str,
    yes: bool,
    no: bool,
    error: String,
}

struct PhotoField {
    name: &'static str,
    label: &'static str,
    value: String,
    error: String,
}

const QUESTIONS: [(&str, &str); 4] = [
    ("fluids_ok", "Níveis de fluidos (óleo, água, freio) OK?"),
    ("lights_ok", "Iluminação (faróis, lanternas, setas) OK?"),
    ("emergency_kit_ok", "Itens de emergência (triângulo, extintor, estepe) OK?"),
    ("roadworthy", "Veículo em condições de rodagem?"),
];

const PHOTO_FIELDS: [(&str, &str); 5] = [
    ("photo_front", "Frente"),
    ("photo_right", "Direita"),
    ("photo_left", "Esquerda"),
    ("photo_rear", "Traseira"),
    ("photo_odometer", "Hodômetro"),
];

impl ChecklistFormTemplate {
    fn new(
        submission_count: usize,
        kind: ChecklistKind,
        form: ChecklistForm,
        errors: ValidationErrors,
    ) -> Self {
        let title = match kind {
            ChecklistKind::Departure => "Checklist de Partida do Veículo",
            ChecklistKind::Arrival => "Checklist de Chegada do Veículo",
        };
        let models = VehicleModel::ALL
            .iter()
            .map(|model| ModelOption {
                value: model.as_str(),
                label: model.label(),
                selected: form.is_model_selected(model.as_str()),
            })
            .collect();
        let questions = QUESTIONS
            .iter()
            .map(|&(name, label)| QuestionField {
                name,
                label,
                yes: form.is_checked(name, "sim"),
                no: form.is_checked(name, "nao"),
                error: errors.message(name).to_string(),
            })
            .collect();
        let photos = PHOTO_FIELDS
            .iter()
            .map(|&(name, label)| PhotoField {
                name,
                label,
                value: form.photo_value(name).to_string(),
                error: errors.message(name).to_string(),
            })
            .collect();

        Self {
            submission_count,
            kind_slug: kind.as_str(),
            title,
            odometer_label: kind.odometer_label(),
            form,
            errors,
            models,
            questions,
            photos,
        }
    }
}

async fn checklist_form(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(AskamaTemplateResponse::into_response(
        ChecklistFormTemplate::new(
            state.store.len().await,
            kind,
            ChecklistForm::default(),
            ValidationErrors::default(),
        ),
    ))
}

async fn checklist_submit(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Form(form): Form<ChecklistForm>,
) -> Result<Response, AppError> {
    let kind = parse_kind(&kind)?;
    match form.validate(kind, state.config.max_photo_bytes, Utc::now()) {
        Ok(record) => {
            state.store.append(record).await;
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(errors) => {
            warn!(%kind, %errors, "checklist rejected");
            Ok(render_form_error(
                state.store.len().await,
                kind,
                form,
                errors,
            ))
        }
    }
}

fn render_form_error(
    submission_count: usize,
    kind: ChecklistKind,
    form: ChecklistForm,
    errors: ValidationErrors,
) -> Response {
    (
        StatusCode::BAD_REQUEST,
        AskamaTemplateResponse::into_response(ChecklistFormTemplate::new(
            submission_count,
            kind,
            form,
            errors,
        )),
    )
        .into_response()
}
