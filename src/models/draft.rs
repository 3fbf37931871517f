//! Raw checklist submissions and their validation into immutable records.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use uuid::Uuid;

use super::checklist::{
    ChecklistAnswers, ChecklistKind, ChecklistRecord, Photos, VehicleModel, VehiclePlate,
};

const REQUIRED: &str = "Campo obrigatório.";

/// Field name → message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn message(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Checklist as posted by the HTML form. Every field arrives as text.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecklistForm {
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub vehicle_plate: String,
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(default)]
    pub odometer_km: String,
    #[serde(default)]
    pub fluids_ok: Option<String>,
    #[serde(default)]
    pub lights_ok: Option<String>,
    #[serde(default)]
    pub emergency_kit_ok: Option<String>,
    #[serde(default)]
    pub roadworthy: Option<String>,
    #[serde(default)]
    pub observations: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub photo_front: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub photo_right: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub photo_left: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub photo_rear: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub photo_odometer: Option<String>,
}

impl ChecklistForm {
    /// The HTML form requires every inspection answer and the odometer reading.
    pub fn validate(
        &self,
        kind: ChecklistKind,
        max_photo_bytes: usize,
        now: DateTime<Utc>,
    ) -> Result<ChecklistRecord, ValidationErrors> {
        let mut checks = FieldChecks::new(max_photo_bytes);

        let driver_name = checks.driver_name(&self.driver_name);
        let vehicle_plate = checks.vehicle_plate(&self.vehicle_plate);
        let vehicle_model = checks.vehicle_model(&self.vehicle_model);

        let odometer_km = match self.odometer_km.trim().parse::<u32>() {
            Ok(km) => Some(km),
            Err(_) => {
                checks.errors.insert("odometer_km", odometer_message(kind));
                None
            }
        };

        let answers = ChecklistAnswers {
            fluids_ok: checks.required_answer("fluids_ok", self.fluids_ok.as_deref()),
            lights_ok: checks.required_answer("lights_ok", self.lights_ok.as_deref()),
            emergency_kit_ok: checks
                .required_answer("emergency_kit_ok", self.emergency_kit_ok.as_deref()),
            roadworthy: checks.required_answer("roadworthy", self.roadworthy.as_deref()),
        };

        let photos = Photos {
            front: checks.photo("photo_front", self.photo_front.as_deref()),
            right: checks.photo("photo_right", self.photo_right.as_deref()),
            left: checks.photo("photo_left", self.photo_left.as_deref()),
            rear: checks.photo("photo_rear", self.photo_rear.as_deref()),
            odometer: checks.photo("photo_odometer", self.photo_odometer.as_deref()),
        };

        checks.finish(|| ChecklistRecord {
            id: Uuid::new_v4().to_string(),
            kind,
            vehicle_plate,
            vehicle_model: vehicle_model.unwrap_or(VehicleModel::Fiorino),
            driver_name,
            odometer_km,
            observations: normalize_optional(Some(self.observations.as_str())),
            answers,
            photos,
            submitted_at: now,
        })
    }

    pub fn is_checked(&self, field: &str, value: &str) -> bool {
        let current = match field {
            "fluids_ok" => &self.fluids_ok,
            "lights_ok" => &self.lights_ok,
            "emergency_kit_ok" => &self.emergency_kit_ok,
            "roadworthy" => &self.roadworthy,
            _ => return false,
        };
        current.as_deref() == Some(value)
    }

    pub fn is_model_selected(&self, value: &str) -> bool {
        self.vehicle_model.trim().eq_ignore_ascii_case(value)
    }

    pub fn photo_value(&self, field: &str) -> &str {
        let value = match field {
            "photo_front" => &self.photo_front,
            "photo_right" => &self.photo_right,
            "photo_left" => &self.photo_left,
            "photo_rear" => &self.photo_rear,
            "photo_odometer" => &self.photo_odometer,
            _ => return "",
        };
        value.as_deref().unwrap_or("")
    }
}

/// Checklist as posted to the JSON API.
///
/// Unlike the HTML form, unanswered questions (`null`) and a missing odometer
/// reading are accepted, and `submitted_at` may be supplied to back-fill a
/// paper checklist.
#[derive(Debug, Clone, Deserialize)]
pub struct NewChecklist {
    pub kind: ChecklistKind,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub vehicle_plate: String,
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(default)]
    pub odometer_km: Option<i64>,
    #[serde(default)]
    pub answers: ChecklistAnswers,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub photos: Photos,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl NewChecklist {
    pub fn validate(
        self,
        max_photo_bytes: usize,
        now: DateTime<Utc>,
    ) -> Result<ChecklistRecord, ValidationErrors> {
        let mut checks = FieldChecks::new(max_photo_bytes);

        let driver_name = checks.driver_name(&self.driver_name);
        let vehicle_plate = checks.vehicle_plate(&self.vehicle_plate);
        let vehicle_model = checks.vehicle_model(&self.vehicle_model);

        let odometer_km = match self.odometer_km {
            None => None,
            Some(km) => match u32::try_from(km) {
                Ok(km) => Some(km),
                Err(_) => {
                    checks
                        .errors
                        .insert("odometer_km", odometer_message(self.kind));
                    None
                }
            },
        };

        let photos = Photos {
            front: checks.photo("photo_front", self.photos.front.as_deref()),
            right: checks.photo("photo_right", self.photos.right.as_deref()),
            left: checks.photo("photo_left", self.photos.left.as_deref()),
            rear: checks.photo("photo_rear", self.photos.rear.as_deref()),
            odometer: checks.photo("photo_odometer", self.photos.odometer.as_deref()),
        };

        let kind = self.kind;
        let answers = self.answers;
        let observations = normalize_optional(self.observations.as_deref());
        let submitted_at = self.submitted_at.unwrap_or(now);

        checks.finish(|| ChecklistRecord {
            id: Uuid::new_v4().to_string(),
            kind,
            vehicle_plate,
            vehicle_model: vehicle_model.unwrap_or(VehicleModel::Fiorino),
            driver_name,
            odometer_km,
            observations,
            answers,
            photos,
            submitted_at,
        })
    }
}

struct FieldChecks {
    errors: ValidationErrors,
    max_photo_bytes: usize,
}

impl FieldChecks {
    fn new(max_photo_bytes: usize) -> Self {
        Self {
            errors: ValidationErrors::default(),
            max_photo_bytes,
        }
    }

    fn driver_name(&mut self, raw: &str) -> String {
        let name = raw.trim();
        if name.is_empty() {
            self.errors
                .insert("driver_name", "Nome do motorista é obrigatório.");
        }
        name.to_string()
    }

    fn vehicle_plate(&mut self, raw: &str) -> VehiclePlate {
        let plate = VehiclePlate::new(raw);
        if plate.is_empty() {
            self.errors
                .insert("vehicle_plate", "Placa do veículo é obrigatória.");
        }
        plate
    }

    fn vehicle_model(&mut self, raw: &str) -> Option<VehicleModel> {
        if raw.trim().is_empty() {
            self.errors
                .insert("vehicle_model", "Modelo do veículo é obrigatório.");
            return None;
        }
        match raw.parse() {
            Ok(model) => Some(model),
            Err(_) => {
                self.errors
                    .insert("vehicle_model", "Modelo do veículo inválido.");
                None
            }
        }
    }

    fn required_answer(&mut self, field: &'static str, raw: Option<&str>) -> Option<bool> {
        let answer = raw.and_then(parse_answer);
        if answer.is_none() {
            self.errors.insert(field, REQUIRED);
        }
        answer
    }

    fn photo(&mut self, field: &'static str, raw: Option<&str>) -> Option<String> {
        let photo = normalize_optional(raw)?;
        if photo.len() > self.max_photo_bytes {
            self.errors.insert(
                field,
                format!("Foto muito grande (máximo {} bytes).", self.max_photo_bytes),
            );
            return None;
        }
        Some(photo)
    }

    fn finish(
        self,
        build: impl FnOnce() -> ChecklistRecord,
    ) -> Result<ChecklistRecord, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(build())
        } else {
            Err(self.errors)
        }
    }
}

fn odometer_message(kind: ChecklistKind) -> String {
    let label = match kind {
        ChecklistKind::Departure => "KM inicial",
        ChecklistKind::Arrival => "KM final",
    };
    format!("{label} é obrigatório e deve ser um número positivo.")
}

fn parse_answer(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "sim" | "true" => Some(true),
        "nao" | "não" | "false" => Some(false),
        _ => None,
    }
}

fn normalize_optional(input: Option<&str>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
