use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecklistKind {
    #[serde(rename = "saida")]
    Departure,
    #[serde(rename = "chegada")]
    Arrival,
}

impl ChecklistKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistKind::Departure => "saida",
            ChecklistKind::Arrival => "chegada",
        }
    }

    /// Odometer label: the reading is the initial one on departure and the final one on arrival.
    pub fn odometer_label(&self) -> &'static str {
        match self {
            ChecklistKind::Departure => "KM Inicial",
            ChecklistKind::Arrival => "KM Final",
        }
    }
}

impl fmt::Display for ChecklistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChecklistKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saida" => Ok(ChecklistKind::Departure),
            "chegada" => Ok(ChecklistKind::Arrival),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleModel {
    Fiorino,
    Vuc,
}

impl VehicleModel {
    pub const ALL: [VehicleModel; 2] = [VehicleModel::Fiorino, VehicleModel::Vuc];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleModel::Fiorino => "fiorino",
            VehicleModel::Vuc => "vuc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleModel::Fiorino => "Fiorino",
            VehicleModel::Vuc => "VUC",
        }
    }
}

impl fmt::Display for VehicleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for VehicleModel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fiorino" => Ok(VehicleModel::Fiorino),
            "vuc" => Ok(VehicleModel::Vuc),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Vehicle plate in canonical form (trimmed, uppercase).
///
/// Every way of building a plate goes through [`VehiclePlate::new`], including
/// deserialization, so two plates compare equal exactly when they match
/// case- and whitespace-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VehiclePlate(String);

impl VehiclePlate {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for VehiclePlate {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for VehiclePlate {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<VehiclePlate> for String {
    fn from(plate: VehiclePlate) -> Self {
        plate.0
    }
}

impl fmt::Display for VehiclePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inspection answers. `None` means the question was not answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistAnswers {
    pub fluids_ok: Option<bool>,
    pub lights_ok: Option<bool>,
    pub emergency_kit_ok: Option<bool>,
    pub roadworthy: Option<bool>,
}

impl ChecklistAnswers {
    pub fn items(&self) -> [(&'static str, Option<bool>); 4] {
        [
            ("Fluidos", self.fluids_ok),
            ("Iluminação", self.lights_ok),
            ("Itens de Emergência", self.emergency_kit_ok),
            ("Condições de Rodagem", self.roadworthy),
        ]
    }
}

/// Image references (data URLs or links) for the five photo slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photos {
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub rear: Option<String>,
    #[serde(default)]
    pub odometer: Option<String>,
}

impl Photos {
    pub fn slots(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("Frente", self.front.as_deref()),
            ("Direita", self.right.as_deref()),
            ("Esquerda", self.left.as_deref()),
            ("Traseira", self.rear.as_deref()),
            ("Hodômetro", self.odometer.as_deref()),
        ]
    }

    pub fn count(&self) -> usize {
        self.slots().iter().filter(|(_, url)| url.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistRecord {
    pub id: String,
    pub kind: ChecklistKind,
    pub vehicle_plate: VehiclePlate,
    pub vehicle_model: VehicleModel,
    pub driver_name: String,
    pub odometer_km: Option<u32>,
    pub observations: Option<String>,
    pub answers: ChecklistAnswers,
    #[serde(default)]
    pub photos: Photos,
    pub submitted_at: DateTime<Utc>,
}

impl ChecklistRecord {
    pub fn new(kind: ChecklistKind, vehicle_plate: &str, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            vehicle_plate: VehiclePlate::new(vehicle_plate),
            vehicle_model: VehicleModel::Fiorino,
            driver_name: String::new(),
            odometer_km: None,
            observations: None,
            answers: ChecklistAnswers::default(),
            photos: Photos::default(),
            submitted_at,
        }
    }

    pub fn observations_text(&self) -> &str {
        self.observations.as_deref().unwrap_or("")
    }

    pub fn odometer_text(&self) -> String {
        self.odometer_km
            .map(|km| format!("{km} km"))
            .unwrap_or_else(|| "–".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plate_is_trimmed_and_uppercased() {
        assert_eq!(VehiclePlate::new("  abc1d23 ").as_str(), "ABC1D23");
        assert_eq!(VehiclePlate::new("abc1234"), VehiclePlate::new("ABC1234 "));
    }

    #[test]
    fn plate_is_canonicalized_when_deserialized() {
        let plate: VehiclePlate = serde_json::from_str("\" xyz9999\"").unwrap();
        assert_eq!(plate, VehiclePlate::new("XYZ9999"));
        assert_eq!(serde_json::to_string(&plate).unwrap(), "\"XYZ9999\"");
    }

    #[test]
    fn kind_uses_portuguese_wire_names() {
        assert_eq!(
            serde_json::to_string(&ChecklistKind::Departure).unwrap(),
            "\"saida\""
        );
        assert_eq!("chegada".parse::<ChecklistKind>(), Ok(ChecklistKind::Arrival));
        assert!("arrival".parse::<ChecklistKind>().is_err());
    }

    #[test]
    fn vehicle_model_parse_ignores_case() {
        assert_eq!("VUC".parse::<VehicleModel>(), Ok(VehicleModel::Vuc));
        assert_eq!(" fiorino ".parse::<VehicleModel>(), Ok(VehicleModel::Fiorino));
        assert!("kombi".parse::<VehicleModel>().is_err());
    }

    #[test]
    fn photo_count_ignores_empty_slots() {
        let photos = Photos {
            front: Some("data:image/png;base64,AAAA".into()),
            odometer: Some("https://example.test/odo.jpg".into()),
            ..Photos::default()
        };
        assert_eq!(photos.count(), 2);
    }
}
