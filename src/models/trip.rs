use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::checklist::{ChecklistRecord, VehicleModel, VehiclePlate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Complete,
    InTransit,
    ArrivalOnly,
}

impl TripStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TripStatus::Complete => "Completa",
            TripStatus::InTransit => "Em Trânsito",
            TripStatus::ArrivalOnly => "Chegada Avulsa",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            TripStatus::Complete => "complete",
            TripStatus::InTransit => "in-transit",
            TripStatus::ArrivalOnly => "arrival-only",
        }
    }
}

/// One reconciled departure/arrival pairing. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub vehicle_plate: VehiclePlate,
    pub departure: Option<Arc<ChecklistRecord>>,
    pub arrival: Option<Arc<ChecklistRecord>>,
    pub status: TripStatus,
    pub latest_timestamp: DateTime<Utc>,
}

impl Trip {
    pub fn complete(departure: Arc<ChecklistRecord>, arrival: Arc<ChecklistRecord>) -> Self {
        Self {
            vehicle_plate: departure.vehicle_plate.clone(),
            latest_timestamp: arrival.submitted_at,
            departure: Some(departure),
            arrival: Some(arrival),
            status: TripStatus::Complete,
        }
    }

    pub fn in_transit(departure: Arc<ChecklistRecord>) -> Self {
        Self {
            vehicle_plate: departure.vehicle_plate.clone(),
            latest_timestamp: departure.submitted_at,
            departure: Some(departure),
            arrival: None,
            status: TripStatus::InTransit,
        }
    }

    pub fn arrival_only(arrival: Arc<ChecklistRecord>) -> Self {
        Self {
            vehicle_plate: arrival.vehicle_plate.clone(),
            latest_timestamp: arrival.submitted_at,
            departure: None,
            arrival: Some(arrival),
            status: TripStatus::ArrivalOnly,
        }
    }

    /// Kilometres driven; only defined for complete trips with both odometer readings.
    pub fn distance_km(&self) -> Option<i64> {
        if self.status != TripStatus::Complete {
            return None;
        }
        let start = self.departure.as_ref()?.odometer_km?;
        let end = self.arrival.as_ref()?.odometer_km?;
        Some(i64::from(end) - i64::from(start))
    }

    /// An in-transit trip whose departure is older than `stale_after`.
    pub fn is_overdue(&self, now: DateTime<Utc>, stale_after: Option<Duration>) -> bool {
        match (self.status, stale_after, &self.departure) {
            (TripStatus::InTransit, Some(limit), Some(departure)) => {
                now - departure.submitted_at > limit
            }
            _ => false,
        }
    }

    pub fn vehicle_model(&self) -> Option<VehicleModel> {
        self.departure
            .as_ref()
            .or(self.arrival.as_ref())
            .map(|record| record.vehicle_model)
    }

    pub fn records(&self) -> impl Iterator<Item = &Arc<ChecklistRecord>> {
        self.departure.iter().chain(self.arrival.iter())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::checklist::ChecklistKind;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn record(kind: ChecklistKind, hour: u32, km: Option<u32>) -> Arc<ChecklistRecord> {
        let mut record = ChecklistRecord::new(kind, "ABC1234", at(hour));
        record.odometer_km = km;
        Arc::new(record)
    }

    #[test]
    fn distance_needs_both_readings() {
        let trip = Trip::complete(
            record(ChecklistKind::Departure, 8, Some(1000)),
            record(ChecklistKind::Arrival, 17, Some(1125)),
        );
        assert_eq!(trip.distance_km(), Some(125));
        assert_eq!(trip.latest_timestamp, at(17));

        let trip = Trip::complete(
            record(ChecklistKind::Departure, 8, None),
            record(ChecklistKind::Arrival, 17, Some(1125)),
        );
        assert_eq!(trip.distance_km(), None);
    }

    #[test]
    fn distance_undefined_for_unpaired_trips() {
        let trip = Trip::in_transit(record(ChecklistKind::Departure, 8, Some(1000)));
        assert_eq!(trip.distance_km(), None);
        let trip = Trip::arrival_only(record(ChecklistKind::Arrival, 9, Some(1000)));
        assert_eq!(trip.distance_km(), None);
    }

    #[test]
    fn overdue_only_applies_to_in_transit_trips_past_the_limit() {
        let limit = Some(Duration::hours(12));
        let trip = Trip::in_transit(record(ChecklistKind::Departure, 8, None));
        assert!(!trip.is_overdue(at(19), limit));
        assert!(trip.is_overdue(at(8) + Duration::hours(13), limit));
        assert!(!trip.is_overdue(at(8) + Duration::hours(13), None));

        let trip = Trip::arrival_only(record(ChecklistKind::Arrival, 1, None));
        assert!(!trip.is_overdue(at(23), limit));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TripStatus::ArrivalOnly).unwrap(),
            "\"arrival_only\""
        );
    }
}
