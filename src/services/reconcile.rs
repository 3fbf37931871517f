//! Pairs departure and arrival checklists into trips.
//!
//! Each departure, oldest first, takes the earliest unconsumed arrival for the
//! same plate that was submitted strictly after it. Departures left without an
//! arrival are in transit; arrivals nobody claimed are standalone. The result
//! is ordered most recent first.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use tracing::debug;

use crate::models::{
    checklist::{ChecklistKind, ChecklistRecord, VehiclePlate},
    trip::{Trip, TripStatus},
};

pub fn reconcile(records: &[Arc<ChecklistRecord>]) -> Vec<Trip> {
    let (mut departures, mut arrivals): (Vec<_>, Vec<_>) = records
        .iter()
        .partition(|record| record.kind == ChecklistKind::Departure);

    // Stable: equal timestamps keep input order.
    departures.sort_by_key(|record| record.submitted_at);
    arrivals.sort_by_key(|record| record.submitted_at);

    // Arrival indices per plate, ascending by time.
    let mut pending: HashMap<&VehiclePlate, VecDeque<usize>> = HashMap::new();
    for (index, arrival) in arrivals.iter().enumerate() {
        pending
            .entry(&arrival.vehicle_plate)
            .or_default()
            .push_back(index);
    }

    let mut consumed = vec![false; arrivals.len()];
    let mut trips = Vec::with_capacity(records.len());

    for departure in &departures {
        let matched = pending
            .get_mut(&departure.vehicle_plate)
            .and_then(|queue| {
                // Departures come in ascending order, so an arrival at or before
                // this one can never match a later departure either.
                while let Some(&front) = queue.front() {
                    if arrivals[front].submitted_at > departure.submitted_at {
                        break;
                    }
                    queue.pop_front();
                }
                queue.pop_front()
            });

        match matched {
            Some(index) => {
                consumed[index] = true;
                trips.push(Trip::complete(
                    Arc::clone(departure),
                    Arc::clone(arrivals[index]),
                ));
            }
            None => trips.push(Trip::in_transit(Arc::clone(departure))),
        }
    }

    for (index, arrival) in arrivals.iter().enumerate() {
        if !consumed[index] {
            trips.push(Trip::arrival_only(Arc::clone(arrival)));
        }
    }

    trips.sort_by(|a, b| b.latest_timestamp.cmp(&a.latest_timestamp));

    debug!(
        records = records.len(),
        trips = trips.len(),
        complete = count(&trips, TripStatus::Complete),
        in_transit = count(&trips, TripStatus::InTransit),
        arrival_only = count(&trips, TripStatus::ArrivalOnly),
        "reconciled checklists"
    );

    trips
}

fn count(trips: &[Trip], status: TripStatus) -> usize {
    trips.iter().filter(|trip| trip.status == status).count()
}
