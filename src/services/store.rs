use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::{
    models::{checklist::ChecklistRecord, trip::Trip},
    services::reconcile::reconcile,
};

/// Append-only, in-memory checklist collection.
///
/// Readers get an immutable snapshot; appends copy-on-write the record list
/// when a snapshot is still alive, so a snapshot never sees a partial append.
#[derive(Clone, Default)]
pub struct ChecklistStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    records: Arc<Vec<Arc<ChecklistRecord>>>,
    trips: Option<CachedTrips>,
}

struct CachedTrips {
    record_count: usize,
    trips: Arc<Vec<Trip>>,
}

impl ChecklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, record: ChecklistRecord) -> Arc<ChecklistRecord> {
        let record = Arc::new(record);
        let mut inner = self.inner.write().await;
        Arc::make_mut(&mut inner.records).push(Arc::clone(&record));
        inner.trips = None;
        info!(
            id = %record.id,
            kind = %record.kind,
            plate = %record.vehicle_plate,
            total = inner.records.len(),
            "checklist recorded"
        );
        record
    }

    /// Records in submission order, as of the time of the call.
    pub async fn snapshot(&self) -> Arc<Vec<Arc<ChecklistRecord>>> {
        Arc::clone(&self.inner.read().await.records)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn find(&self, id: &str) -> Option<Arc<ChecklistRecord>> {
        self.snapshot()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Reconciled trips for the current records, cached until the next append.
    pub async fn trips(&self) -> Arc<Vec<Trip>> {
        let records = {
            let inner = self.inner.read().await;
            if let Some(cached) = &inner.trips {
                return Arc::clone(&cached.trips);
            }
            Arc::clone(&inner.records)
        };

        let trips = Arc::new(reconcile(&records));

        let mut inner = self.inner.write().await;
        // Append-only: an unchanged length means no append slipped in meanwhile.
        if inner.records.len() == records.len() {
            inner.trips = Some(CachedTrips {
                record_count: records.len(),
                trips: Arc::clone(&trips),
            });
        }
        trips
    }

    pub async fn cached_trip_count(&self) -> Option<usize> {
        let inner = self.inner.read().await;
        inner
            .trips
            .as_ref()
            .filter(|cached| cached.record_count == inner.records.len())
            .map(|cached| cached.trips.len())
    }
}
