use crate::{config::AppConfig, services::store::ChecklistStore};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: ChecklistStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: ChecklistStore) -> Self {
        Self { config, store }
    }
}
