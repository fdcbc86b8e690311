use std::sync::Arc;

use common::Gazetteer;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use crate::config::AppConfig;

/// Gazetteer shared between requests. Lookups populate the index lazily, so
/// access is serialized.
pub type SharedGazetteer = Arc<Mutex<dyn Gazetteer>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub gazetteer: SharedGazetteer,
}

impl AppState {
    pub fn new<G: Gazetteer + 'static>(
        db: DatabaseConnection,
        config: AppConfig,
        gazetteer: G,
    ) -> Self {
        Self {
            db,
            config,
            gazetteer: Arc::new(Mutex::new(gazetteer)),
        }
    }
}
