use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::recommendation::dataset::CareerDataset;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable career dataset. Default: CsvCareerDataset over `CAREER_DATASET_PATH`.
    pub career_dataset: Arc<dyn CareerDataset>,
}
