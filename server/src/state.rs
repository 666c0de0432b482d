use std::sync::Arc;

use analyzer::FeatureScaler;
use classifier::Classify;
use codec::Ingest;

/// Shared, read-only service state constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classify>,
    pub scaler: Arc<FeatureScaler>,
    pub ingest: Arc<Ingest>,
}

impl AppState {
    #[must_use]
    pub fn new(classifier: Arc<dyn Classify>, scaler: FeatureScaler, ingest: Ingest) -> Self {
        Self {
            classifier,
            scaler: Arc::new(scaler),
            ingest: Arc::new(ingest),
        }
    }
}
