use crate::aggregate::TrendScope;
use crate::dataset::Dataset;
use std::sync::Arc;

/// Shared, read-only request state. The dataset never changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub trend_scope: TrendScope,
    pub title: Arc<str>,
}

impl AppState {
    pub fn new(dataset: Dataset, trend_scope: TrendScope, title: impl Into<Arc<str>>) -> Self {
        Self {
            dataset: Arc::new(dataset),
            trend_scope,
            title: title.into(),
        }
    }
}
