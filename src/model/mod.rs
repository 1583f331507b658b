pub mod forest;
pub mod record;
pub mod service;

pub use forest::ForestClassifier;
pub use record::{FEATURE_COUNT, FEATURE_NAMES, FeatureRecord};
pub use service::{PredictionOutcome, PredictionService, RiskStatus};

use crate::Result;

/// Row-major model input whose columns are `FEATURE_NAMES`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FeatureTable {
    pub fn new(rows: Vec<[f64; FEATURE_COUNT]>) -> Self {
        Self { rows }
    }

    pub fn single(record: &FeatureRecord) -> Self {
        Self::new(vec![record.to_row()])
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }

    pub fn rows(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_row_major(&self) -> Vec<f64> {
        self.rows.iter().flatten().copied().collect()
    }
}

/// A trained classifier returning one label per table row.
///
/// Implementations are shared across every request and session, so `classify`
/// must not mutate the model.
pub trait Classifier: Send + Sync {
    fn classify(&self, table: &FeatureTable) -> Result<Vec<i64>>;
}
