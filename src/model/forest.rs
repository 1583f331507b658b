use super::{Classifier, FEATURE_COUNT, FeatureTable};
use crate::{Error, Result};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::Path;
use tracing::debug;

pub type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Random forest trained with smartcore and stored as JSON.
pub struct ForestClassifier {
    forest: Forest,
}

impl ForestClassifier {
    pub fn new(forest: Forest) -> Self {
        Self { forest }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading model artifact from: {}", path.display());

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::model(format!("cannot read model artifact {}: {}", path.display(), e))
        })?;

        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let forest: Forest = serde_json::from_slice(bytes)
            .map_err(|e| Error::model(format!("invalid model artifact: {}", e)))?;
        Ok(Self::new(forest))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.forest)?)
    }
}

impl Classifier for ForestClassifier {
    fn classify(&self, table: &FeatureTable) -> Result<Vec<i64>> {
        if table.is_empty() {
            return Ok(Vec::new());
        }

        let x = DenseMatrix::new(table.len(), FEATURE_COUNT, table.to_row_major(), false);
        let labels = self
            .forest
            .predict(&x)
            .map_err(|e| Error::inference(e.to_string()))?;

        Ok(labels.into_iter().map(i64::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smartcore::ensemble::random_forest_classifier::RandomForestClassifierParameters;

    // Every column moves with the label so any sampled split separates the classes.
    fn train() -> Forest {
        let mut values = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let high = i % 2 == 1;
            let base = if high { 100.0 } else { 0.0 };
            values.extend((0..FEATURE_COUNT).map(|c| base + (i + c) as f64 % 7.0));
            labels.push(u32::from(high));
        }
        let x = DenseMatrix::new(40, FEATURE_COUNT, values, false);
        RandomForestClassifier::fit(
            &x,
            &labels,
            RandomForestClassifierParameters::default().with_n_trees(5),
        )
        .unwrap()
    }

    #[test]
    fn test_classify_after_json_round_trip() {
        let original = ForestClassifier::new(train());
        let restored = ForestClassifier::from_slice(original.to_json().unwrap().as_bytes()).unwrap();

        let table = FeatureTable::new(vec![[1.0; FEATURE_COUNT], [103.0; FEATURE_COUNT]]);
        assert_eq!(restored.classify(&table).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_garbage_artifact_is_model_error() {
        let err = ForestClassifier::from_slice(b"not a forest").err().unwrap();
        assert_eq!(err.kind(), "model");
    }
}
