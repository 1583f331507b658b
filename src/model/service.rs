use super::{Classifier, FeatureRecord, FeatureTable, ForestClassifier};
use crate::{Error, Result, config::ModelConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskStatus {
    #[serde(rename = "high risk")]
    HighRisk,
    #[serde(rename = "normal")]
    Normal,
}

impl RiskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighRisk => "high risk",
            Self::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub prediction: i64,
    pub status: RiskStatus,
}

impl PredictionOutcome {
    /// Only the binary labels 0 and 1 are meaningful for this model.
    pub fn from_label(label: i64) -> Result<Self> {
        let status = match label {
            1 => RiskStatus::HighRisk,
            0 => RiskStatus::Normal,
            other => {
                return Err(Error::inference(format!(
                    "model returned unexpected label {}",
                    other
                )));
            }
        };
        Ok(Self {
            prediction: label,
            status,
        })
    }
}

/// Read-only wrapper around the loaded classifier.
#[derive(Clone)]
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
}

impl PredictionService {
    pub fn new(classifier: impl Classifier + 'static) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }

    pub async fn from_config(config: &ModelConfig) -> Result<Self> {
        let forest = ForestClassifier::load(&config.path).await?;
        info!("Loaded model artifact: {}", config.path);
        Ok(Self::new(forest))
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionOutcome> {
        let table = FeatureTable::single(record);
        let labels = self
            .classifier
            .classify(&table)
            .map_err(|e| match e {
                Error::Inference(_) => e,
                other => Error::inference(other.to_string()),
            })?;

        let [label] = labels.as_slice() else {
            return Err(Error::inference(format!(
                "expected exactly one label for one row, got {}",
                labels.len()
            )));
        };

        let outcome = PredictionOutcome::from_label(*label)?;
        debug!("Predicted label {} ({})", outcome.prediction, outcome.status.as_str());
        Ok(outcome)
    }
}
