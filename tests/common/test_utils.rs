use health_monitor::{
    model::{Classifier, FEATURE_COUNT, FEATURE_NAMES, ForestClassifier, PredictionService},
};
use serde_json::{Value, json};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// The example patient used throughout the docs.
pub fn sample_payload() -> Value {
    json!({
        "age": 54,
        "sex": 1,
        "bp": 130,
        "chol": 246,
        "fbs": 0,
        "restecg": 0,
        "exng": 0,
        "temperature": 98.6,
        "o2": 97.5,
        "hr": 72
    })
}

pub fn payload_with_age(age: i64) -> Value {
    let mut payload = sample_payload();
    payload["age"] = json!(age);
    payload
}

pub fn payload_without(field: &str) -> Value {
    let mut payload = sample_payload();
    payload.as_object_mut().unwrap().remove(field);
    payload
}

pub fn service_with(classifier: impl Classifier + 'static) -> Arc<PredictionService> {
    Arc::new(PredictionService::new(classifier))
}

pub fn all_field_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|f| f.to_string()).collect()
}

/// Trains a small forest on two well separated clusters.
pub fn train_forest() -> ForestClassifier {
    let mut values = Vec::new();
    let mut labels = Vec::new();
    for i in 0..60 {
        let high = i % 3 == 0;
        let base = if high { 200.0 } else { 10.0 };
        values.extend((0..FEATURE_COUNT).map(|c| base + ((i * 7 + c) % 11) as f64));
        labels.push(u32::from(high));
    }

    let x = DenseMatrix::new(60, FEATURE_COUNT, values, false);
    let forest = RandomForestClassifier::fit(
        &x,
        &labels,
        RandomForestClassifierParameters::default().with_n_trees(8),
    )
    .unwrap();

    ForestClassifier::new(forest)
}

/// Writes a trained forest artifact into a fresh temp directory.
pub fn write_forest_artifact() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("model.json");
    std::fs::write(&path, train_forest().to_json().unwrap()).unwrap();
    (dir, path)
}

pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9100
  logs:
    level: "debug"

model:
  path: "/models/heart.json"

keepalive:
  url: "https://health.example.com/"
  initial_delay_secs: 5
  interval_secs: 120
"#;
