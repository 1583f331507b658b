use crate::Error;
use serde::{Deserialize, Serialize};

pub const WELCOME_MESSAGE: &str = "Welcome to ML-based Health Monitoring API";

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
            fields: err.fields().to_vec(),
        }
    }
}
