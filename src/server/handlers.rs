use super::session::StreamingSession;
use super::types::{ErrorResponse, WELCOME_MESSAGE, WelcomeResponse};
use crate::{
    Error,
    model::{FeatureRecord, PredictionOutcome, PredictionService},
};
use axum::{
    extract::{State, WebSocketUpgrade, rejection::JsonRejection},
    http::StatusCode,
    response::{Json, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionOutcome>, (StatusCode, Json<ErrorResponse>)> {
    let Json(body) = body.map_err(|rejection| {
        warn!("Rejected unreadable prediction body: {}", rejection.body_text());
        rejection_response(&rejection)
    })?;

    let record = FeatureRecord::from_value(&body).map_err(|e| {
        warn!("Rejected prediction request: {}", e);
        error_response(&e)
    })?;

    match state.service.predict(&record) {
        Ok(outcome) => {
            info!(
                "Prediction served: {} ({})",
                outcome.prediction,
                outcome.status.as_str()
            );
            Ok(Json(outcome))
        }
        Err(e) => {
            error!("Failed to run prediction: {}", e);
            Err(error_response(&e))
        }
    }
}

pub async fn ws_predict(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| async move {
        StreamingSession::new(socket, state.service).run().await;
    })
}

/// Keeps extractor rejections (bad JSON, wrong content type) in the JSON error shape.
fn rejection_response(rejection: &JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    let err = Error::parse(rejection.body_text());
    (rejection.status(), Json(ErrorResponse::from(&err)))
}

fn error_response(err: &Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        Error::Parse(_) => StatusCode::BAD_REQUEST,
        Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::from(err)))
}
