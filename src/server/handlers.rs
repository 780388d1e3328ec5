//! Request handlers

use super::error::Result;
use super::AppState;
use crate::app::{credit_form, predict_record, CreditRecord, FormField, Prediction};
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model_version": state.artifact.version,
        "model_created_at": state.artifact.created_at.to_rfc3339(),
    }))
}

/// GET /schema — the form fields the demo front-end renders
pub async fn schema() -> Json<Vec<FormField>> {
    Json(credit_form())
}

/// POST /predict — score one application record
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(record): Json<CreditRecord>,
) -> Result<Json<Prediction>> {
    let prediction = predict_record(&state.artifact.pipeline, &record)?;
    info!(
        label = %prediction.label,
        probability = prediction.probability,
        "Scored application"
    );
    Ok(Json(prediction))
}
