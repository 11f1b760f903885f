// POST /predict: classify one article.
//
// Body: a JSON object with an optional "text" field. A missing or
// non-string "text" is classified as empty text. Bodies that are not a JSON
// object get a 400 and the server keeps serving.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{info, warn};

use crate::web::{api_error, AppState};

pub async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Rejected /predict body that is not JSON");
            return api_error(StatusCode::BAD_REQUEST, "Request body must be a JSON object");
        }
    };

    let Some(fields) = payload.as_object() else {
        warn!("Rejected /predict body that is not a JSON object");
        return api_error(StatusCode::BAD_REQUEST, "Request body must be a JSON object");
    };

    let result = state.predictor.predict_value(fields.get("text"));
    info!(
        prediction = %result.prediction,
        confidence = result.confidence,
        "Prediction served"
    );
    Json(result).into_response()
}
