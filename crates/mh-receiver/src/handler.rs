//! Webhook endpoint handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::{debug, enabled, error, info, warn, Level};

use crate::ReceiverState;

/// `POST /webhook`
pub async fn receive_webhook(State(state): State<ReceiverState>, body: Bytes) -> Response {
    let payload: Map<String, Value> = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Error parsing webhook body");
            return (StatusCode::BAD_REQUEST, "Error parsing JSON").into_response();
        }
    };

    let event_type = match payload.get("type").and_then(Value::as_str) {
        Some(t) if !t.is_empty() => t,
        _ => {
            warn!("Missing or invalid 'type' field in webhook payload");
            return (StatusCode::BAD_REQUEST, "Missing event type").into_response();
        }
    };

    info!(event_type = %event_type, "Received webhook event");

    if enabled!(Level::DEBUG) {
        match serde_json::to_string_pretty(&payload) {
            Ok(pretty) => debug!("Webhook payload:\n{}", pretty),
            Err(e) => error!(error = %e, "Error formatting webhook payload"),
        }
    }

    if let Some(publisher) = &state.publisher {
        match publisher.publish(&state.channel, &body).await {
            Ok(()) => info!(channel = %state.channel, "Published webhook to Redis channel"),
            Err(e) => error!(channel = %state.channel, error = %e, "Error publishing to Redis channel"),
        }
    }

    (StatusCode::OK, "Webhook received").into_response()
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
