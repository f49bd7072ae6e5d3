//! Monzo Webhook Receiver
//!
//! The endpoint a registered webhook URL points at:
//! - `POST /webhook`: validates the event, logs it and publishes the raw body
//! - `GET /health`: liveness, never authenticated
//!
//! Basic authentication on `/webhook` is optional; see [`auth`].

use std::path::Path;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use thiserror::Error;

pub mod auth;
pub mod handler;
pub mod publisher;

pub use auth::{AuthState, BasicAuthCredentials};
pub use publisher::{EventPublisher, PublishError, RedisConfig, RedisPublisher};

#[derive(Error, Debug)]
pub enum ReceiverError {
    #[error("Error loading configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where received events are published
#[derive(Debug, Clone, Deserialize)]
pub struct EventConfig {
    pub channel: String,
}

impl EventConfig {
    pub fn load(path: &Path) -> Result<Self, ReceiverError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ReceiverError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ReceiverError::Json { path: display, source })
    }
}

/// Shared state for the webhook handler
#[derive(Clone)]
pub struct ReceiverState {
    pub channel: Arc<str>,
    /// `None` when Redis was unreachable at start-up
    pub publisher: Option<Arc<dyn EventPublisher>>,
}

impl ReceiverState {
    pub fn new(channel: impl Into<String>, publisher: Option<Arc<dyn EventPublisher>>) -> Self {
        Self {
            channel: Arc::from(channel.into()),
            publisher,
        }
    }
}

/// Build the receiver router
pub fn create_router(state: ReceiverState, auth_state: AuthState) -> Router {
    let webhook = Router::new()
        .route("/webhook", post(handler::receive_webhook))
        .route_layer(middleware::from_fn_with_state(auth_state, auth::basic_auth_middleware))
        .with_state(state);

    Router::new()
        .route("/health", get(handler::health))
        .merge(webhook)
}
