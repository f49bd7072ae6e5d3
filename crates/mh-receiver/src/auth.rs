//! Optional HTTP Basic authentication for the webhook endpoint
//!
//! Enabled only when both a username and a password are configured. A half
//! configured pair disables authentication rather than locking every caller
//! out.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

const REALM: &str = "Basic realm=\"webhook\"";

/// Expected Basic credentials
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl BasicAuthCredentials {
    /// Build from optional settings. Returns `None` unless both are non-empty.
    pub fn from_pair(username: Option<String>, password: Option<String>) -> Option<Self> {
        let username = username.filter(|u| !u.is_empty());
        let password = password.filter(|p| !p.is_empty());

        match (username, password) {
            (Some(username), Some(password)) => Some(Self { username, password }),
            (None, None) => None,
            _ => {
                warn!("Only one of WEBHOOK_USERNAME / WEBHOOK_PASSWORD is set; basic auth disabled");
                None
            }
        }
    }

    /// Check a raw `Authorization` header value
    pub fn verify(&self, header_value: &str) -> bool {
        let Some(encoded) = header_value.strip_prefix("Basic ") else {
            return false;
        };
        let decoded = match BASE64.decode(encoded.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Invalid base64 in Authorization header");
                return false;
            }
        };
        let Ok(credentials) = String::from_utf8(decoded) else {
            return false;
        };
        let Some((username, password)) = credentials.split_once(':') else {
            return false;
        };

        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

/// Authentication state for middleware
#[derive(Clone, Default)]
pub struct AuthState {
    pub credentials: Option<Arc<BasicAuthCredentials>>,
}

impl AuthState {
    pub fn new(credentials: Option<BasicAuthCredentials>) -> Self {
        Self {
            credentials: credentials.map(Arc::new),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Authentication middleware
pub async fn basic_auth_middleware(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(credentials) = state.credentials.as_deref() else {
        return next.run(request).await;
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| credentials.verify(h))
        .unwrap_or(false);

    if authorized {
        debug!("BasicAuth successful");
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "BasicAuth failed");
    let mut response = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(REALM));
    response
}
