use serde::{Deserialize, Serialize};

// ============================================================================
// Core Types
// ============================================================================

/// An account owned by the authenticated user.
///
/// Fetched fresh on every run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: Some(description.into()),
        }
    }

    /// Description for display, `Unknown` when the API sent none
    pub fn display_name(&self) -> &str {
        self.description.as_deref().unwrap_or("Unknown")
    }
}

/// A webhook registered against a single account.
///
/// Snapshot taken at listing time; the live registration may have changed
/// by the time it is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Webhook {
    pub fn new(id: impl Into<String>, account_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account_id: Some(account_id.into()),
            url: Some(url.into()),
        }
    }

    pub fn display_url(&self) -> &str {
        self.url.as_deref().unwrap_or("Unknown URL")
    }
}

// ============================================================================
// API Envelopes
// ============================================================================

/// Body of `GET /accounts`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Body of `GET /webhooks?account_id=...`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhooksResponse {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

/// The webhook echoed back by `POST /webhooks`.
///
/// Every field is optional; a created webhook is still reported when the
/// API leaves out its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredWebhook {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RegisteredWebhook {
    pub fn new(id: impl Into<String>, account_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            account_id: Some(account_id.into()),
            url: Some(url.into()),
        }
    }

    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("Unknown")
    }
}

/// Body of `POST /webhooks`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterWebhookResponse {
    #[serde(default)]
    pub webhook: Option<RegisteredWebhook>,
}

/// Form fields sent to `POST /webhooks`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterWebhookRequest<'a> {
    pub account_id: &'a str,
    pub url: &'a str,
}
