//! Monzo API Client
//!
//! The four account/webhook calls the workflows are built from, behind the
//! [`MonzoApi`] trait so they can be exercised without a live API.

use async_trait::async_trait;
use mh_common::{Account, RegisteredWebhook, Webhook};

pub mod client;
pub mod error;

pub use client::MonzoClient;
pub use error::{ApiError, ApiErrorKind, Result};

/// Accounts and webhooks operations of the Monzo API
#[async_trait]
pub trait MonzoApi: Send + Sync {
    /// `GET /accounts`, in server order
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// `GET /webhooks?account_id=<id>`, in server order
    async fn list_webhooks(&self, account_id: &str) -> Result<Vec<Webhook>>;

    /// `DELETE /webhooks/<id>`
    async fn delete_webhook(&self, webhook_id: &str) -> Result<()>;

    /// `POST /webhooks`, returning the created webhook.
    ///
    /// Any non-empty JSON object from a 2xx counts as created, even when it
    /// carries no webhook id.
    async fn register_webhook(&self, account_id: &str, url: &str) -> Result<RegisteredWebhook>;
}
