//! In-memory MonzoApi for workflow tests

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use mh_client::{ApiError, MonzoApi, Result};
use mh_common::{Account, RegisteredWebhook, Webhook};
use parking_lot::Mutex;
use reqwest::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListAccounts,
    ListWebhooks(String),
    DeleteWebhook(String),
    RegisterWebhook { account_id: String, url: String },
}

#[derive(Default)]
pub struct MockApi {
    accounts: Option<Vec<Account>>,
    webhooks: HashMap<String, Vec<Webhook>>,
    failing_listings: HashSet<String>,
    failing_deletes: HashSet<String>,
    failing_registrations: HashSet<String>,
    anonymous_registrations: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl MockApi {
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Some(accounts),
            ..Default::default()
        }
    }

    /// Account listing always fails
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn webhooks(mut self, account_id: &str, ids: &[&str]) -> Self {
        let hooks = ids
            .iter()
            .map(|id| Webhook::new(*id, account_id, format!("https://hooks.example/{}", id)))
            .collect();
        self.webhooks.insert(account_id.to_string(), hooks);
        self
    }

    pub fn fail_listing(mut self, account_id: &str) -> Self {
        self.failing_listings.insert(account_id.to_string());
        self
    }

    pub fn fail_delete(mut self, webhook_id: &str) -> Self {
        self.failing_deletes.insert(webhook_id.to_string());
        self
    }

    pub fn fail_registration(mut self, account_id: &str) -> Self {
        self.failing_registrations.insert(account_id.to_string());
        self
    }

    /// Registration succeeds but the response carries no webhook id
    pub fn register_without_id(mut self, account_id: &str) -> Self {
        self.anonymous_registrations.insert(account_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl MonzoApi for MockApi {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.record(Call::ListAccounts);
        self.accounts
            .clone()
            .ok_or_else(|| ApiError::status(StatusCode::UNAUTHORIZED, "unauthorized"))
    }

    async fn list_webhooks(&self, account_id: &str) -> Result<Vec<Webhook>> {
        self.record(Call::ListWebhooks(account_id.to_string()));
        if self.failing_listings.contains(account_id) {
            return Err(ApiError::status(StatusCode::INTERNAL_SERVER_ERROR, "boom"));
        }
        Ok(self.webhooks.get(account_id).cloned().unwrap_or_default())
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        self.record(Call::DeleteWebhook(webhook_id.to_string()));
        if self.failing_deletes.contains(webhook_id) {
            return Err(ApiError::status(StatusCode::NOT_FOUND, ""));
        }
        Ok(())
    }

    async fn register_webhook(&self, account_id: &str, url: &str) -> Result<RegisteredWebhook> {
        self.record(Call::RegisterWebhook {
            account_id: account_id.to_string(),
            url: url.to_string(),
        });
        if self.failing_registrations.contains(account_id) {
            return Err(ApiError::status(StatusCode::BAD_REQUEST, "bad_request.bad_param.url"));
        }
        if self.anonymous_registrations.contains(account_id) {
            return Ok(RegisteredWebhook::default());
        }
        Ok(RegisteredWebhook::new(format!("webhook_{}", account_id), account_id, url))
    }
}
