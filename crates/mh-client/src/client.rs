//! HTTP client for the Monzo API
//!
//! One `reqwest::Client` per run, carrying the configured connect and request
//! timeouts on every call. Every request sends the bearer token unmodified.

use async_trait::async_trait;
use mh_common::{
    Account, AccountsResponse, RegisterWebhookRequest, RegisterWebhookResponse, RegisteredWebhook,
    Webhook, WebhooksResponse,
};
use mh_config::{AccessToken, MonzoConfig};
use reqwest::{header::AUTHORIZATION, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::MonzoApi;

/// reqwest-backed [`MonzoApi`]
pub struct MonzoClient {
    base_url: Url,
    token: AccessToken,
    client: reqwest::Client,
}

impl MonzoClient {
    pub fn new(config: MonzoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api_base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_base_url));
        }

        Ok(Self {
            base_url,
            token: config.access_token,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
    }

    /// Send a request, turning non-2xx responses into [`ApiError::Status`]
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, body = %body, "Monzo API request failed");
        Err(ApiError::status(status, body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?.text().await?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ApiError::decode(e.to_string(), body))
}

#[async_trait]
impl MonzoApi for MonzoClient {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let url = self.endpoint(&["accounts"])?;
        debug!(url = %url, "Listing accounts");

        let body: AccountsResponse = self.send_json(self.client.get(url)).await?;
        Ok(body.accounts)
    }

    async fn list_webhooks(&self, account_id: &str) -> Result<Vec<Webhook>> {
        let url = self.endpoint(&["webhooks"])?;
        debug!(account_id = %account_id, "Listing webhooks");

        let request = self.client.get(url).query(&[("account_id", account_id)]);
        let body: WebhooksResponse = self.send_json(request).await?;
        Ok(body.webhooks)
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        let url = self.endpoint(&["webhooks", webhook_id])?;
        debug!(webhook_id = %webhook_id, "Deleting webhook");

        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn register_webhook(&self, account_id: &str, url: &str) -> Result<RegisteredWebhook> {
        let endpoint = self.endpoint(&["webhooks"])?;
        debug!(account_id = %account_id, url = %url, "Registering webhook");

        let form = RegisterWebhookRequest { account_id, url };
        let body = self.send(self.client.post(endpoint).form(&form)).await?.text().await?;

        let fields: serde_json::Map<String, serde_json::Value> = decode(&body)?;
        if fields.is_empty() {
            return Err(ApiError::decode("empty registration response", body));
        }
        let response: RegisterWebhookResponse = serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| ApiError::decode(e.to_string(), body.as_str()))?;

        Ok(response.webhook.unwrap_or_default())
    }
}
