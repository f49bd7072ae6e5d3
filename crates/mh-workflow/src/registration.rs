//! Register one webhook URL against every account.

use std::io::Write;
use std::sync::Arc;

use mh_client::{MonzoApi, MonzoClient};
use mh_config::{MonzoConfig, WebhookUrl};
use tracing::{error, info, warn};

use crate::{fetch_accounts, Result, RULE};

/// Counters for one registration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    pub accounts: usize,
    pub registered: usize,
    pub failed: usize,
    /// Ids of the webhooks created, in account order. Registrations whose
    /// response had no id are counted but not listed.
    pub webhook_ids: Vec<String>,
}

impl RegistrationSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "\n{}", RULE)?;
        writeln!(out, "Summary:")?;
        writeln!(out, "  Successfully registered: {}", self.registered)?;
        writeln!(out, "  Failed to register: {}", self.failed)?;
        writeln!(out, "{}", RULE)
    }
}

pub struct RegistrationWorkflow {
    api: Arc<dyn MonzoApi>,
}

impl RegistrationWorkflow {
    pub fn new(api: Arc<dyn MonzoApi>) -> Self {
        Self { api }
    }

    pub fn from_config(config: MonzoConfig) -> mh_client::Result<Self> {
        Ok(Self::new(Arc::new(MonzoClient::new(config)?)))
    }

    /// Register `webhook_url` with every account, one request at a time.
    ///
    /// The URL is validated before any request is made. Registrations that
    /// succeed are kept even if later ones fail.
    pub async fn run<W: Write>(&self, webhook_url: &str, out: &mut W) -> Result<RegistrationSummary> {
        let webhook_url = WebhookUrl::parse(webhook_url)?;

        writeln!(out, "Monzo Webhook Registration Tool")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out, "Webhook URL: {}", webhook_url)?;

        let accounts = fetch_accounts(self.api.as_ref(), out).await?;
        let mut summary = RegistrationSummary {
            accounts: accounts.len(),
            ..Default::default()
        };

        for account in &accounts {
            writeln!(out, "\nProcessing account: {} ({})", account.display_name(), account.id)?;

            match self.api.register_webhook(&account.id, webhook_url.as_str()).await {
                Ok(webhook) => {
                    writeln!(out, "  ✓ Successfully registered webhook")?;
                    writeln!(out, "    Webhook ID: {}", webhook.display_id())?;
                    summary.registered += 1;
                    if let Some(id) = webhook.id {
                        summary.webhook_ids.push(id);
                    }
                }
                Err(e) => {
                    error!(account_id = %account.id, error = %e, "Error registering webhook for account");
                    if let Some(body) = e.response_body() {
                        error!(account_id = %account.id, response = %body, "Registration response");
                    }
                    writeln!(out, "  ✗ Failed to register webhook")?;
                    summary.failed += 1;
                }
            }
        }

        summary.write_to(out)?;

        if summary.is_clean() {
            info!(registered = summary.registered, url = %webhook_url, "Webhook registration complete");
        } else {
            warn!(
                registered = summary.registered,
                failed = summary.failed,
                url = %webhook_url,
                "Webhook registration finished with failures"
            );
        }

        Ok(summary)
    }
}
