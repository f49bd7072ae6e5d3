//! Delete every webhook registered against every account.

use std::io::Write;
use std::sync::Arc;

use mh_client::{MonzoApi, MonzoClient};
use mh_common::Account;
use mh_config::MonzoConfig;
use tracing::{error, info, warn};

use crate::{fetch_accounts, Result, RULE};

/// Counters for one deletion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    pub accounts: usize,
    /// Accounts whose webhooks could not be listed
    pub accounts_skipped: usize,
    /// Webhooks listed across all accounts
    pub found: usize,
    pub deleted: usize,
}

impl DeletionSummary {
    pub fn failed(&self) -> usize {
        self.found - self.deleted
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.accounts_skipped == 0
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "\n{}", RULE)?;
        writeln!(out, "Summary:")?;
        writeln!(out, "  Total webhooks found: {}", self.found)?;
        writeln!(out, "  Successfully deleted: {}", self.deleted)?;
        writeln!(out, "  Failed to delete: {}", self.failed())?;
        if self.accounts_skipped > 0 {
            writeln!(out, "  Accounts skipped: {}", self.accounts_skipped)?;
        }
        writeln!(out, "{}", RULE)
    }
}

pub struct DeletionWorkflow {
    api: Arc<dyn MonzoApi>,
}

impl DeletionWorkflow {
    pub fn new(api: Arc<dyn MonzoApi>) -> Self {
        Self { api }
    }

    pub fn from_config(config: MonzoConfig) -> mh_client::Result<Self> {
        Ok(Self::new(Arc::new(MonzoClient::new(config)?)))
    }

    /// Delete all webhooks of all accounts, one request at a time.
    ///
    /// Only an account fetch failure (or no accounts) is an error; listing
    /// and deletion failures are counted in the summary.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<DeletionSummary> {
        writeln!(out, "Monzo Webhook Deletion Tool")?;
        writeln!(out, "{}", RULE)?;

        let accounts = fetch_accounts(self.api.as_ref(), out).await?;
        let mut summary = DeletionSummary {
            accounts: accounts.len(),
            ..Default::default()
        };

        for account in &accounts {
            self.process_account(account, &mut summary, out).await?;
        }

        summary.write_to(out)?;

        if summary.is_clean() {
            info!(found = summary.found, deleted = summary.deleted, "Webhook deletion complete");
        } else {
            warn!(
                found = summary.found,
                deleted = summary.deleted,
                failed = summary.failed(),
                accounts_skipped = summary.accounts_skipped,
                "Webhook deletion finished with failures"
            );
        }

        Ok(summary)
    }

    async fn process_account<W: Write>(
        &self,
        account: &Account,
        summary: &mut DeletionSummary,
        out: &mut W,
    ) -> Result<()> {
        writeln!(out, "\nProcessing account: {} ({})", account.display_name(), account.id)?;

        let webhooks = match self.api.list_webhooks(&account.id).await {
            Ok(webhooks) => webhooks,
            Err(e) => {
                error!(account_id = %account.id, error = %e, "Error listing webhooks for account");
                writeln!(out, "  Could not list webhooks for this account")?;
                summary.accounts_skipped += 1;
                return Ok(());
            }
        };

        if webhooks.is_empty() {
            writeln!(out, "  No webhooks found for this account")?;
            return Ok(());
        }

        writeln!(out, "  Found {} webhook(s)", webhooks.len())?;
        summary.found += webhooks.len();

        for webhook in &webhooks {
            writeln!(out, "    Deleting webhook: {}", webhook.id)?;
            writeln!(out, "      URL: {}", webhook.display_url())?;

            match self.api.delete_webhook(&webhook.id).await {
                Ok(()) => {
                    writeln!(out, "      ✓ Successfully deleted")?;
                    summary.deleted += 1;
                }
                Err(e) => {
                    error!(webhook_id = %webhook.id, error = %e, "Error deleting webhook");
                    writeln!(out, "      ✗ Failed to delete")?;
                }
            }
        }

        Ok(())
    }
}
