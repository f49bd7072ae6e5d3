//! Monzo Webhook Workflows
//!
//! Sequential reconciliation of webhooks across every account the token can
//! see:
//! - DeletionWorkflow: list every account's webhooks and delete them
//! - RegistrationWorkflow: register one URL against every account
//!
//! Both run `START → ACCOUNTS_FETCHED → (per account)* → SUMMARY`, or end in
//! `ABORTED` when the accounts cannot be fetched or there are none. Failures
//! for a single account or webhook are logged, counted and skipped; they never
//! abort a run.
//!
//! Progress and the summary go to the writer passed to `run`; failures are
//! reported through `tracing`.

use std::io::Write;

use mh_client::{ApiError, MonzoApi};
use mh_common::Account;
use mh_config::ConfigError;
use thiserror::Error;
use tracing::{error, info};

pub mod deletion;
pub mod registration;

#[cfg(test)]
pub(crate) mod mock;

pub use deletion::{DeletionSummary, DeletionWorkflow};
pub use registration::{RegistrationSummary, RegistrationWorkflow};

pub(crate) const RULE: &str = "==================================================";

/// Errors that end a run before it reaches its summary
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Error listing accounts: {0}")]
    AccountsUnavailable(#[source] ApiError),

    #[error("No accounts found")]
    NoAccounts,

    #[error("Failed to write progress output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Fetch the accounts a run iterates over.
///
/// A failed call or an empty list aborts the run.
pub(crate) async fn fetch_accounts<W: Write>(api: &dyn MonzoApi, out: &mut W) -> Result<Vec<Account>> {
    writeln!(out, "\nFetching accounts...")?;

    let accounts = api.list_accounts().await.map_err(|e| {
        error!(error = %e, "Error listing accounts");
        WorkflowError::AccountsUnavailable(e)
    })?;

    if accounts.is_empty() {
        writeln!(out, "No accounts found.")?;
        info!("No accounts found, nothing to do");
        return Err(WorkflowError::NoAccounts);
    }

    writeln!(out, "Found {} account(s)", accounts.len())?;
    info!(accounts = accounts.len(), "Fetched accounts");
    Ok(accounts)
}
