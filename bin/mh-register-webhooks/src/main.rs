//! Monzo Webhook Registration Tool
//!
//! Registers one webhook URL against every account of the token owner.
//!
//! ```text
//! register_webhooks https://example.com/webhook
//! ```
//!
//! The URL is validated before the token is read or any request is made.
//! Environment variables are the same as for `delete_webhooks`.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mh_config::{ConfigError, MonzoConfig, WebhookUrl};
use mh_workflow::RegistrationWorkflow;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Register a webhook URL with all accounts of the currently logged-in Monzo user
#[derive(Parser, Debug)]
#[command(name = "register_webhooks", version)]
#[command(after_help = "Example:\n  register_webhooks https://example.com/webhook")]
struct Args {
    /// Webhook URL (must start with http:// or https://)
    webhook_url: WebhookUrl,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = report(&e, &mut std::io::stderr());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = MonzoConfig::from_env()?;
    info!(
        api_base_url = %config.api_base_url,
        webhook_url = %args.webhook_url,
        "Starting webhook registration"
    );

    let workflow = RegistrationWorkflow::from_config(config).context("Failed to create Monzo API client")?;

    let mut stdout = std::io::stdout();
    workflow.run(args.webhook_url.as_str(), &mut stdout).await?;
    Ok(())
}

fn report<W: Write>(err: &anyhow::Error, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Error: {:#}", err)?;
    if let Some(hint) = err.downcast_ref::<ConfigError>().and_then(ConfigError::remediation) {
        writeln!(out, "\n{}", hint)?;
    }
    Ok(())
}
