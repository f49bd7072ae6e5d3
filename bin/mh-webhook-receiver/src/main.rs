//! Monzo Webhook Receiver
//!
//! Receives Monzo webhook events on `POST /webhook` and publishes the raw
//! payload to a Redis channel. Runs without Redis if it is unreachable at
//! start-up.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PORT` | `8080` | Listen port |
//! | `CONFIG_FILE` | `config.json` | JSON file with the Redis `channel` |
//! | `REDIS_HOST` | `localhost` | Redis host |
//! | `REDIS_PORT` | `6379` | Redis port |
//! | `REDIS_PASSWORD` | - | Redis password |
//! | `WEBHOOK_USERNAME` | - | Basic auth username (needs password too) |
//! | `WEBHOOK_PASSWORD` | - | Basic auth password (needs username too) |
//! | `RUST_LOG` | `info` | Log filter; `LOG_LEVEL` is used when unset |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mh_receiver::{
    create_router, AuthState, BasicAuthCredentials, EventConfig, EventPublisher, ReceiverState,
    RedisConfig, RedisPublisher,
};

/// Monzo Webhook Receiver
#[derive(Parser, Debug)]
#[command(name = "webhook_receiver", version)]
struct Args {
    /// Listen port
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Event configuration file
    #[arg(long, env = "CONFIG_FILE", default_value = "config.json")]
    config_file: PathBuf,

    #[arg(long, env = "REDIS_HOST", default_value = "localhost")]
    redis_host: String,

    #[arg(long, env = "REDIS_PORT", default_value = "6379")]
    redis_port: u16,

    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    redis_password: Option<String>,

    #[arg(long, env = "WEBHOOK_USERNAME")]
    webhook_username: Option<String>,

    #[arg(long, env = "WEBHOOK_PASSWORD", hide_env_values = true)]
    webhook_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting Monzo Webhook Receiver");

    let event_config = EventConfig::load(&args.config_file).inspect_err(|_| {
        error!("Please create a configuration file with the channel name");
    })?;
    info!(
        path = %args.config_file.display(),
        channel = %event_config.channel,
        "Loaded event configuration"
    );

    let redis_config = RedisConfig {
        host: args.redis_host,
        port: args.redis_port,
        password: args.redis_password,
    };
    let publisher: Option<Arc<dyn EventPublisher>> = match RedisPublisher::connect(&redis_config).await {
        Ok(publisher) => Some(Arc::new(publisher)),
        Err(e) => {
            warn!(address = %redis_config.address(), error = %e, "Could not connect to Redis");
            warn!("Redis publishing will be disabled. Webhook will continue to work without Redis.");
            None
        }
    };

    let credentials = BasicAuthCredentials::from_pair(args.webhook_username, args.webhook_password);
    let auth = AuthState::new(credentials);
    if auth.is_enabled() {
        info!("Basic authentication enabled for /webhook");
    } else {
        info!("Basic authentication disabled");
    }

    let app = create_router(ReceiverState::new(event_config.channel, publisher), auth)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Webhook receiver listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webhook receiver shutdown complete");
    Ok(())
}

/// `RUST_LOG` when set, otherwise `LOG_LEVEL`, otherwise `info`
fn log_filter() -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = std::env::var("LOG_LEVEL").ok();
    EnvFilter::new(level_directive(level.as_deref()))
}

fn level_directive(level: Option<&str>) -> &'static str {
    match level.map(|l| l.trim().to_ascii_uppercase()).as_deref() {
        Some("DEBUG") => "debug",
        Some("WARN") => "warn",
        Some("ERROR") => "error",
        _ => "info",
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
