use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::ConfigError;

/// A webhook target that passed syntactic validation.
///
/// Must use `http://` or `https://` and carry a non-empty host. The original
/// string is kept as given and sent to the API unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookUrl(String);

impl WebhookUrl {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(ConfigError::InvalidWebhookUrl(
                "Webhook URL must start with http:// or https://".to_string(),
            ));
        }

        let parsed = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidWebhookUrl(format!("Invalid webhook URL: {}", e)))?;

        match parsed.host_str() {
            Some(host) if !host.is_empty() => Ok(Self(raw.to_string())),
            _ => Err(ConfigError::InvalidWebhookUrl(
                "Invalid webhook URL format".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for WebhookUrl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WebhookUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
