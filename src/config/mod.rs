use std::env;
use std::time::Duration;

use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";

#[derive(Clone, PartialEq, Eq)]
pub struct PartnerCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Unset leaves reqwest's default behaviour in place.
    pub request_timeout: Option<Duration>,
    pub partner_credentials: Option<PartnerCredentials>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = var("API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let request_timeout =
            var("API_TIMEOUT_SECS").and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(e) => {
                    warn!("Config: Invalid API_TIMEOUT_SECS '{}': {}", raw, e);
                    None
                }
            });

        let partner_credentials = match (var("PARTNER_EMAIL"), var("PARTNER_PASSWORD")) {
            (Some(email), Some(password)) if !email.trim().is_empty() => Some(PartnerCredentials {
                email: email.trim().to_string(),
                password,
            }),
            _ => None,
        };

        Self {
            api_base_url,
            request_timeout,
            partner_credentials,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}
