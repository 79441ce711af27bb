use serde::Deserialize;

use crate::sync::LookupFailurePolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub hubspot_base_url: String,
    pub hubspot_api_key: String,
    /// How the reconciler treats a failed remote lookup.
    #[serde(default)]
    pub lookup_failure_policy: LookupFailurePolicy,
    /// Per-request timeout for remote calls, in seconds.
    pub remote_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let hubspot_api_key = std::env::var("HUBSPOT_API_KEY")
            .map_err(|_| config::ConfigError::NotFound("HUBSPOT_API_KEY".to_string()))?;

        let lookup_failure_policy = match std::env::var("SYNC_LOOKUP_POLICY") {
            Ok(raw) => raw.parse().map_err(config::ConfigError::Message)?,
            Err(_) => LookupFailurePolicy::default(),
        };

        let remote_timeout_secs = match std::env::var("REMOTE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| config::ConfigError::Message(format!("invalid REMOTE_TIMEOUT_SECS: {}", raw)))?,
            Err(_) => 10,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/invoicedb".to_string()),
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            hubspot_base_url: std::env::var("HUBSPOT_BASE_URL")
                .unwrap_or_else(|_| "https://api.hubapi.com".to_string()),
            hubspot_api_key,
            lookup_failure_policy,
            remote_timeout_secs,
        })
    }
}
