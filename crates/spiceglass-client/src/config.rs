//! Connection configuration for the SpiceDB gateway

use std::path::PathBuf;
use std::time::Duration;

use spiceglass_core::error::{Error, Result};

/// Default gateway endpoint for a locally provisioned SpiceDB.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8443";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables honored by [`ClientConfig::from_env`].
pub const ENDPOINT_ENV_VAR: &str = "SPICEGLASS_ENDPOINT";
pub const TOKEN_ENV_VAR: &str = "SPICEGLASS_TOKEN";
pub const CA_CERT_ENV_VAR: &str = "SPICEGLASS_CA_CERT";

/// Connection settings for [`SpiceDbClient`](crate::SpiceDbClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the SpiceDB HTTP gateway.
    pub endpoint: String,
    /// Preshared key, sent as a bearer token.
    pub token: String,
    /// Optional CA certificate (PEM) for TLS against a SpiceDB with a
    /// locally provisioned certificate.
    pub ca_cert_path: Option<PathBuf>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the default local endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
            ca_cert_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert_path = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a configuration from the environment. `SPICEGLASS_TOKEN`
    /// must be set; `SPICEGLASS_ENDPOINT` and `SPICEGLASS_CA_CERT` fall
    /// back to defaults when absent.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .map_err(|_| Error::config(format!("{TOKEN_ENV_VAR} is not set")))?;
        let mut config = Self::new(token);
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
            config.endpoint = endpoint;
        }
        if let Ok(path) = std::env::var(CA_CERT_ENV_VAR) {
            config.ca_cert_path = Some(PathBuf::from(path));
        }
        Ok(config)
    }

    /// Join an API path onto the endpoint.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_local_defaults() {
        let config = ClientConfig::new("dev_key");
        assert_eq!(config.endpoint, "http://localhost:8443");
        assert_eq!(config.token, "dev_key");
        assert_eq!(config.ca_cert_path, None);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new("dev_key")
            .with_endpoint("https://spicedb.example.com:8443")
            .with_ca_cert("/etc/spicedb/ca.crt")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.endpoint, "https://spicedb.example.com:8443");
        assert_eq!(
            config.ca_cert_path,
            Some(PathBuf::from("/etc/spicedb/ca.crt"))
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_url_joins_paths() {
        let config = ClientConfig::new("dev_key");
        assert_eq!(
            config.url("/v1/permissions/check"),
            "http://localhost:8443/v1/permissions/check"
        );

        let config = config.with_endpoint("https://spicedb.example.com/");
        assert_eq!(
            config.url("/v1/schema/read"),
            "https://spicedb.example.com/v1/schema/read"
        );
    }
}
