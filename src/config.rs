//! Client configuration

use crate::error::{ClientError, Result};
use std::time::Duration;
use url::Url;

pub const ENV_API_URL: &str = "MEMBER_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEMBER_API_TIMEOUT_SECS";

/// Configuration for the member API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the web application, e.g. `http://localhost:8080`
    pub base_url: String,

    /// Prefix of every REST endpoint. Default: `/api`
    pub api_prefix: String,

    /// Login endpoint, served outside the API prefix. Default: `/dev-login`
    pub login_endpoint: String,

    /// Route users are sent to after an authentication failure. Default: `/login`
    pub login_route: String,

    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_prefix: "/api".to_string(),
            login_endpoint: "/dev-login".to_string(),
            login_route: "/login".to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `MEMBER_API_URL` and `MEMBER_API_TIMEOUT_SECS`, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var(ENV_API_URL) {
            config.base_url = base_url;
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|e| {
                ClientError::Configuration(format!("{ENV_TIMEOUT_SECS}={raw} is not a number: {e}"))
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).map_err(|e| {
            ClientError::Configuration(format!("Invalid base URL {}: {e}", self.base_url))
        })?;

        for (field, value) in [
            ("api_prefix", &self.api_prefix),
            ("login_endpoint", &self.login_endpoint),
            ("login_route", &self.login_route),
        ] {
            if !value.starts_with('/') {
                return Err(ClientError::Configuration(format!(
                    "{field} must start with '/', got {value:?}"
                )));
            }
        }

        Ok(())
    }

    /// Absolute URL of an API endpoint such as `/curriculum?name=x`
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.origin(), self.api_prefix, endpoint)
    }

    pub fn login_url(&self) -> String {
        format!("{}{}", self.origin(), self.login_endpoint)
    }

    fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = ClientConfig::new("http://localhost:8080/");
        assert_eq!(config.api_url("/curriculum"), "http://localhost:8080/api/curriculum");
        assert_eq!(config.login_url(), "http://localhost:8080/dev-login");
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::new("not a url").validate().is_err());

        let config = ClientConfig {
            api_prefix: "api".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ClientError::Configuration(_))));
    }

    // the only test touching these variables, so the steps run in order
    #[test]
    fn test_from_env() {
        std::env::set_var(ENV_API_URL, "http://api.example.test");
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));

        std::env::set_var(ENV_TIMEOUT_SECS, "0");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://api.example.test");
        assert!(config.timeout.is_none());

        std::env::set_var(ENV_TIMEOUT_SECS, "5");
        assert_eq!(ClientConfig::from_env().unwrap().timeout, Some(Duration::from_secs(5)));

        std::env::remove_var(ENV_TIMEOUT_SECS);
        std::env::remove_var(ENV_API_URL);
        assert_eq!(ClientConfig::from_env().unwrap().timeout, ClientConfig::default().timeout);
    }
}
