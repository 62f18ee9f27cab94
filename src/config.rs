use std::env::{self, VarError};
use std::time::Duration;

use url::Url;

pub const DEFAULT_HOST: &str = "https://api.norsktest.no";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CLIENT_ID_ENV_NAME: &str = "FINAUT_CLIENT_ID";
const CLIENT_SECRET_ENV_NAME: &str = "FINAUT_CLIENT_SECRET";
const HOST_ENV_NAME: &str = "FINAUT_API_HOST";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid host url `{0}`: `{1}`")]
    InvalidHost(String, String),
    #[error("`{0}` not provided and the `{1}` environment variable is unset")]
    MissingCredential(&'static str, &'static str),
}

/// Connection settings for a [`crate::client::FinAutClient`]. Immutable for
/// the lifetime of a client instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub host: Url,
    pub timeout: Duration,
    pub verify_ssl: bool,
    pub debug: bool,
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            host: Url::parse(DEFAULT_HOST).expect("constant valid url value"),
            timeout: DEFAULT_TIMEOUT,
            verify_ssl: true,
            debug: false,
        }
    }

    /// Builds a configuration entirely from `FINAUT_CLIENT_ID`,
    /// `FINAUT_CLIENT_SECRET` and (optionally) `FINAUT_API_HOST`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(env::var)
    }

    /// Same as [`Self::from_env`] with an injectable environment lookup.
    fn from_env_with<F>(env_var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, VarError>,
    {
        let client_id = env_var(CLIENT_ID_ENV_NAME)
            .map_err(|_| ConfigError::MissingCredential("client_id", CLIENT_ID_ENV_NAME))?;
        let client_secret = env_var(CLIENT_SECRET_ENV_NAME)
            .map_err(|_| ConfigError::MissingCredential("client_secret", CLIENT_SECRET_ENV_NAME))?;

        let config = Self::new(client_id, client_secret);
        match env_var(HOST_ENV_NAME) {
            Ok(host) => config.with_host(&host),
            Err(_) => Ok(config),
        }
    }

    pub fn with_host(self, host: &str) -> Result<Self, ConfigError> {
        let host = Url::parse(host.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidHost(host.to_string(), e.to_string()))?;
        Ok(Self { host, ..self })
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn with_verify_ssl(self, verify_ssl: bool) -> Self {
        Self { verify_ssl, ..self }
    }

    pub fn with_debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }

    /// Root of the versioned API, always with a trailing slash.
    pub fn base_url(&self) -> Url {
        self.host
            .join("/finautapi/v1/")
            .expect("relative path is valid")
    }

    /// OAuth2 client-credentials grant endpoint.
    pub fn token_url(&self) -> Url {
        self.host.join("/o/token/").expect("relative path is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn env_from<'a>(
        values: &'a HashMap<&'static str, &'static str>,
    ) -> impl Fn(&'static str) -> Result<String, VarError> + 'a {
        move |key| {
            values
                .get(key)
                .map(|v| v.to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn default_urls() {
        let config = ClientConfig::new("id", "secret");
        assert_eq!(
            config.base_url().as_str(),
            "https://api.norsktest.no/finautapi/v1/"
        );
        assert_eq!(config.token_url().as_str(), "https://api.norsktest.no/o/token/");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.verify_ssl);
        assert!(!config.debug);
    }

    #[test]
    fn host_trailing_slash_is_normalized() {
        let config = ClientConfig::new("id", "secret")
            .with_host("https://staging.norsktest.no/")
            .unwrap();
        assert_eq!(
            config.base_url().as_str(),
            "https://staging.norsktest.no/finautapi/v1/"
        );
    }

    #[test]
    fn invalid_host_is_rejected() {
        let result = ClientConfig::new("id", "secret").with_host("not a url");
        assert_matches!(result, Err(ConfigError::InvalidHost(host, _)) => {
            assert_eq!(host, "not a url");
        });
    }

    #[test]
    fn from_env_reads_credentials_and_host() {
        let values = HashMap::from([
            ("FINAUT_CLIENT_ID", "env-id"),
            ("FINAUT_CLIENT_SECRET", "env-secret"),
            ("FINAUT_API_HOST", "https://test.norsktest.no"),
        ]);
        let config = ClientConfig::from_env_with(env_from(&values)).unwrap();
        assert_eq!(config.client_id, "env-id");
        assert_eq!(config.client_secret, "env-secret");
        assert_eq!(config.host.as_str(), "https://test.norsktest.no/");
    }

    #[test]
    fn from_env_defaults_host() {
        let values = HashMap::from([
            ("FINAUT_CLIENT_ID", "env-id"),
            ("FINAUT_CLIENT_SECRET", "env-secret"),
        ]);
        let config = ClientConfig::from_env_with(env_from(&values)).unwrap();
        assert_eq!(config.host.as_str(), "https://api.norsktest.no/");
    }

    #[test]
    fn from_env_missing_secret() {
        let values = HashMap::from([("FINAUT_CLIENT_ID", "env-id")]);
        let result = ClientConfig::from_env_with(env_from(&values));
        assert_matches!(
            result,
            Err(ConfigError::MissingCredential("client_secret", "FINAUT_CLIENT_SECRET"))
        );
    }
}
