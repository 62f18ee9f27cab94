use std::sync::Arc;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use url::form_urlencoded;

use crate::error::{ErrorDetails, FinAutError};
use crate::http_client::HttpClient;
use crate::token::AccessToken;

const GRANT_TYPE: &str = "client_credentials";
const SCOPE: &str = "read write";

/// Token lifetime assumed when the endpoint leaves out `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

#[derive(Error, Debug)]
pub enum AuthenticateError {
    #[error("unable to deserialize token: `{0}`")]
    DeserializeError(String),
    #[error("token endpoint error: Status code: `{0}`, Reason: `{1}`")]
    HttpResponseError(u16, String),
    #[error("http transport error: `{0}`")]
    HttpTransportError(String),
}

impl From<AuthenticateError> for FinAutError {
    fn from(value: AuthenticateError) -> Self {
        match value {
            AuthenticateError::HttpResponseError(code, body) => {
                let details = ErrorDetails {
                    message: format!("token grant rejected: HTTP {code}"),
                    status_code: Some(code),
                    raw_body: (!body.is_empty()).then_some(body),
                };
                // Grant-endpoint 4xx (429 included) is an authentication
                // failure; only 5xx is reported as a server fault.
                if (500..600).contains(&code) {
                    FinAutError::Server(details)
                } else {
                    FinAutError::Authentication(details)
                }
            }
            AuthenticateError::HttpTransportError(e) => FinAutError::Transport(e),
            AuthenticateError::DeserializeError(e) => {
                FinAutError::Authentication(ErrorDetails::new(format!("invalid token response: {e}")))
            }
        }
    }
}

/// Performs the OAuth2 client-credentials exchange against the token endpoint.
pub trait Authenticator {
    fn authenticate(&self) -> Result<GrantResponse, AuthenticateError>;
}

pub struct HttpAuthenticator<C> {
    /// HTTP client, shared with the request pipeline.
    http_client: Arc<C>,
    /// Token endpoint URL
    token_url: Url,
    client_id: String,
    client_secret: String,
}

impl<C> HttpAuthenticator<C> {
    pub fn new(
        http_client: Arc<C>,
        token_url: Url,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            token_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn grant_body(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", GRANT_TYPE)
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret)
            .append_pair("scope", SCOPE)
            .finish()
    }
}

impl<C> Authenticator for HttpAuthenticator<C>
where
    C: HttpClient,
{
    /// POSTs the form-encoded grant request and parses the token response.
    fn authenticate(&self) -> Result<GrantResponse, AuthenticateError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.token_url.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(self.grant_body().into_bytes())
            .map_err(|e| AuthenticateError::HttpTransportError(e.to_string()))?;

        let response = self
            .http_client
            .send(request)
            .map_err(|e| AuthenticateError::HttpTransportError(e.to_string()))?;

        let body = String::from_utf8(response.body().clone()).map_err(|e| {
            AuthenticateError::DeserializeError(format!("invalid utf8 response: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(AuthenticateError::HttpResponseError(
                response.status().as_u16(),
                body,
            ));
        }

        serde_json::from_str(body.as_str())
            .map_err(|e| AuthenticateError::DeserializeError(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GrantResponse {
    pub access_token: AccessToken,
    /// The lifetime in seconds of the access token.
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN
}

#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use httpmock::{Method::POST, MockServer};
    use mockall::mock;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::client::ReqwestHttpClient;

    mock! {
        pub AuthenticatorMock {}

        impl Authenticator for AuthenticatorMock {
            fn authenticate(&self) -> Result<GrantResponse, AuthenticateError>;
        }
    }

    const TOKEN_PATH: &str = "/o/token/";

    fn authenticator_for(server: &MockServer, timeout: Duration) -> HttpAuthenticator<ReqwestHttpClient> {
        let config = ClientConfig::new("fake_id", "fake_secret")
            .with_host(&server.base_url())
            .unwrap()
            .with_timeout(timeout);
        let http_client = Arc::new(ReqwestHttpClient::new(&config).unwrap());
        HttpAuthenticator::new(http_client, config.token_url(), "fake_id", "fake_secret")
    }

    #[test]
    fn grant_succeeds() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .header("content-type", "application/x-www-form-urlencoded")
                .x_www_form_urlencoded_tuple("grant_type", "client_credentials")
                .x_www_form_urlencoded_tuple("client_id", "fake_id")
                .x_www_form_urlencoded_tuple("client_secret", "fake_secret");
            then.status(200)
                .json_body(serde_json::json!({
                    "access_token": "fake_token",
                    "token_type": "Bearer",
                    "expires_in": 3600,
                    "scope": "read write"
                }));
        });

        let authenticator = authenticator_for(&server, Duration::from_millis(500));
        let response = authenticator.authenticate().unwrap();

        assert_eq!(response.access_token, "fake_token");
        assert_eq!(response.expires_in, 3600);
        mock.assert()
    }

    #[test]
    fn grant_without_expires_in_uses_default() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(200)
                .json_body(serde_json::json!({"access_token": "fake_token"}));
        });

        let authenticator = authenticator_for(&server, Duration::from_millis(500));
        let response = authenticator.authenticate().unwrap();

        assert_eq!(response.expires_in, DEFAULT_EXPIRES_IN);
    }

    #[test]
    fn grant_timeout() {
        let timeout = Duration::from_millis(10);
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(200)
                .delay(timeout.saturating_add(Duration::from_millis(100)));
        });

        let authenticator = authenticator_for(&server, timeout);
        let error = authenticator.authenticate().unwrap_err();

        assert_matches!(error, AuthenticateError::HttpTransportError(_));
        mock.assert()
    }

    #[test]
    fn grant_deserialize_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(200)
                .body("this body should fail to be deserialized as GrantResponse");
        });

        let authenticator = authenticator_for(&server, Duration::from_millis(500));
        let error = authenticator.authenticate().unwrap_err();

        assert_matches!(error, AuthenticateError::DeserializeError(_));
        mock.assert()
    }

    #[test]
    fn grant_rejected_by_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(401)
                .json_body(serde_json::json!({"error": "invalid_client"}));
        });

        let authenticator = authenticator_for(&server, Duration::from_millis(500));
        let error = authenticator.authenticate().unwrap_err();

        assert_matches!(error, AuthenticateError::HttpResponseError(401, _));
        mock.assert()
    }

    #[test]
    fn grant_error_conversion() {
        let rejected: FinAutError =
            AuthenticateError::HttpResponseError(400, "invalid_client".into()).into();
        assert_matches!(rejected, FinAutError::Authentication(details) => {
            assert_eq!(details.status_code, Some(400));
            assert_eq!(details.raw_body.as_deref(), Some("invalid_client"));
        });

        let rate_limited: FinAutError =
            AuthenticateError::HttpResponseError(429, String::new()).into();
        assert_matches!(rate_limited, FinAutError::Authentication(_));

        let server_side: FinAutError =
            AuthenticateError::HttpResponseError(503, String::new()).into();
        assert_matches!(server_side, FinAutError::Server(_));

        let transport: FinAutError =
            AuthenticateError::HttpTransportError("connection refused".into()).into();
        assert_matches!(transport, FinAutError::Transport(_));
    }
}
