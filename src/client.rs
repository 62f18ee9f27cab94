use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::authenticator::HttpAuthenticator;
use crate::config::ClientConfig;
use crate::error::{ErrorDetails, FinAutError};
use crate::http::client::{HttpBuildError, ReqwestHttpClient};
use crate::http_client::{HttpClient, HttpClientError};
use crate::request::CallDescriptor;
use crate::resources::{
    CompanyResource, CompetencyResultResource, DepartmentResource, EmploymentResource,
    ResultResource, UserResource, UserStatusResource,
};
use crate::token_manager::TokenManager;

/// Per-call attempt state. The single-retry guarantee of the pipeline lives
/// here: `Retry` is terminal for a 401.
enum Attempt {
    First,
    Retry,
}

/// Client for the FinAut API: builds authenticated requests, executes them,
/// and re-authenticates at most once when a call comes back 401.
pub struct FinAutClient<C = ReqwestHttpClient>
where
    C: HttpClient,
{
    base_url: Url,
    transport: Arc<C>,
    tokens: TokenManager<HttpAuthenticator<C>>,
}

impl FinAutClient<ReqwestHttpClient> {
    pub fn new(config: ClientConfig) -> Result<Self, HttpBuildError> {
        let transport = ReqwestHttpClient::new(&config)?;
        Ok(Self::with_transport(&config, transport))
    }
}

impl<C> FinAutClient<C>
where
    C: HttpClient,
{
    /// Wires the pipeline around an arbitrary transport. The same transport
    /// instance serves both the token grants and the API calls.
    pub fn with_transport(config: &ClientConfig, transport: C) -> Self {
        let transport = Arc::new(transport);
        let authenticator = HttpAuthenticator::new(
            Arc::clone(&transport),
            config.token_url(),
            config.client_id.as_str(),
            config.client_secret.as_str(),
        );
        Self {
            base_url: config.base_url(),
            transport,
            tokens: TokenManager::new(authenticator),
        }
    }

    /// Executes one call descriptor: bearer token, dispatch, and translation
    /// of the response into a payload or a typed failure. A 401 on the first
    /// attempt invalidates the token and retries exactly once.
    pub fn request(&self, descriptor: CallDescriptor) -> Result<Value, FinAutError> {
        let mut attempt = Attempt::First;
        loop {
            let token = self.tokens.get_valid_token()?;
            let request = descriptor.to_http_request(&self.base_url, &token)?;
            debug!(method = %request.method(), uri = %request.uri(), "sending API request");

            let response = self.transport.send(request).map_err(|e| match e {
                HttpClientError::TransportError(msg) => FinAutError::Transport(msg),
                HttpClientError::InvalidResponse(msg) => {
                    FinAutError::Unexpected(ErrorDetails::new(msg))
                }
            })?;

            let status = response.status();
            debug!(status = %status, "received API response");

            if status == StatusCode::UNAUTHORIZED {
                if let Attempt::First = attempt {
                    debug!("got 401 with a locally valid token, re-authenticating once");
                    self.tokens.invalidate();
                    attempt = Attempt::Retry;
                    continue;
                }
                return Err(FinAutError::from_response(
                    status,
                    response.headers(),
                    response.body(),
                ));
            }

            if status.is_success() {
                return parse_payload(response.body());
            }

            return Err(FinAutError::from_response(
                status,
                response.headers(),
                response.body(),
            ));
        }
    }

    pub fn get(&self, path: impl Into<String>) -> Result<Value, FinAutError> {
        self.request(CallDescriptor::get(path))
    }

    pub fn post(&self, path: impl Into<String>, body: Value) -> Result<Value, FinAutError> {
        self.request(CallDescriptor::post(path).with_body(body))
    }

    pub fn put(&self, path: impl Into<String>, body: Value) -> Result<Value, FinAutError> {
        self.request(CallDescriptor::put(path).with_body(body))
    }

    pub fn patch(&self, path: impl Into<String>, body: Value) -> Result<Value, FinAutError> {
        self.request(CallDescriptor::patch(path).with_body(body))
    }

    pub fn delete(&self, path: impl Into<String>) -> Result<(), FinAutError> {
        self.request(CallDescriptor::delete(path)).map(|_| ())
    }

    /// Acquires (or reuses) an access token without executing an API call.
    /// Useful for handing the bearer to external tooling.
    pub fn retrieve_token(&self) -> Result<crate::token::Token, FinAutError> {
        self.tokens.get_valid_token()
    }

    /// Checks that the API root is reachable with the configured credentials.
    pub fn test_connection(&self) -> bool {
        match self.get("") {
            Ok(_) => true,
            Err(e) => {
                debug!("connection test failed: {e}");
                false
            }
        }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn users(&self) -> UserResource<'_, C> {
        UserResource::new(self)
    }

    pub fn companies(&self) -> CompanyResource<'_, C> {
        CompanyResource::new(self)
    }

    pub fn departments(&self) -> DepartmentResource<'_, C> {
        DepartmentResource::new(self)
    }

    pub fn userstatus(&self) -> UserStatusResource<'_, C> {
        UserStatusResource::new(self)
    }

    pub fn results(&self) -> ResultResource<'_, C> {
        ResultResource::new(self)
    }

    pub fn competency_results(&self) -> CompetencyResultResource<'_, C> {
        CompetencyResultResource::new(self)
    }

    pub fn employment(&self) -> EmploymentResource<'_, C> {
        EmploymentResource::new(self)
    }
}

/// An empty 2xx body is a null payload, not a parse failure.
fn parse_payload(body: &[u8]) -> Result<Value, FinAutError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| {
        FinAutError::Unexpected(ErrorDetails::new(format!(
            "unable to parse response body: {e}"
        )))
    })
}
