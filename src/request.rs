use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request};
use serde_json::Value;
use url::Url;

use crate::error::{ErrorDetails, FinAutError};
use crate::token::Token;

/// Description of one logical API call prior to HTTP serialization.
/// Constructed by the resource wrappers, consumed once by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CallDescriptor {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl CallDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Appends the pair only when a value is present; keeps the optional
    /// filter plumbing in the resource wrappers flat.
    pub fn with_query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    fn build_url(&self, base_url: &Url) -> Result<Url, FinAutError> {
        let mut url = base_url
            .join(self.path.trim_start_matches('/'))
            .map_err(|e| {
                FinAutError::Unexpected(ErrorDetails::new(format!(
                    "invalid endpoint path `{}`: {e}",
                    self.path
                )))
            })?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Serializes the descriptor into an outgoing request carrying the bearer
    /// token.
    pub(crate) fn to_http_request(
        &self,
        base_url: &Url,
        token: &Token,
    ) -> Result<Request<Vec<u8>>, FinAutError> {
        let url = self.build_url(base_url)?;

        let mut builder = Request::builder()
            .method(self.method.clone())
            .uri(url.as_str())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", token.access_token()));

        let body = match &self.body {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                serde_json::to_vec(body).map_err(|e| {
                    FinAutError::Unexpected(ErrorDetails::new(format!(
                        "unable to serialize request body: {e}"
                    )))
                })?
            }
            None => Vec::new(),
        };

        builder
            .body(body)
            .map_err(|e| FinAutError::Unexpected(ErrorDetails::new(e.to_string())))
    }
}
