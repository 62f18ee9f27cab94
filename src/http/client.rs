use http::{Request, Response};
use reqwest::blocking::{Client, Response as BlockingResponse};

use crate::config::ClientConfig;
use crate::http_client::{HttpClient, HttpClientError};

/// Blocking reqwest-backed transport honoring the configured timeout and
/// certificate-verification toggle.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, HttpBuildError> {
        let builder = Client::builder()
            .use_rustls_tls()
            .tls_built_in_native_certs(true)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(config.timeout)
            .connect_timeout(config.timeout);

        let client = builder
            .build()
            .map_err(|err| HttpBuildError::ClientBuilder(err.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, HttpClientError> {
        let req = self
            .client
            .request(request.method().into(), request.uri().to_string().as_str())
            .headers(request.headers().clone())
            .body(request.body().to_vec());

        let res = req
            .send()
            .map_err(|err| HttpClientError::TransportError(err.to_string()))?;

        try_build_response(res)
    }
}

fn try_build_response(res: BlockingResponse) -> Result<Response<Vec<u8>>, HttpClientError> {
    let status = res.status();
    let version = res.version();
    let headers = res.headers().clone();

    let body: Vec<u8> = res
        .bytes()
        .map_err(|err| HttpClientError::InvalidResponse(err.to_string()))?
        .into();

    let mut builder = http::Response::builder().status(status).version(version);
    if let Some(header_map) = builder.headers_mut() {
        header_map.extend(headers);
    }

    builder
        .body(body)
        .map_err(|err| HttpClientError::InvalidResponse(err.to_string()))
}

#[derive(thiserror::Error, Debug)]
pub enum HttpBuildError {
    #[error("could not build the http client: {0}")]
    ClientBuilder(String),
}
