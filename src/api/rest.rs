//! RestClient: blocking HTTP transport shared by the REST resources

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{DriverError, DriverResult};

/// HTTP client bound to one server base URL.
///
/// Calls block until the server answers or the configured timeout expires.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    http_client: Client,
}

impl RestClient {
    /// Create a client for `base_url`, e.g. `http://localhost:8080`
    pub fn new(base_url: &str, timeout: Duration) -> DriverResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> DriverResult<Self> {
        Self::new(&config.url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Absolute URL of `path` with `params` appended as query pairs
    fn request_url(&self, path: &str, params: &[(&str, String)]) -> DriverResult<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| DriverError::Config(format!("invalid server url: {}", e)))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> DriverResult<T> {
        let url = self.request_url(path, params)?;
        debug!("GET {}", url);
        let response = self.http_client.get(url).send()?;
        Self::decode(response)
    }

    pub fn post<B, T>(&self, path: &str, params: &[(&str, String)], body: &B) -> DriverResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.request_url(path, params)?;
        debug!("POST {}", url);
        let request = self.http_client.post(url).json(body);
        Self::decode(request.send()?)
    }

    pub fn put<B, T>(&self, path: &str, params: &[(&str, String)], body: &B) -> DriverResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.request_url(path, params)?;
        debug!("PUT {}", url);
        let request = self.http_client.put(url).json(body);
        Self::decode(request.send()?)
    }

    pub fn delete(&self, path: &str, params: &[(&str, String)]) -> DriverResult<()> {
        let url = self.request_url(path, params)?;
        debug!("DELETE {}", url);
        let request: RequestBuilder = self.http_client.delete(url);
        Self::check(request.send()?)?;
        Ok(())
    }

    fn decode<T: DeserializeOwned>(response: Response) -> DriverResult<T> {
        let response = Self::check(response)?;
        let body = response.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }

    // Map error statuses onto driver errors
    fn check(response: Response) -> DriverResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body: serde_json::Value = response
            .json()
            .unwrap_or_else(|_| serde_json::json!({ "message": "Unknown error" }));
        let message = error_body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        warn!("Server returned {}: {}", status, message);

        if status == StatusCode::NOT_FOUND {
            Err(DriverError::NotFound(message))
        } else {
            Err(DriverError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Percent-encode one path segment
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string()
}
