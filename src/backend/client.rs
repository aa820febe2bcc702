//! Blocking HTTP plumbing shared by the model server clients.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::BackendError;

/// Thin JSON-over-HTTP client bound to one server.
#[derive(Clone)]
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Create a client for `base_url`.
    ///
    /// Generation can take minutes, so requests carry no timeout.
    pub(crate) fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        Self::check(response)?
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    pub(crate) fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        self.post(path, body)?
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    pub(crate) fn post_bytes<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, BackendError> {
        self.post(path, body)?
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    pub(crate) fn post_empty(&self, path: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        Self::check(response).map(|_| ())
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        Self::check(response)
    }

    fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        if body.is_empty() {
            Err(BackendError::RequestFailed(format!("Status: {status}")))
        } else {
            Err(BackendError::RequestFailed(format!("Status: {status}: {body}")))
        }
    }
}
