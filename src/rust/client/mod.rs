//! Interactive front end for the classification service.
//!
//! Input is validated locally before anything is sent; only the HTTP
//! contract connects the client to the server.

mod render;

pub use render::{render, render_error, DisplayMode, UnknownDisplayMode, SUCCESS_BANNER};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{DEFAULT_OPERATION_PATH, DEFAULT_PROCESS_PATH};
use crate::handler::{OperationInfo, ProcessResponse, RootInfo};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
/// Placeholder shown when asking for input
pub const INPUT_PLACEHOLDER: &str = r#"{"data": ["A", "C", "Z", "c", "i"]}"#;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClientError {
    /// The text typed by the user is not JSON; nothing was sent
    #[error("Invalid JSON: {0}")]
    LocalParse(String),
    /// The server could not be reached or did not answer with success
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::UpstreamUnavailable(err.to_string())
    }
}

/// Parses user-supplied text into a JSON value.
pub fn parse_input(text: &str) -> Result<Value, ClientError> {
    serde_json::from_str(text).map_err(|e| ClientError::LocalParse(e.to_string()))
}

/// HTTP client for the classification endpoints.
#[derive(Debug, Clone)]
pub struct ProcessClient {
    base_url: String,
    process_path: String,
    operation_path: String,
    http: reqwest::Client,
}

impl ProcessClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            process_path: DEFAULT_PROCESS_PATH.to_string(),
            operation_path: DEFAULT_OPERATION_PATH.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_process_path(mut self, path: impl Into<String>) -> Self {
        self.process_path = path.into();
        self
    }

    pub fn with_operation_path(mut self, path: impl Into<String>) -> Self {
        self.operation_path = path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Posts an already parsed payload and decodes the success envelope.
    pub async fn process(&self, payload: &Value) -> Result<ProcessResponse, ClientError> {
        let url = self.url(&self.process_path);
        log::debug!("POST {}", url);
        let response = self.http.post(&url).json(payload).send().await?;
        Self::decode(response).await
    }

    /// Parses `text` locally and posts it only when it is valid JSON.
    pub async fn process_text(&self, text: &str) -> Result<ProcessResponse, ClientError> {
        let payload = parse_input(text)?;
        self.process(&payload).await
    }

    pub async fn operation_code(&self) -> Result<OperationInfo, ClientError> {
        self.get(&self.operation_path).await
    }

    pub async fn health(&self) -> Result<RootInfo, ClientError> {
        self.get("/").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            log::warn!("Server answered {}", status);
            return Err(ClientError::UpstreamUnavailable(format!(
                "server answered {}",
                status
            )));
        }
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        let value = parse_input(INPUT_PLACEHOLDER).unwrap();
        assert_eq!(value["data"][4], "i");
        assert!(matches!(parse_input("{data: }"), Err(ClientError::LocalParse(_))));
        assert!(matches!(parse_input(""), Err(ClientError::LocalParse(_))));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = ProcessClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/bfhl"), "http://localhost:8000/bfhl");
    }

    #[test]
    fn test_invalid_text_is_never_sent() {
        // The address is unroutable; a LocalParse error proves no request was attempted
        let client = ProcessClient::new("http://127.0.0.1:1");
        let result = tokio_test::block_on(client.process_text("not json"));
        assert!(matches!(result, Err(ClientError::LocalParse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = ProcessClient::new("http://127.0.0.1:1");
        let result = client.process(&serde_json::json!({"data": ["a"]})).await;
        assert!(matches!(result, Err(ClientError::UpstreamUnavailable(_))));
    }
}
