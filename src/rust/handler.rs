//! Request handling on top of the classifier: payload decoding, the success
//! envelope and the static discovery endpoints.

use serde::{Deserialize, Serialize};

use crate::classifier::{classify, ClassificationResult};

/// Greeting returned by the root endpoint
pub const ROOT_MESSAGE: &str = "Hello, World!";
/// Constant identifier returned by the operation info endpoint
pub const OPERATION_CODE: u32 = 1;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILURE: &str = "failure";

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::MalformedRequest(err.to_string())
    }
}

/// Body of a process request. A missing or `null` `data` field is an empty sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub data: Option<Vec<String>>,
}

impl ProcessRequest {
    pub fn new(data: Vec<impl Into<String>>) -> Self {
        Self {
            data: Some(data.into_iter().map(Into::into).collect()),
        }
    }

    pub fn tokens(&self) -> &[String] {
        self.data.as_deref().unwrap_or_default()
    }
}

/// Success envelope: a status marker followed by the classification fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub status: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

impl ProcessResponse {
    pub fn success(result: ClassificationResult) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            result,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Failure envelope. Never carries classification fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub status: String,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILURE.to_string(),
            error: error.into(),
        }
    }
}

impl From<&HandlerError> for FailureResponse {
    fn from(err: &HandlerError) -> Self {
        FailureResponse::new(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootInfo {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    pub operation_code: u32,
}

/// Decodes a raw process payload.
///
/// The body must be a JSON object; `data`, when present and not `null`,
/// must be an array of strings. Non-string elements are rejected rather
/// than coerced.
pub fn parse_process_request(raw: &[u8]) -> Result<ProcessRequest, HandlerError> {
    let value: serde_json::Value = serde_json::from_slice(raw)?;
    if !value.is_object() {
        return Err(HandlerError::MalformedRequest(
            "request body must be a JSON object".into(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Decodes the payload, classifies its tokens and wraps the result in the
/// success envelope. Classification never runs on a malformed payload.
pub fn handle_process_request(raw: &[u8]) -> Result<ProcessResponse, HandlerError> {
    let request = parse_process_request(raw)?;
    log::debug!("Classifying {} tokens", request.tokens().len());
    Ok(ProcessResponse::success(classify(request.tokens())))
}

pub fn root() -> RootInfo {
    RootInfo {
        message: ROOT_MESSAGE.to_string(),
    }
}

pub fn get_operation_code() -> OperationInfo {
    OperationInfo {
        operation_code: OPERATION_CODE,
    }
}
