use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::auth::{LoginRequest, RegisterRequest};
use crate::catalog::ModelKey;
use crate::link::ValidatedLink;

/// Opaque identifier minted by the backend. Older deployments return
/// integers, newer ones strings; both are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(RemoteId, Value)")]
pub struct HistoryEntry {
    pub id: RemoteId,
    pub created_at: String,
}

impl From<(RemoteId, Value)> for HistoryEntry {
    fn from((id, created_at): (RemoteId, Value)) -> Self {
        Self {
            id,
            created_at: value_text(created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(RemoteId, String)")]
pub struct UserModel {
    pub id: RemoteId,
    pub name: String,
}

impl From<(RemoteId, String)> for UserModel {
    fn from((id, name): (RemoteId, String)) -> Self {
        Self { id, name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    Accepted,
    Rejected,
}

impl LoginOutcome {
    /// Only a literal `false` is a rejection; any other success payload
    /// (`true`, a session object) means the credentials were accepted.
    pub fn from_payload(payload: &Value) -> Self {
        match payload {
            Value::Bool(false) => Self::Rejected,
            _ => Self::Accepted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPrediction {
    pub link: ValidatedLink,
    pub login: String,
    pub model: ModelKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("prediction_api_invalid_endpoint:{path}")]
    InvalidEndpoint { path: String },
    #[error("prediction_api_http_{status}:{detail}")]
    Server { status: u16, detail: String },
    #[error("prediction_api_request_failed:{message}")]
    Network { message: String },
    #[error("prediction_api_read_failed:{message}")]
    Read { message: String },
    #[error("prediction_api_json_decode_failed:{message}")]
    Decode { message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl ApiError {
    /// Maps a non-success response to `Server`, lifting `detail` out of a
    /// `{"detail": ...}` body when there is one.
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .map(|body| value_text(body.detail))
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self::Server { status, detail }
    }

    /// The server-provided message, if the request reached the server.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            Self::Server { detail, .. } => Some(detail.as_str()),
            _ => None,
        }
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Contract of the external prediction service.
#[async_trait(?Send)]
pub trait PredictionApi {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, ApiError>;
    async fn history(&self, login: &str) -> Result<Vec<HistoryEntry>, ApiError>;
    async fn user_models(&self, login: &str) -> Result<Vec<UserModel>, ApiError>;
    async fn predict_by_link(&self, prediction: &LinkPrediction) -> Result<RemoteId, ApiError>;
}
