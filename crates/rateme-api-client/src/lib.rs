use std::time::Duration;

use async_trait::async_trait;
use rateme_client_core::{
    ApiError, AppConfig, HistoryEntry, LinkPrediction, LoginOutcome, LoginRequest, PredictionApi,
    RegisterRequest, RemoteId, UserModel,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

pub const DEFAULT_TIMEOUT_MS: u64 = rateme_client_core::config::DEFAULT_REQUEST_TIMEOUT_MS;
const MIN_TIMEOUT_MS: u64 = 250;
/// File name browsers give an anonymous `Blob` appended to a form.
const BLOB_FILE_NAME: &str = "blob";

#[derive(Debug, Clone)]
pub struct HttpPredictionApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl HttpPredictionApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout_ms: config.request_timeout_ms,
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpPredictionApiError {
    #[error("prediction_api_base_url_invalid:{base_url}")]
    InvalidBaseUrl { base_url: String },
    #[error("prediction_api_client_build_failed:{message}")]
    Client { message: String },
}

/// [`PredictionApi`] over multipart form posts.
#[derive(Debug, Clone)]
pub struct HttpPredictionApi {
    base: Url,
    http: reqwest::Client,
}

impl HttpPredictionApi {
    pub fn new(config: HttpPredictionApiConfig) -> Result<Self, HttpPredictionApiError> {
        let base = parse_base_url(&config.base_url)?;
        let timeout = Duration::from_millis(config.timeout_ms.max(MIN_TIMEOUT_MS));
        let http = build_http_client(timeout)?;
        Ok(Self { base, http })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, HttpPredictionApiError> {
        Self::new(HttpPredictionApiConfig::from_app_config(config))
    }

    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        if segments.is_empty() || segments.iter().any(|segment| segment.trim().is_empty()) {
            return None;
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(segments);
        Some(url)
    }

    #[must_use]
    pub fn register_path() -> [&'static str; 1] {
        ["register"]
    }

    #[must_use]
    pub fn login_path() -> [&'static str; 1] {
        ["login"]
    }

    #[must_use]
    pub fn history_path() -> [&'static str; 1] {
        ["get_history"]
    }

    #[must_use]
    pub fn models_path() -> [&'static str; 1] {
        ["get_models"]
    }

    #[must_use]
    pub fn predict_by_link_path<'a>(source: &'a str, model: &'a str) -> [&'a str; 3] {
        ["predict_by_link", source, model]
    }

    async fn send_form(&self, segments: &[&str], form: Form) -> Result<reqwest::Response, ApiError> {
        let url = self
            .endpoint(segments)
            .ok_or_else(|| ApiError::InvalidEndpoint {
                path: segments.join("/"),
            })?;
        tracing::debug!(%url, "prediction api request");

        self.http
            .post(url.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(|error| ApiError::Network {
                message: error.to_string(),
            })
    }

    async fn post_form<T>(&self, segments: &[&str], form: Form) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.send_form(segments, form).await?;
        decode_json_response(response).await
    }

    /// For endpoints whose success body carries nothing; only the status counts.
    async fn post_form_status(&self, segments: &[&str], form: Form) -> Result<(), ApiError> {
        let response = self.send_form(segments, form).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let bytes = response.bytes().await.map_err(|error| ApiError::Read {
            message: error.to_string(),
        })?;
        Err(rejected(status, &bytes))
    }
}

#[async_trait(?Send)]
impl PredictionApi for HttpPredictionApi {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let form = Form::new()
            .text("name", request.name.clone())
            .text("login", request.login.clone())
            .part("password", password_part(&request.password));
        self.post_form_status(&Self::register_path(), form).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, ApiError> {
        let form = Form::new()
            .text("login", request.login.clone())
            .part("password", password_part(&request.password));
        let payload: serde_json::Value = self.post_form(&Self::login_path(), form).await?;
        Ok(LoginOutcome::from_payload(&payload))
    }

    async fn history(&self, login: &str) -> Result<Vec<HistoryEntry>, ApiError> {
        let form = Form::new().text("login", login.to_string());
        self.post_form(&Self::history_path(), form).await
    }

    async fn user_models(&self, login: &str) -> Result<Vec<UserModel>, ApiError> {
        let form = Form::new().text("login", login.to_string());
        self.post_form(&Self::models_path(), form).await
    }

    async fn predict_by_link(&self, prediction: &LinkPrediction) -> Result<RemoteId, ApiError> {
        let form = Form::new()
            .text("link", prediction.link.url.clone())
            .text("login", prediction.login.clone());
        let path =
            Self::predict_by_link_path(prediction.link.source.as_str(), prediction.model.as_str());
        self.post_form(&path, form).await
    }
}

// Sent as a file part, the way a browser appends a `Blob`.
fn password_part(password: &str) -> Part {
    Part::bytes(password.as_bytes().to_vec()).file_name(BLOB_FILE_NAME)
}

fn parse_base_url(raw: &str) -> Result<Url, HttpPredictionApiError> {
    let invalid = || HttpPredictionApiError::InvalidBaseUrl {
        base_url: raw.to_string(),
    };
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid());
    }
    let url = Url::parse(&format!("{trimmed}/")).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url)
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client(timeout: Duration) -> Result<reqwest::Client, HttpPredictionApiError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| HttpPredictionApiError::Client {
            message: error.to_string(),
        })
}

// The browser's fetch owns timeouts on wasm32.
#[cfg(target_arch = "wasm32")]
fn build_http_client(_timeout: Duration) -> Result<reqwest::Client, HttpPredictionApiError> {
    Ok(reqwest::Client::new())
}

fn rejected(status: reqwest::StatusCode, body: &[u8]) -> ApiError {
    let error = ApiError::from_error_body(status.as_u16(), body);
    tracing::debug!(status = status.as_u16(), %error, "prediction api rejected request");
    error
}

async fn decode_json_response<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await.map_err(|error| ApiError::Read {
        message: error.to_string(),
    })?;

    if !status.is_success() {
        return Err(rejected(status, &bytes));
    }

    serde_json::from_slice::<T>(&bytes).map_err(|error| ApiError::Decode {
        message: error.to_string(),
    })
}
