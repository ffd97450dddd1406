use thiserror::Error;

use crate::catalog::ModelKey;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:1233";
pub const DEFAULT_VIEWER_BASE_URL: &str = "http://127.0.0.1:8501";
pub const DEFAULT_GUEST_LOGIN: &str = "guest";
pub const DEFAULT_MODEL_KEY: &str = "goods";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 600_000;
const MIN_REQUEST_TIMEOUT_MS: u64 = 250;

pub const ENV_API_BASE_URL: &str = "RATEME_API_BASE_URL";
pub const ENV_VIEWER_BASE_URL: &str = "RATEME_VIEWER_BASE_URL";
pub const ENV_GUEST_LOGIN: &str = "RATEME_GUEST_LOGIN";
pub const ENV_DEFAULT_MODEL: &str = "RATEME_DEFAULT_MODEL";
pub const ENV_UPLOAD_PAGE: &str = "RATEME_UPLOAD_PAGE";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "RATEME_REQUEST_TIMEOUT_MS";

/// Every key understood by [`AppConfig::from_lookup`].
pub const CONFIG_KEYS: [&str; 6] = [
    ENV_API_BASE_URL,
    ENV_VIEWER_BASE_URL,
    ENV_GUEST_LOGIN,
    ENV_DEFAULT_MODEL,
    ENV_UPLOAD_PAGE,
    ENV_REQUEST_TIMEOUT_MS,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    EmptyBaseUrl { key: &'static str },
    #[error("{key} must use http:// or https:// and include a host")]
    InvalidBaseUrl { key: &'static str },
    #[error("invalid {key} value '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub viewer_base_url: String,
    /// Login sent with predictions made without a session.
    pub guest_login: String,
    pub default_model: Option<ModelKey>,
    pub upload_page_enabled: bool,
    pub request_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            viewer_base_url: DEFAULT_VIEWER_BASE_URL.to_string(),
            guest_login: DEFAULT_GUEST_LOGIN.to_string(),
            default_model: Some(ModelKey::new(DEFAULT_MODEL_KEY)),
            upload_page_enabled: true,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source. The browser shell feeds
    /// this from a global object, native callers from the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let api_base_url = match value(ENV_API_BASE_URL) {
            Some(raw) => normalize_base_url(ENV_API_BASE_URL, &raw)?,
            None => defaults.api_base_url,
        };
        let viewer_base_url = match value(ENV_VIEWER_BASE_URL) {
            Some(raw) => normalize_base_url(ENV_VIEWER_BASE_URL, &raw)?,
            None => defaults.viewer_base_url,
        };
        let guest_login = value(ENV_GUEST_LOGIN).unwrap_or(defaults.guest_login);

        let default_model = match value(ENV_DEFAULT_MODEL) {
            Some(raw) if raw.eq_ignore_ascii_case("none") => None,
            Some(raw) => Some(ModelKey::new(raw)),
            None => defaults.default_model,
        };

        let upload_page_enabled = match value(ENV_UPLOAD_PAGE) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: ENV_UPLOAD_PAGE,
                value: raw,
            })?,
            None => defaults.upload_page_enabled,
        };

        let request_timeout_ms = match value(ENV_REQUEST_TIMEOUT_MS) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_REQUEST_TIMEOUT_MS,
                    value: raw,
                })?
                .max(MIN_REQUEST_TIMEOUT_MS),
            None => defaults.request_timeout_ms,
        };

        Ok(Self {
            api_base_url,
            viewer_base_url,
            guest_login,
            default_model,
            upload_page_enabled,
            request_timeout_ms,
        })
    }
}

pub fn normalize_base_url(key: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl { key });
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl { key });
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidBaseUrl { key });
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidBaseUrl { key });
    }
    Ok(trimmed.to_string())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = AppConfig::from_lookup(|_| None).expect("defaults");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_model, Some(ModelKey::new("goods")));
    }

    #[test]
    fn base_urls_are_trimmed_and_lose_trailing_slash() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_API_BASE_URL, " https://api.rateme.example/ "),
            (ENV_VIEWER_BASE_URL, "https://viewer.rateme.example/"),
        ]))
        .expect("valid config");
        assert_eq!(config.api_base_url, "https://api.rateme.example");
        assert_eq!(config.viewer_base_url, "https://viewer.rateme.example");
    }

    #[test]
    fn base_url_requires_http_scheme() {
        let error = AppConfig::from_lookup(lookup_from(&[(ENV_API_BASE_URL, "api.example")]))
            .expect_err("expected invalid url");
        assert_eq!(
            error,
            ConfigError::InvalidBaseUrl {
                key: ENV_API_BASE_URL
            }
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_GUEST_LOGIN, "   "),
            (ENV_API_BASE_URL, ""),
        ]))
        .expect("valid config");
        assert_eq!(config.guest_login, DEFAULT_GUEST_LOGIN);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn default_model_can_be_disabled() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_DEFAULT_MODEL, "None")]))
            .expect("valid config");
        assert_eq!(config.default_model, None);
    }

    #[test]
    fn upload_page_flag_rejects_garbage() {
        let error = AppConfig::from_lookup(lookup_from(&[(ENV_UPLOAD_PAGE, "maybe")]))
            .expect_err("expected invalid flag");
        assert_eq!(
            error,
            ConfigError::InvalidValue {
                key: ENV_UPLOAD_PAGE,
                value: "maybe".to_string()
            }
        );

        let config = AppConfig::from_lookup(lookup_from(&[(ENV_UPLOAD_PAGE, "off")]))
            .expect("valid flag");
        assert!(!config.upload_page_enabled);
    }

    #[test]
    fn request_timeout_has_a_floor() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_REQUEST_TIMEOUT_MS, "10")]))
            .expect("valid timeout");
        assert_eq!(config.request_timeout_ms, 250);
    }
}
