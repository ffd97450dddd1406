use url::Url;

use crate::api::RemoteId;
use crate::config::{AppConfig, ConfigError, ENV_VIEWER_BASE_URL, normalize_base_url};

/// Builds links into the results viewer, which is a separate web app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerLinks {
    base: Url,
}

impl ViewerLinks {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let normalized = normalize_base_url(ENV_VIEWER_BASE_URL, base_url)?;
        // No trailing slash is added, so a path-prefixed viewer keeps its path.
        let base = Url::parse(&normalized).map_err(|_| ConfigError::InvalidBaseUrl {
            key: ENV_VIEWER_BASE_URL,
        })?;
        Ok(Self { base })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::new(&config.viewer_base_url)
    }

    pub fn landing(&self, login: Option<&str>) -> String {
        self.build(&[], login, None)
    }

    pub fn submission(&self, login: &str, data_id: &RemoteId) -> String {
        self.build(&[], Some(login), Some(data_id))
    }

    pub fn upload_page(&self, login: &str) -> String {
        self.build(&["upload"], Some(login), None)
    }

    fn build(&self, segments: &[&str], login: Option<&str>, data_id: Option<&RemoteId>) -> String {
        let mut url = self.base.clone();
        if !segments.is_empty() {
            // Only cannot-be-a-base URLs refuse segments; `new` rules those out.
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty().extend(segments);
            }
        }
        if login.is_some() || data_id.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(login) = login {
                query.append_pair("login", login);
            }
            if let Some(data_id) = data_id {
                query.append_pair("data_id", &data_id.to_string());
            }
        }
        url.to_string()
    }
}
