use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Link sources the backend knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportedSource {
    Mustapp,
}

impl SupportedSource {
    pub const ALL: [Self; 1] = [Self::Mustapp];

    /// Path segment used in `/predict_by_link/{source}/{model}`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mustapp => "mustapp",
        }
    }

    pub const fn host(self) -> &'static str {
        match self {
            Self::Mustapp => "mustapp.com",
        }
    }

    fn matches_host(self, host: &str) -> bool {
        let expected = self.host();
        host == expected
            || host
                .strip_suffix(expected)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedLink {
    /// The trimmed input, forwarded as typed.
    pub url: String,
    pub source: SupportedSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("link is empty")]
    Empty,
    #[error("link is not an http(s) URL")]
    Malformed,
    #[error("links from '{host}' are not supported")]
    UnsupportedSource { host: String },
}

pub fn validate_link(raw: &str) -> Result<ValidatedLink, LinkError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinkError::Empty);
    }

    let parsed = Url::parse(trimmed).map_err(|_| LinkError::Malformed)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LinkError::Malformed);
    }
    let host = parsed
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or(LinkError::Malformed)?;

    SupportedSource::ALL
        .into_iter()
        .find(|source| source.matches_host(&host))
        .map(|source| ValidatedLink {
            url: trimmed.to_string(),
            source,
        })
        .ok_or(LinkError::UnsupportedSource { host })
}
