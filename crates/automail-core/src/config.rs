use std::fmt;

use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "AUTOU_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Turn a user-supplied base URL into the canonical form used for every
/// endpoint.
///
/// - blank input falls back to [`DEFAULT_API_URL`]
/// - input without an `http://`/`https://` prefix gets `https://`
/// - trailing slashes are dropped
/// - the result must parse, use http(s) and name a host
pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();

    let candidate = if trimmed.is_empty() {
        DEFAULT_API_URL.to_string()
    } else if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else if let Some((scheme, _)) = trimmed.split_once("://") {
        return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(candidate.trim_end_matches('/')).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::MissingHost(raw.to_string()));
    }

    Ok(url)
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// The three endpoints the client talks to, derived from one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: Url,
}

impl ApiEndpoints {
    pub fn new(raw_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base: normalize_base_url(raw_base)?,
        })
    }

    /// Read [`API_URL_ENV`], falling back to the default when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(API_URL_ENV).unwrap_or_default();
        Self::new(&raw)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `POST {base}/upload`
    pub fn upload(&self) -> Url {
        self.join(&["upload"])
    }

    /// `GET {base}/uploads`
    pub fn uploads(&self) -> Url {
        self.join(&["uploads"])
    }

    /// `GET|DELETE {base}/uploads/{id}`, with `id` encoded as a single segment.
    pub fn upload_by_id(&self, id: &str) -> Url {
        self.join(&["uploads", id])
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a path, so this cannot fail after normalization.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl fmt::Display for ApiEndpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str().trim_end_matches('/'))
    }
}
