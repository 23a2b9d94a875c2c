//! Resource routing: logical resource to request URL.

use std::collections::HashMap;

use reqwest::Url;

use crate::error::ClientError;

/// Logical API resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Usage ingest.
    Ingest,
    /// Billing namespace.
    Billing,
    /// Billing meter events.
    MeterEvents,
}

impl Resource {
    /// Path of the resource under the versioned API base.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Ingest => "ingest",
            Self::Billing => "billing",
            Self::MeterEvents => "billing/meter-events",
        }
    }
}

/// Resolves resources to URLs under `{base_url}/{api_version}`.
///
/// A resource may carry its own base URL, which takes precedence over the
/// default. The API version is appended either way.
#[derive(Debug, Clone)]
pub struct Router {
    base_url: String,
    api_version: String,
    overrides: HashMap<Resource, String>,
}

impl Router {
    /// Create a router.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when `base_url` is not an absolute
    /// HTTP(S) URL or `api_version` is empty.
    pub fn new(base_url: &str, api_version: &str) -> Result<Self, ClientError> {
        let api_version = api_version.trim_matches('/');
        if api_version.trim().is_empty() {
            return Err(ClientError::Configuration(
                "API version must not be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_version: api_version.to_string(),
            overrides: HashMap::new(),
        })
    }

    /// Route `resource` to a different base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when `base_url` is not an absolute
    /// HTTP(S) URL.
    pub fn with_override(
        mut self,
        resource: Resource,
        base_url: &str,
    ) -> Result<Self, ClientError> {
        self.overrides.insert(resource, normalize_base_url(base_url)?);
        Ok(self)
    }

    /// Default base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API version, without surrounding slashes.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// `{base_url}/{api_version}`.
    #[must_use]
    pub fn api_base(&self) -> String {
        join_url(&self.base_url, &self.api_version, "")
    }

    /// Full URL of `resource`.
    #[must_use]
    pub fn url_for(&self, resource: Resource) -> String {
        let base = self
            .overrides
            .get(&resource)
            .map_or(self.base_url.as_str(), String::as_str);
        join_url(base, &self.api_version, resource.path())
    }
}

/// Join URL segments with exactly one slash between each.
///
/// Leading and trailing slashes on every segment are ignored, and empty
/// segments are skipped.
///
/// ```
/// use teer_client::router::join_url;
///
/// assert_eq!(join_url("https://h//", "/v1/", "ingest"), "https://h/v1/ingest");
/// assert_eq!(join_url("https://h", "v1", ""), "https://h/v1");
/// ```
#[must_use]
pub fn join_url(base: &str, version: &str, path: &str) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in [version, path] {
        let segment = segment.trim_matches('/');
        if !segment.is_empty() {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}

fn normalize_base_url(base_url: &str) -> Result<String, ClientError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| ClientError::Configuration(format!("invalid base URL `{base_url}`: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::Configuration(format!(
            "base URL must use http or https: `{base_url}`"
        )));
    }
    if parsed.host_str().unwrap_or_default().is_empty() {
        return Err(ClientError::Configuration(format!(
            "base URL has no host: `{base_url}`"
        )));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_ignores_boundary_slashes() {
        for base in ["https://h", "https://h/", "https://h//"] {
            for version in ["v1", "/v1", "//v1", "v1/", "/v1/", "//v1//"] {
                let router = Router::new(base, version).unwrap();
                assert_eq!(router.api_base(), "https://h/v1", "{base} + {version}");
            }
        }
    }

    #[test]
    fn resource_urls() {
        let router = Router::new("https://h/", "v1").unwrap();
        assert_eq!(router.url_for(Resource::Ingest), "https://h/v1/ingest");
        assert_eq!(router.url_for(Resource::Billing), "https://h/v1/billing");
        assert_eq!(
            router.url_for(Resource::MeterEvents),
            "https://h/v1/billing/meter-events"
        );
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let router = Router::new("https://enterprise.example.com/teer", "v2").unwrap();
        assert_eq!(router.api_base(), "https://enterprise.example.com/teer/v2");
        assert_eq!(
            router.url_for(Resource::Ingest),
            "https://enterprise.example.com/teer/v2/ingest"
        );
    }

    #[test]
    fn override_takes_precedence() {
        let router = Router::new("https://api.teer.ai", "v1")
            .unwrap()
            .with_override(Resource::Ingest, "https://track.teer.ai/")
            .unwrap();
        assert_eq!(router.url_for(Resource::Ingest), "https://track.teer.ai/v1/ingest");
        assert_eq!(
            router.url_for(Resource::MeterEvents),
            "https://api.teer.ai/v1/billing/meter-events"
        );
    }

    #[test]
    fn rejects_malformed_base_urls() {
        for bad in ["track.teer.ai", "ftp://track.teer.ai", "", "https://"] {
            assert!(
                matches!(Router::new(bad, "v1"), Err(ClientError::Configuration(_))),
                "{bad:?} should be rejected"
            );
        }
        let router = Router::new("https://h", "v1").unwrap();
        assert!(router.with_override(Resource::Billing, "not a url").is_err());
    }

    #[test]
    fn rejects_empty_version() {
        assert!(matches!(
            Router::new("https://h", "/"),
            Err(ClientError::Configuration(_))
        ));
    }
}
