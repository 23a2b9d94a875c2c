//! Teer API client implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::diagnostics::{Diagnostics, NoopDiagnostics};
use crate::error::ClientError;
use crate::resources::{Billing, Ingest};
use crate::router::{Resource, Router};
use crate::transport::{ApiTransport, HttpTransport, ReqwestTransport, RequestOptions};

/// Environment variable read when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "TEER_SECRET_API_KEY";

/// Default Teer API host.
pub const DEFAULT_BASE_URL: &str = "https://track.teer.ai";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Teer API client.
///
/// Configuration is fixed at construction. Clones share the underlying
/// connection pool and nothing else mutable; separate clients with different
/// configuration can be used concurrently.
#[derive(Debug, Clone)]
pub struct TeerClient {
    router: Router,
    transport: ApiTransport,
}

impl TeerClient {
    /// Create a client with an explicit API key and default settings.
    ///
    /// An empty key falls back to `TEER_SECRET_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if no API key is available.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(ClientOptions::default().with_api_key(api_key))
    }

    /// Create a client that reads its API key from `TEER_SECRET_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::with_options(ClientOptions::default())
    }

    /// Create a client with custom options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if no API key is available, a
    /// base URL is not an absolute HTTP(S) URL, the API version is empty, or
    /// the HTTP client cannot be built.
    pub fn with_options(options: ClientOptions) -> Result<Self, ClientError> {
        let api_key = resolve_api_key(options.api_key, |name| std::env::var(name).ok())?;

        let mut router = Router::new(&options.base_url, &options.api_version)?;
        for (resource, base_url) in &options.resource_base_urls {
            router = router.with_override(*resource, base_url)?;
        }

        let http: Arc<dyn HttpTransport> = match options.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let transport = ApiTransport::new(&api_key, http, options.diagnostics, options.timeout)?;

        Ok(Self { router, transport })
    }

    /// Base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.router.base_url()
    }

    /// API version.
    #[must_use]
    pub fn api_version(&self) -> &str {
        self.router.api_version()
    }

    /// `{base_url}/{api_version}`.
    #[must_use]
    pub fn api_base(&self) -> String {
        self.router.api_base()
    }

    /// Default per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.transport.timeout()
    }

    /// Full URL of a resource, honoring per-resource base URL overrides.
    #[must_use]
    pub fn url_for(&self, resource: Resource) -> String {
        self.router.url_for(resource)
    }

    /// Usage ingest resource.
    #[must_use]
    pub fn ingest(&self) -> Ingest<'_> {
        Ingest::new(self)
    }

    /// Billing resource.
    #[must_use]
    pub fn billing(&self) -> Billing<'_> {
        Billing::new(self)
    }

    pub(crate) async fn post(
        &self,
        resource: Resource,
        body: Value,
        options: &RequestOptions,
    ) -> Result<Value, ClientError> {
        let url = self.router.url_for(resource);
        self.transport
            .request(Method::POST, &url, Some(body), options)
            .await
    }
}

/// An explicit non-empty key wins; otherwise the environment is consulted.
fn resolve_api_key(
    explicit: Option<String>,
    env: impl FnOnce(&str) -> Option<String>,
) -> Result<String, ClientError> {
    explicit
        .filter(|key| !key.is_empty())
        .or_else(|| env(API_KEY_ENV).filter(|key| !key.is_empty()))
        .ok_or_else(|| {
            ClientError::Configuration(format!(
                "no API key provided; set the {API_KEY_ENV} environment variable or pass an API key"
            ))
        })
}

/// Client options for customization.
#[derive(Clone)]
pub struct ClientOptions {
    /// API key. Falls back to `TEER_SECRET_API_KEY` when `None` or empty.
    pub api_key: Option<String>,
    /// Base URL (default: `https://track.teer.ai`).
    pub base_url: String,
    /// API version (default: `v1`).
    pub api_version: String,
    /// Per-request timeout (default: 10 seconds).
    pub timeout: Duration,
    /// Base URL overrides for individual resources.
    pub resource_base_urls: Vec<(Resource, String)>,
    /// Diagnostics sink (default: no-op).
    pub diagnostics: Arc<dyn Diagnostics>,
    /// HTTP transport (default: `reqwest`).
    pub transport: Option<Arc<dyn HttpTransport>>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
            resource_base_urls: Vec::new(),
            diagnostics: Arc::new(NoopDiagnostics),
            transport: None,
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("resource_base_urls", &self.resource_base_urls)
            .field("diagnostics", &self.diagnostics)
            .field("transport", &self.transport)
            .finish()
    }
}

impl ClientOptions {
    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the default per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send requests for `resource` to a different base URL.
    #[must_use]
    pub fn with_resource_base_url(
        mut self,
        resource: Resource,
        base_url: impl Into<String>,
    ) -> Self {
        self.resource_base_urls.push((resource, base_url.into()));
        self
    }

    /// Set the diagnostics sink.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Arc::new(diagnostics);
        self
    }

    /// Replace the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }
}
