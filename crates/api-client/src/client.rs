//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::cms::CmsApi;
use crate::endpoints::tournament::{CachedResponse, TournamentApi};
use crate::error::{ApiError, ApiResult};
use clubhouse_core::cache::{CacheStats, ResponseCache};
use clubhouse_core::date::{Clock, SystemClock};
use clubhouse_core::locale::{LocaleProvider, StaticLocales};
use clubhouse_telemetry::{names, Timer};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Request, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
pub const X_REQUEST_ID: &str = "X-Request-ID";

/// Which upstream service a request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The headless CMS
    Cms,
    /// The tournament provider. Never receives an `Authorization` header.
    Tournament,
}

/// Decoded body of a successful response
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body, `Null` for an empty body
    pub body: Value,
    /// Correlation ID sent with the request
    pub request_id: String,
    /// Wall time from send to fully read body
    pub elapsed: Duration,
}

/// Client for the Clubhouse content backends
///
/// Cheap to clone. Clones share the HTTP connection pool and the tournament
/// response cache, so a cache fill through one clone is visible to all.
#[derive(Clone)]
pub struct ClubhouseClient {
    inner: Client,
    config: Arc<ClientConfig>,
    common_headers: HeaderMap,
    locales: Arc<dyn LocaleProvider>,
    clock: Arc<dyn Clock>,
    tournament_cache: Arc<ResponseCache<CachedResponse>>,
}

impl ClubhouseClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("clubhouse-api-client/", env!("CARGO_PKG_VERSION"))),
        );

        let common_headers = parse_headers(&config.extra_headers)?;

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let default_locale = config.default_locale.clone();

        Ok(Self {
            inner,
            config: Arc::new(config),
            common_headers,
            locales: Arc::new(StaticLocales::new(default_locale.clone(), default_locale)),
            clock: Arc::new(SystemClock),
            tournament_cache: Arc::new(ResponseCache::new()),
        })
    }

    /// Use a different locale source for CMS lookups
    #[must_use]
    pub fn with_locales(mut self, locales: impl LocaleProvider + 'static) -> Self {
        self.locales = Arc::new(locales);
        self
    }

    /// Look CMS content up in `current` first, then in the configured default
    #[must_use]
    pub fn with_locale(self, current: impl Into<String>) -> Self {
        let default = self.config.default_locale.clone();
        self.with_locales(StaticLocales::new(current, default))
    }

    /// Use a different clock for date-dependent filters
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Locale source used by the CMS adapter
    #[must_use]
    pub fn locales(&self) -> &dyn LocaleProvider {
        self.locales.as_ref()
    }

    /// Clock used by the CMS adapter
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Statistics of the tournament response cache
    pub fn tournament_cache_stats(&self) -> ApiResult<CacheStats> {
        Ok(self.tournament_cache.stats()?)
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access the CMS adapter
    #[must_use]
    pub fn cms(&self) -> CmsApi {
        CmsApi::new(self.clone())
    }

    /// Access the tournament adapter
    #[must_use]
    pub fn tournament(&self) -> TournamentApi {
        TournamentApi::new(self.clone(), Arc::clone(&self.tournament_cache))
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP
    // -------------------------------------------------------------------------

    /// Base URL of a backend
    #[must_use]
    pub fn base_url(&self, backend: Backend) -> &str {
        match backend {
            Backend::Cms => &self.config.cms_url,
            Backend::Tournament => &self.config.tournament_url,
        }
    }

    /// Headers attached to every request for a backend
    fn headers_for(&self, backend: Backend) -> ApiResult<HeaderMap> {
        let mut headers = self.common_headers.clone();
        match backend {
            Backend::Cms => {
                if let Some(token) = &self.config.cms_access_token {
                    let value = HeaderValue::from_str(&format!("Bearer {token}"))
                        .map_err(|_| ApiError::config("CMS access token is not a valid header value"))?;
                    headers.insert(AUTHORIZATION, value);
                }
            }
            Backend::Tournament => {
                headers.remove(AUTHORIZATION);
            }
        }
        Ok(headers)
    }

    fn url_for(&self, backend: Backend, path: &str) -> ApiResult<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url(backend).trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Build a GET request without sending it
    ///
    /// Requests to [`Backend::Tournament`] have any `Authorization` header
    /// removed, including one passed in `extra_headers`.
    pub fn build_request(
        &self,
        backend: Backend,
        path: &str,
        query: &[(String, String)],
        extra_headers: &HeaderMap,
    ) -> ApiResult<Request> {
        let url = self.url_for(backend, path)?;
        let request_id = Uuid::new_v4().to_string();

        let mut headers = self.headers_for(backend)?;
        for (name, value) in extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self.inner.get(url).headers(headers).header(X_REQUEST_ID, &request_id);
        if !query.is_empty() {
            builder = builder.query(query);
        }

        let mut request = builder.build()?;
        if backend == Backend::Tournament {
            request.headers_mut().remove(AUTHORIZATION);
        }
        Ok(request)
    }

    /// Send a GET request and parse the JSON body
    #[instrument(skip(self, query, extra_headers), fields(request_id))]
    pub async fn fetch(
        &self,
        backend: Backend,
        path: &str,
        query: &[(String, String)],
        extra_headers: &HeaderMap,
    ) -> ApiResult<RawResponse> {
        let request = self.build_request(backend, path, query, extra_headers)?;
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let timer = Timer::start(names::REQUEST_LATENCY);
        let response = self.inner.execute(request).await?;
        let status = response.status();
        let text = response.text().await?;
        let elapsed = timer.stop();

        if !status.is_success() {
            warn!(
                request_id = %request_id,
                status = status.as_u16(),
                "Request failed"
            );
            return Err(ApiError::api_response(status.as_u16(), text));
        }

        debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Request succeeded"
        );

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(RawResponse {
            status: status.as_u16(),
            body,
            request_id,
            elapsed,
        })
    }

    /// Send a GET request and deserialize the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        backend: Backend,
        path: &str,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        let raw = self.fetch(backend, path, query, &HeaderMap::new()).await?;
        Ok(serde_json::from_value(raw.body)?)
    }
}

fn parse_headers(headers: &BTreeMap<String, String>) -> ApiResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::config(format!("invalid header name: {name}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::config(format!("invalid value for header {name}")))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClubhouseClient {
        let config = ClientConfig::default()
            .with_cms_url("https://cms.test")
            .with_tournament_url("https://leverade.test/")
            .with_header("authorization", "Bearer injected")
            .with_header("x-site", "clubhouse");
        ClubhouseClient::with_config(config).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::development();
        let client = ClubhouseClient::with_config(config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::default().with_cms_url("not-a-url");
        assert!(ClubhouseClient::with_config(config).is_err());
    }

    #[test]
    fn test_tournament_requests_drop_common_authorization() {
        let request = client()
            .build_request(Backend::Tournament, "/groups/3/standings", &[], &HeaderMap::new())
            .unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.headers().get("x-site").unwrap(), "clubhouse");
        assert!(request.headers().contains_key(X_REQUEST_ID));
        assert_eq!(request.url().as_str(), "https://leverade.test/groups/3/standings");
    }

    #[test]
    fn test_tournament_requests_drop_per_request_authorization() {
        let mut extra = HeaderMap::new();
        extra.insert(AUTHORIZATION, HeaderValue::from_static("Bearer per-request"));

        let request = client()
            .build_request(Backend::Tournament, "/teams", &[], &extra)
            .unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_cms_requests_keep_common_headers() {
        let request = client()
            .build_request(Backend::Cms, "items/news", &[("limit".to_string(), "3".to_string())], &HeaderMap::new())
            .unwrap();

        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer injected");
        assert_eq!(request.url().as_str(), "https://cms.test/items/news?limit=3");
    }

    #[test]
    fn test_cms_token_sent_as_bearer() {
        let config = ClientConfig::default().with_cms_access_token("s3cret");
        let client = ClubhouseClient::with_config(config).unwrap();

        let request = client
            .build_request(Backend::Cms, "items/teams", &[], &HeaderMap::new())
            .unwrap();

        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer s3cret");
    }

    #[test]
    fn test_with_locale_keeps_default() {
        let client = client().with_locale("fr");
        assert_eq!(client.locales().current_locale(), "fr");
        assert_eq!(client.locales().default_locale(), "en");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let client = client();
        let a = client.build_request(Backend::Cms, "items/news", &[], &HeaderMap::new()).unwrap();
        let b = client.build_request(Backend::Cms, "items/news", &[], &HeaderMap::new()).unwrap();
        assert_ne!(a.headers().get(X_REQUEST_ID), b.headers().get(X_REQUEST_ID));
    }
}
