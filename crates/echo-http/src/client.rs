//! HTTP client for the Echo REST API.
//!
//! Every store goes through [`ApiClient::send`], which:
//! - attaches `Authorization: Bearer <credential>` when the session has one
//! - applies the timeout and fixed-delay retry policy
//! - returns only the decoded payload on 2xx
//! - on 401, invokes [`SessionAccessor::on_unauthorized`] before returning

use crate::accessor::SessionAccessor;
use crate::error::{HttpError, HttpResult};
use crate::request::{ApiRequest, RequestBody, RetryPolicy};
use echo_config::Config;
use serde::de::DeserializeOwned;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use url::Url;

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Access layer shared by the session and domain stores.
///
/// Cheap to clone; clones share the connection pool and session accessor.
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    defaults: RetryPolicy,
    session: Arc<dyn SessionAccessor>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - API root every request path is joined to (e.g. `http://localhost:8000/api`)
    /// * `defaults` - timeout/retry policy used when a request sets no options
    /// * `session` - credential source and 401 handler
    pub fn new(
        base_url: &str,
        defaults: RetryPolicy,
        session: Arc<dyn SessionAccessor>,
    ) -> HttpResult<Self> {
        let parsed = Url::parse(base_url)?;
        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            defaults,
            session,
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config, session: Arc<dyn SessionAccessor>) -> HttpResult<Self> {
        Self::new(
            &config.api_base_url,
            RetryPolicy::from(&config.network),
            session,
        )
    }

    /// Base URL with no trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default policy for calls without overrides.
    pub fn defaults(&self) -> &RetryPolicy {
        &self.defaults
    }

    /// Absolute URL for an API path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Perform a request and decode the payload as `T`.
    ///
    /// Any failed attempt is retried up to the policy's `retry_count` with a
    /// fixed `retry_delay` between attempts. The session hook only sees the
    /// final outcome, so a 401 invalidates the session at most once per call.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> HttpResult<T> {
        let policy = request.options.resolve(&self.defaults);
        let url = self.url_for(&request.path);
        let mut attempt: u32 = 0;

        loop {
            match self.dispatch(&request, &url, &policy).await {
                Ok(body) => return decode_body(&body),
                Err(e) if attempt < policy.retry_count => {
                    attempt += 1;
                    tracing::debug!(
                        method = %request.method,
                        path = %request.path,
                        attempt,
                        max_retries = policy.retry_count,
                        delay_ms = policy.retry_delay.as_millis() as u64,
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(policy.retry_delay).await;
                }
                Err(e) => {
                    if e.is_unauthorized() {
                        tracing::warn!(
                            method = %request.method,
                            path = %request.path,
                            "Unauthorized response, invalidating session"
                        );
                        self.session.on_unauthorized();
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Single attempt. Returns the raw 2xx body.
    async fn dispatch(
        &self,
        request: &ApiRequest,
        url: &str,
        policy: &RetryPolicy,
    ) -> HttpResult<String> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .timeout(policy.timeout)
            .header("Accept", "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = self.session.credential() {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        tracing::debug!(method = %request.method, url = %url, "Sending API request");

        let response = builder.send().await.map_err(HttpError::from_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(HttpError::from_transport)?;

        if !status.is_success() {
            let body_summary = summarize_response_body(&body);
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                body_summary = %body_summary,
                "API request failed"
            );
            return Err(HttpError::from_status(status.as_u16(), &body));
        }

        Ok(body)
    }
}

/// Decode a 2xx body. An empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(body: &str) -> HttpResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(body_summary = %summarize_response_body(body), error = %e, "Unexpected response body");
        HttpError::Decode(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoSession;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, RetryPolicy::default(), Arc::new(NoSession)).unwrap()
    }

    #[test]
    fn test_url_for_joins_single_slash() {
        let c = client("http://localhost:8000/api/");
        assert_eq!(c.base_url(), "http://localhost:8000/api");
        assert_eq!(c.url_for("/auth/login"), "http://localhost:8000/api/auth/login");
        assert_eq!(c.url_for("time-capsules/"), "http://localhost:8000/api/time-capsules/");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ApiClient::new("not a url", RetryPolicy::default(), Arc::new(NoSession));
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn test_from_config_uses_network_defaults() {
        let mut config = Config::default();
        config.network.retry_count = 4;
        let c = ApiClient::from_config(&config, Arc::new(NoSession)).unwrap();
        assert_eq!(c.defaults().retry_count, 4);
    }

    #[test]
    fn test_decode_empty_body_as_null() {
        let value: serde_json::Value = decode_body("").unwrap();
        assert!(value.is_null());
        decode_body::<()>("  ").unwrap();
        let opt: Option<String> = decode_body("").unwrap();
        assert!(opt.is_none());
    }

    #[test]
    fn test_decode_mismatch_is_decode_error() {
        let result: HttpResult<Vec<String>> = decode_body(r#"{"not": "a list"}"#);
        assert!(matches!(result, Err(HttpError::Decode(_))));
    }

    #[test]
    fn test_summarize_hides_body() {
        let summary = summarize_response_body("secret-token-value");
        assert!(summary.starts_with("len=18,"));
        assert!(!summary.contains("secret"));
    }
}
