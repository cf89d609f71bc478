//! HTTP transport.
//!
//! Handles request construction, bounded retry for idempotent verbs and
//! translation of non-2xx responses into [`ServerError`].

use std::future::Future;
use std::time::Duration;

use rand::thread_rng;
use rand::Rng;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, ServerError};

/// Configuration for automatic retry behavior.
///
/// Retries only ever apply to idempotent requests (GET, PUT, DELETE); a POST
/// is sent exactly once.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base backoff factor for exponential backoff
    pub backoff_factor: f64,
    /// Status codes that trigger retry
    pub retry_on: Vec<u16>,
    /// Maximum backoff time in seconds
    pub max_backoff: f64,
    /// Jitter factor (0.1 = ±10%)
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_factor: 2.0,
            retry_on: vec![502, 503, 504],
            max_backoff: 10.0,
            jitter: 0.1,
        }
    }
}

impl RetryConfig {
    /// A configuration that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// JSON-over-HTTP transport rooted at a base URL.
pub struct HttpTransport {
    base_url: Url,
    client: Client,
    retry_config: RetryConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for API requests (e.g., "<http://localhost:8000/api>")
    /// * `timeout` - Per-request timeout
    /// * `retry_config` - Configuration for retry behavior
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the HTTP client
    /// cannot be created.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        retry_config: Option<RetryConfig>,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::Configuration(format!("Invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "Base URL cannot carry a path: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            retry_config: retry_config.unwrap_or_default(),
        })
    }

    /// Build the URL for a path below the base URL. Each segment is
    /// percent-encoded; an empty final segment yields a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL cannot take a path.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::Configuration(format!("Base URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document and decode it.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails or the body does not
    /// decode into `T`, and a server error on non-2xx responses.
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let value = self.send(Method::GET, segments, None::<&()>).await?;
        serde_json::from_value(value)
            .map_err(|e| Error::Transport(format!("Failed to parse response: {e}")))
    }

    /// Send a request with an optional JSON body and return the decoded
    /// response body (`Value::Null` when the body is empty or not JSON).
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails, and a server error on
    /// non-2xx responses.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Value, Error> {
        let url = self.url_for(segments)?;
        let idempotent = method != Method::POST;
        debug!(%method, %url, "sending request");

        self.execute_with_retry(idempotent, || {
            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(b) = body {
                request = request.json(b);
            }
            request.send()
        })
        .await
    }

    async fn execute_with_retry<F, Fut>(
        &self,
        idempotent: bool,
        request_fn: F,
    ) -> Result<Value, Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut attempt = 0;
        loop {
            let result = match request_fn().await {
                Ok(response) => Self::read_response(response).await,
                Err(e) => Err(transport_error(&e)),
            };

            match result {
                Err(error) if idempotent && self.should_retry(&error, attempt) => {
                    let wait_time = self.get_backoff_time(attempt);
                    warn!(attempt, wait_secs = wait_time, %error, "retrying request");
                    tokio::time::sleep(Duration::from_secs_f64(wait_time)).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    /// Determine if a failed request should be retried.
    fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        if attempt >= self.retry_config.max_retries {
            return false;
        }

        match error {
            Error::Transport(_) => true,
            Error::Server(err) => self.retry_config.retry_on.contains(&err.status),
            _ => false,
        }
    }

    /// Exponential backoff with jitter, capped at `max_backoff`.
    fn get_backoff_time(&self, attempt: u32) -> f64 {
        let base_wait = self.retry_config.backoff_factor.powi(attempt as i32);

        let wait_time = if self.retry_config.jitter > 0.0 && base_wait > 0.0 {
            let jitter_range = base_wait * self.retry_config.jitter;
            let jitter = thread_rng().gen_range(-jitter_range..jitter_range);
            base_wait + jitter
        } else {
            base_wait
        };

        wait_time.min(self.retry_config.max_backoff)
    }

    async fn read_response(response: Response) -> Result<Value, Error> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response: {e}")))?;

        // Empty or non-JSON bodies decode as null; callers that need a
        // document fail when converting it.
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        if status.is_success() {
            return Ok(body);
        }

        Err(ServerError::from_body(status.as_u16(), &body).into())
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

fn transport_error(error: &reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Transport("Request timed out".to_string())
    } else if error.is_connect() {
        Error::Transport(format!("Could not reach server: {error}"))
    } else {
        Error::Transport(format!("Request failed: {error}"))
    }
}
