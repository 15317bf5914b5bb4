//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::api::{
    CommandsApi, ConnectionsApi, ExecuteApi, FilesApi, GroupsApi, PoliciesApi, TriggersApi,
    UsersApi,
};
use crate::error::{Error, Result};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OpsBeacon API client.
///
/// Provides typed access to the workspace automation API: commands,
/// connections, users, groups, files, command execution, triggers, and
/// policies.
///
/// The client is cheap to clone; clones share one pooled HTTP connection.
/// Dropping the last clone releases the pool.
///
/// # Example
///
/// ```no_run
/// use opsbeacon_client::OpsBeaconClient;
///
/// # async fn example() -> opsbeacon_client::Result<()> {
/// let client = OpsBeaconClient::builder()
///     .api_domain("api.console.opsbeacon.com")
///     .api_token("your-api-token")
///     .build()?;
///
/// for command in client.commands().list().await? {
///     println!("{}", command.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct OpsBeaconClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
#[derive(Debug)]
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// API domain, trailing slashes stripped.
    pub(crate) api_domain: String,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Whether request/response logging is enabled.
    pub(crate) debug: bool,
    /// Default headers with the Authorization value masked, for logging.
    pub(crate) masked_headers: Vec<(String, String)>,
}

impl OpsBeaconClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the API domain (trailing slashes stripped).
    pub fn api_domain(&self) -> &str {
        &self.inner.api_domain
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the commands API.
    pub fn commands(&self) -> CommandsApi {
        CommandsApi::new(self.clone())
    }

    /// Access the connections API.
    pub fn connections(&self) -> ConnectionsApi {
        ConnectionsApi::new(self.clone())
    }

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the groups API.
    pub fn groups(&self) -> GroupsApi {
        GroupsApi::new(self.clone())
    }

    /// Access the files API.
    pub fn files(&self) -> FilesApi {
        FilesApi::new(self.clone())
    }

    /// Access the command execution API.
    pub fn execute(&self) -> ExecuteApi {
        ExecuteApi::new(self.clone())
    }

    /// Access the triggers API.
    pub fn triggers(&self) -> TriggersApi {
        TriggersApi::new(self.clone())
    }

    /// Access the policies API.
    pub fn policies(&self) -> PoliciesApi {
        PoliciesApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        self.log_request("GET", &url, None);
        let response = self.dispatch(self.inner.http.get(url.clone()), &url).await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        if self.inner.debug {
            let logged = serde_json::to_value(body).unwrap_or(Value::Null);
            self.log_request("POST", &url, Some(&logged));
        }
        let response = self
            .dispatch(self.inner.http.post(url.clone()).json(body), &url)
            .await?;
        self.handle_response(response).await
    }

    /// Make a PUT request with a JSON body.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        if self.inner.debug {
            let logged = serde_json::to_value(body).unwrap_or(Value::Null);
            self.log_request("PUT", &url, Some(&logged));
        }
        let response = self
            .dispatch(self.inner.http.put(url.clone()).json(body), &url)
            .await?;
        self.handle_response(response).await
    }

    /// Make a DELETE request. The response body is discarded.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        self.log_request("DELETE", &url, None);
        let response = self
            .dispatch(self.inner.http.delete(url.clone()), &url)
            .await?;
        self.check_status(response).await
    }

    /// POST a multipart form and return the raw response text.
    ///
    /// reqwest sets the multipart content-type on the request itself, which
    /// takes precedence over the default JSON content-type header.
    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<String> {
        let url = self.url(path)?;
        self.log_request("POST", &url, None);
        let response = self
            .dispatch(self.inner.http.post(url.clone()).multipart(form), &url)
            .await?;
        self.read_success_body(response).await
    }

    /// Send a request, classifying transport-level failures.
    async fn dispatch(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<reqwest::Response> {
        match request.timeout(self.inner.timeout).send().await {
            Ok(response) => Ok(response),
            Err(e) if e.is_timeout() => {
                tracing::error!(%url, "request timed out");
                Err(Error::Timeout {
                    timeout: self.inner.timeout,
                })
            }
            Err(e) if e.is_connect() => {
                tracing::error!(%url, error = %e, "connection failed");
                Err(Error::Connection(format!("failed to connect to {url}")))
            }
            Err(e) => {
                tracing::error!(%url, error = %e, "request failed");
                Err(Error::Api {
                    status: None,
                    message: format!("request failed: {e}"),
                    body: None,
                })
            }
        }
    }

    /// Read the body and parse it as JSON, or classify the error status.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let text = self.read_success_body(response).await?;
        serde_json::from_str(&text).map_err(Error::from)
    }

    /// Check the status and discard the body.
    async fn check_status(&self, response: reqwest::Response) -> Result<()> {
        self.read_success_body(response).await.map(|_| ())
    }

    /// Read the body of a successful response, or classify the error status.
    async fn read_success_body(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let text = response.text().await.map_err(|e| Error::Api {
            status: None,
            message: format!("failed to read response body: {e}"),
            body: None,
        })?;
        self.log_response(status, &text);

        if status.is_success() {
            Ok(text)
        } else {
            Err(Self::response_error(status, retry_after, text))
        }
    }

    /// Classify an HTTP error status into a typed error.
    fn response_error(status: StatusCode, retry_after: Option<u64>, body: String) -> Error {
        match status.as_u16() {
            401 => Error::Auth("Authentication failed. Check your API token.".to_string()),
            403 => Error::Auth("Access forbidden. Check your API token permissions.".to_string()),
            404 => Error::Api {
                status: Some(404),
                message: "Resource not found".to_string(),
                body: Some(body),
            },
            429 => Error::RateLimit { retry_after },
            s => {
                let message = serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| {
                        v.get("err")
                            .or_else(|| v.get("error"))
                            .and_then(|m| m.as_str())
                            .map(String::from)
                    })
                    .unwrap_or_else(|| body.clone());
                Error::Api {
                    status: Some(s),
                    message,
                    body: Some(body),
                }
            }
        }
    }

    /// Log a request in debug mode. The Authorization value is masked and
    /// the raw token never reaches the log.
    fn log_request(&self, method: &str, url: &Url, body: Option<&Value>) {
        if !self.inner.debug {
            return;
        }
        tracing::debug!(method, %url, headers = ?self.inner.masked_headers, "HTTP request");
        if let Some(body) = body {
            tracing::debug!(body = %body, "request body");
        }
    }

    /// Log a response in debug mode.
    fn log_response(&self, status: StatusCode, body: &str) {
        if !self.inner.debug {
            return;
        }
        let preview: String = body.chars().take(500).collect();
        tracing::debug!(status = status.as_u16(), body = %preview, "HTTP response");
    }
}

/// Builder for creating an [`OpsBeaconClient`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    api_domain: Option<String>,
    api_token: Option<String>,
    timeout: Option<Duration>,
    debug: bool,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API domain, e.g. `api.console.opsbeacon.com`.
    ///
    /// The scheme is always HTTPS. A value carrying an explicit scheme
    /// (`http://...`) is used verbatim, which test harnesses use to point
    /// the client at a local mock server.
    pub fn api_domain(mut self, domain: impl Into<String>) -> Self {
        self.api_domain = Some(domain.into());
        self
    }

    /// Set the API token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the request timeout (default 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable request/response logging via `tracing` at debug level.
    ///
    /// The library only emits events; it never installs a subscriber.
    /// The Authorization header value is masked in all logged output.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// Fails with a validation error, before any network activity, when
    /// the domain or token is empty.
    pub fn build(self) -> Result<OpsBeaconClient> {
        let api_domain = self.api_domain.unwrap_or_default();
        let api_domain = api_domain.trim_end_matches('/').to_string();
        if api_domain.is_empty() {
            return Err(Error::validation_field("api_domain is required", "api_domain"));
        }
        let api_token = self.api_token.unwrap_or_default();
        if api_token.is_empty() {
            return Err(Error::validation_field("api_token is required", "api_token"));
        }

        let base_url = if api_domain.contains("://") {
            Url::parse(&api_domain)?
        } else {
            Url::parse(&format!("https://{api_domain}"))?
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("opsbeacon-rust-sdk/{}", env!("CARGO_PKG_VERSION")));

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_token}"))
            .map_err(|_| Error::validation_field("api_token contains invalid characters", "api_token"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let masked_headers = vec![
            ("authorization".to_string(), "***".to_string()),
            ("content-type".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), user_agent.clone()),
        ];

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(OpsBeaconClient {
            inner: Arc::new(ClientInner {
                http,
                api_domain,
                base_url,
                timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
                debug: self.debug,
                masked_headers,
            }),
        })
    }
}
