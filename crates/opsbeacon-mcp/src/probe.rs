//! Connectivity probe for MCP trigger endpoints.
//!
//! Drives the fixed three-step exchange — `initialize`, `tools/list`,
//! `tools/call` — against a trigger URL with its trigger-scoped bearer
//! token (not the workspace API token). Each step's raw response or
//! captured failure is retained separately so callers can tell which step
//! broke.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{McpError, Result};
use crate::protocol::{CallToolParams, InitializeParams, JsonRpcRequest, ToolInfo};

/// Default timeout for probe requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one probe step.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProbeStep {
    /// The raw JSON-RPC response.
    Response(Value),
    /// The step failed before a usable response was obtained.
    Failed {
        /// Description of the failure.
        error: String,
    },
    /// The step was skipped.
    Skipped {
        /// Why the step did not run.
        message: String,
    },
}

impl ProbeStep {
    /// Check whether this step produced a response.
    pub fn is_response(&self) -> bool {
        matches!(self, ProbeStep::Response(_))
    }
}

/// Result of a probe run.
///
/// A step that never ran (because an earlier one failed) is `None`.
/// `success` is true iff the `tools/call` response contained a `result`
/// key; an `error` key alone, a transport failure, or an empty tool list
/// all leave it false.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeReport {
    /// Outcome of the `initialize` step.
    pub initialize: Option<ProbeStep>,
    /// Outcome of the `tools/list` step.
    pub tools: Option<ProbeStep>,
    /// Outcome of the `tools/call` step.
    pub execution: Option<ProbeStep>,
    /// Whether the full sequence succeeded.
    pub success: bool,
}

/// MCP endpoint probe.
///
/// # Example
///
/// ```no_run
/// use opsbeacon_mcp::McpProbe;
///
/// # async fn example() -> opsbeacon_mcp::Result<()> {
/// let probe = McpProbe::new("https://triggers.opsbeacon.com/mcp/abc", "trigger-token")?;
/// let report = probe.run(Some("disk_usage")).await;
/// println!("success: {}", report.success);
/// # Ok(())
/// # }
/// ```
pub struct McpProbe {
    /// HTTP client with the trigger-scoped bearer token.
    http: reqwest::Client,
    /// The trigger's MCP endpoint URL.
    url: String,
    /// Per-request timeout.
    timeout: Duration,
}

impl McpProbe {
    /// Create a probe for the given MCP endpoint.
    ///
    /// Fails with a validation error when the URL or token is empty.
    pub fn new(mcp_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        let url = mcp_url.into();
        if url.is_empty() {
            return Err(McpError::validation_field("mcp_url is required", "mcp_url"));
        }
        let token = api_token.into();
        if token.is_empty() {
            return Err(McpError::validation_field(
                "api_token is required",
                "api_token",
            ));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| McpError::validation_field("api_token contains invalid characters", "api_token"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| McpError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the three-step probe sequence.
    ///
    /// When `tool_name` is given and present in the listed tools, that tool
    /// is called; otherwise the first listed tool is. The call always uses
    /// empty arguments. Never returns an error: failures are captured in
    /// the report.
    pub async fn run(&self, tool_name: Option<&str>) -> ProbeReport {
        let mut report = ProbeReport::default();

        // 1. initialize
        let params = match serde_json::to_value(InitializeParams::default()) {
            Ok(v) => v,
            Err(e) => {
                report.initialize = Some(ProbeStep::Failed {
                    error: e.to_string(),
                });
                return report;
            }
        };
        match self.send(JsonRpcRequest::new(1, "initialize", Some(params))).await {
            Ok(response) => report.initialize = Some(ProbeStep::Response(response)),
            Err(error) => {
                tracing::warn!(url = %self.url, %error, "initialize failed");
                report.initialize = Some(ProbeStep::Failed { error });
                return report;
            }
        }

        // 2. tools/list
        let tools = match self
            .send(JsonRpcRequest::new(2, "tools/list", Some(json!({}))))
            .await
        {
            Ok(response) => {
                let tools = listed_tools(&response);
                report.tools = Some(ProbeStep::Response(response));
                tools
            }
            Err(error) => {
                tracing::warn!(url = %self.url, %error, "tools/list failed");
                report.tools = Some(ProbeStep::Failed { error });
                return report;
            }
        };

        // 3. tools/call
        if tools.is_empty() {
            report.execution = Some(ProbeStep::Skipped {
                message: "No tools available to execute".to_string(),
            });
            return report;
        }

        let selected = tool_name
            .and_then(|name| tools.iter().find(|t| t.name == name))
            .unwrap_or(&tools[0]);

        tracing::debug!(tool = %selected.name, "calling tool");

        let params = CallToolParams {
            name: selected.name.clone(),
            arguments: json!({}),
        };
        let params = match serde_json::to_value(&params) {
            Ok(v) => v,
            Err(e) => {
                report.execution = Some(ProbeStep::Failed {
                    error: e.to_string(),
                });
                return report;
            }
        };
        match self.send(JsonRpcRequest::new(3, "tools/call", Some(params))).await {
            Ok(response) => {
                report.success = response.get("result").is_some();
                report.execution = Some(ProbeStep::Response(response));
            }
            Err(error) => {
                tracing::warn!(url = %self.url, %error, "tools/call failed");
                report.execution = Some(ProbeStep::Failed { error });
            }
        }

        report
    }

    /// POST one JSON-RPC request; any transport or HTTP-status failure
    /// comes back as a captured error string.
    async fn send(&self, request: JsonRpcRequest) -> std::result::Result<Value, String> {
        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| e.to_string())
    }
}

/// Extract the tool list from a `tools/list` response; anything malformed
/// counts as no tools.
fn listed_tools(response: &Value) -> Vec<ToolInfo> {
    response
        .get("result")
        .and_then(|r| r.get("tools"))
        .and_then(|t| serde_json::from_value(t.clone()).ok())
        .unwrap_or_default()
}
