//! JSON-RPC protocol types and connectivity probe for OpsBeacon MCP
//! triggers.
//!
//! An `mcp`-kind trigger exposes a JSON-RPC 2.0 tool-calling endpoint at a
//! dynamically provisioned URL, authenticated by a trigger-scoped bearer
//! token issued at creation time. This crate models that protocol surface
//! and provides [`McpProbe`], which verifies an endpoint end to end by
//! driving the fixed `initialize` → `tools/list` → `tools/call` sequence.
//!
//! # Example
//!
//! ```no_run
//! use opsbeacon_mcp::McpProbe;
//!
//! # async fn example() -> opsbeacon_mcp::Result<()> {
//! let probe = McpProbe::new("https://triggers.opsbeacon.com/mcp/abc", "trigger-token")?;
//! let report = probe.run(None).await;
//!
//! if report.success {
//!     println!("endpoint is fully operational");
//! } else {
//!     println!("probe report: {}", serde_json::to_string_pretty(&report).unwrap());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod probe;
pub mod protocol;

pub use error::{McpError, Result};
pub use probe::{McpProbe, ProbeReport, ProbeStep};
pub use protocol::{
    CallToolParams, ClientCapabilities, ClientInfo, InitializeParams, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ToolInfo, JSONRPC_VERSION, MCP_PROTOCOL_VERSION,
};
