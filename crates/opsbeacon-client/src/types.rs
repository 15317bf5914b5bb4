//! Request and response types for the OpsBeacon API.
//!
//! These types mirror the server's wire contract. List endpoints wrap their
//! payload in a named array field; the wrapper types here are what the raw
//! responses deserialize into before the accessors unwrap them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Commands & Connections
// ─────────────────────────────────────────────────────────────────────────────

/// A command available in the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Command ID.
    #[serde(default)]
    pub id: String,
    /// Command name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Request to register a new command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCommand {
    /// Command name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// A connection configured in the workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Connection ID.
    #[serde(default)]
    pub id: String,
    /// Connection name.
    pub name: String,
    /// Connection type, e.g. "ssh".
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// Response for list commands.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandList {
    /// The commands in the workspace.
    #[serde(default)]
    pub commands: Vec<Command>,
}

/// Response for list connections.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionList {
    /// The connections in the workspace.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Users & Groups
// ─────────────────────────────────────────────────────────────────────────────

/// A workspace user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    #[serde(default)]
    pub id: String,
    /// Email address.
    pub email: String,
    /// Role name.
    #[serde(default)]
    pub role: String,
}

/// Request to create a user. There is no update endpoint; users are
/// created and deleted only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    /// Email address.
    pub email: String,
    /// Role name.
    #[serde(default)]
    pub role: String,
}

/// A workspace group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    /// Group name (the group's identifier).
    pub name: String,
    /// Member user IDs.
    #[serde(default)]
    pub members: Vec<String>,
}

/// Response for list users.
#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    /// The users in the workspace.
    #[serde(default)]
    pub users: Vec<User>,
}

/// Response for list groups.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupList {
    /// The groups in the workspace.
    #[serde(default)]
    pub groups: Vec<Group>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Policies
// ─────────────────────────────────────────────────────────────────────────────

/// An execution policy: a named allow-list of commands and connections.
///
/// The command/connection lists are stored as submitted; the server does
/// not de-duplicate them at this layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Policy {
    /// Policy name (the policy's identifier).
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Allowed command names.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Allowed connection names.
    #[serde(default)]
    pub connections: Vec<String>,
}

/// Response for list policies.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyList {
    /// The policies in the workspace.
    #[serde(default)]
    pub policies: Vec<Policy>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Command execution
// ─────────────────────────────────────────────────────────────────────────────

/// Arguments for structured command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunArgs {
    /// A single string, split with shell-style tokenization (quoted
    /// substrings stay single tokens).
    Line(String),
    /// Already-separated tokens, passed through unchanged.
    List(Vec<String>),
}

impl From<&str> for RunArgs {
    fn from(value: &str) -> Self {
        RunArgs::Line(value.to_string())
    }
}

impl From<String> for RunArgs {
    fn from(value: String) -> Self {
        RunArgs::Line(value)
    }
}

impl From<Vec<String>> for RunArgs {
    fn from(value: Vec<String>) -> Self {
        RunArgs::List(value)
    }
}

impl From<Vec<&str>> for RunArgs {
    fn from(value: Vec<&str>) -> Self {
        RunArgs::List(value.into_iter().map(String::from).collect())
    }
}

/// Request to execute a command.
///
/// Exactly one of the free-text form ([`RunRequest::command_line`]) or the
/// structured form ([`RunRequest::structured`]) must be usable. A non-empty
/// `command_text` takes precedence; otherwise both `connection` and
/// `command` are required.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Free-text command line.
    pub command_text: Option<String>,
    /// Connection identifier (structured form).
    pub connection: Option<String>,
    /// Command name (structured form).
    pub command: Option<String>,
    /// Command arguments (structured form).
    pub args: Option<RunArgs>,
}

impl RunRequest {
    /// Execute a free-text command line.
    pub fn command_line(text: impl Into<String>) -> Self {
        Self {
            command_text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Execute a named command over a named connection.
    pub fn structured(connection: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            connection: Some(connection.into()),
            command: Some(command.into()),
            ..Default::default()
        }
    }

    /// Attach arguments to a structured request.
    pub fn args(mut self, args: impl Into<RunArgs>) -> Self {
        self.args = Some(args.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Triggers
// ─────────────────────────────────────────────────────────────────────────────

/// Trigger kind for MCP triggers.
pub const TRIGGER_KIND_MCP: &str = "mcp";

/// A trigger: a named, server-hosted endpoint configuration.
///
/// `kind` is a closed tag set (`mcp`, `webHook`, `cron`, `link`). MCP
/// operations are only valid when `kind == "mcp"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    /// Trigger name (the trigger's identifier).
    #[serde(default)]
    pub name: String,
    /// Trigger kind.
    #[serde(default)]
    pub kind: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Invocation URL, when provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_url: Option<String>,
    /// Command names the trigger is scoped to.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Connection names the trigger is scoped to.
    #[serde(default)]
    pub connections: Vec<String>,
    /// Policy names applied to the trigger.
    #[serde(default)]
    pub policies: Vec<String>,
    /// MCP-specific configuration, present on `mcp`-kind triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_trigger_info: Option<McpTriggerInfo>,
}

impl Trigger {
    /// Check whether this trigger is a valid target for MCP operations.
    pub fn is_mcp(&self) -> bool {
        self.kind == TRIGGER_KIND_MCP
    }
}

/// MCP-specific trigger configuration.
///
/// Unknown fields are round-tripped so that merge-updates do not drop
/// server-side data this client does not model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTriggerInfo {
    /// The configured tool instances.
    #[serde(default)]
    pub tool_instances: Vec<ToolInstance>,
    /// Fields not modeled by this client, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One configured command+connection pairing exposed as a named callable
/// tool under an MCP trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInstance {
    /// Opaque instance identifier, assigned at creation.
    #[serde(default)]
    pub instance_id: String,
    /// Opaque template identifier, assigned at creation.
    #[serde(default)]
    pub template_id: String,
    /// The tool's externally visible configuration.
    #[serde(default)]
    pub overrides: ToolOverrides,
}

/// Externally visible tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOverrides {
    /// Tool name visible to callers. Unique within a trigger's tool list
    /// (enforced server-side).
    #[serde(default)]
    pub name: String,
    /// Tool description.
    #[serde(default)]
    pub description: String,
    /// Connection the tool executes over.
    #[serde(default)]
    pub connection: String,
    /// Command the tool executes.
    #[serde(default)]
    pub command: String,
    /// Per-argument overrides.
    #[serde(default)]
    pub argument_overrides: BTreeMap<String, Value>,
}

/// Tool configuration for [`TriggersApi::add_tool`](crate::api::TriggersApi::add_tool).
///
/// Unset fields default at insertion time: the name becomes `tool_N` where
/// N is the tool's position in the list, everything else empty.
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    /// Tool name visible to callers.
    pub name: Option<String>,
    /// Tool description.
    pub description: Option<String>,
    /// Connection the tool executes over.
    pub connection: Option<String>,
    /// Command the tool executes.
    pub command: Option<String>,
    /// Per-argument overrides.
    pub arguments: BTreeMap<String, Value>,
}

impl ToolConfig {
    /// Create a tool config with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the connection.
    pub fn connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    /// Set the command.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

/// Request to create an MCP trigger.
#[derive(Debug, Clone, Default)]
pub struct CreateMcpTrigger {
    /// Trigger name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Tool instances to provision.
    pub tool_instances: Vec<ToolInstance>,
    /// Policy names to apply.
    pub policies: Vec<String>,
}

impl CreateMcpTrigger {
    /// Create a request with the given trigger name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the tool instances.
    pub fn tool_instances(mut self, tool_instances: Vec<ToolInstance>) -> Self {
        self.tool_instances = tool_instances;
        self
    }

    /// Set the policies.
    pub fn policies(mut self, policies: Vec<String>) -> Self {
        self.policies = policies;
        self
    }
}

/// Partial update for an MCP trigger. Unset fields keep their prior
/// values; a supplied tool-instance list wholly replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct UpdateMcpTrigger {
    /// New description, or unchanged.
    pub description: Option<String>,
    /// Replacement tool-instance list, or unchanged.
    pub tool_instances: Option<Vec<ToolInstance>>,
}

impl UpdateMcpTrigger {
    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the replacement tool-instance list.
    pub fn tool_instances(mut self, tool_instances: Vec<ToolInstance>) -> Self {
        self.tool_instances = Some(tool_instances);
        self
    }
}

/// Success envelope returned by MCP trigger creation.
///
/// The API token is only returned at creation time and cannot be retrieved
/// later; persist it immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTriggerCreated {
    /// Always true in this envelope.
    pub success: bool,
    /// The trigger name.
    pub name: String,
    /// The MCP server URL.
    pub url: String,
    /// The trigger-scoped bearer token. Save it now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Human-readable confirmation.
    pub message: String,
}

/// Outcome of [`TriggersApi::create_mcp`](crate::api::TriggersApi::create_mcp).
///
/// The server's response shape is not fully pinned down; responses that are
/// neither the URL-bearing success shape nor an error are passed through
/// unmodified as [`McpCreateResponse::Other`].
#[derive(Debug, Clone)]
pub enum McpCreateResponse {
    /// The trigger was created and the server returned its URL.
    Created(McpTriggerCreated),
    /// The server answered with an unrecognized shape.
    Other(Value),
}

/// Response for list triggers.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerList {
    /// The triggers in the workspace.
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

/// Source for a file upload: either in-memory content with an explicit
/// name, or a local path checked for existence before any network call.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// In-memory content. The name is required.
    Content {
        /// Name for the uploaded file.
        name: String,
        /// File content.
        content: Vec<u8>,
    },
    /// A local file. The name defaults to the file's basename.
    Path {
        /// Path to the local file.
        path: std::path::PathBuf,
        /// Optional name override.
        name: Option<String>,
    },
}

impl UploadSource {
    /// Upload in-memory content under the given name.
    pub fn content(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::Content {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Upload a local file under its own name.
    pub fn path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::Path {
            path: path.into(),
            name: None,
        }
    }

    /// Upload a local file under a different name.
    pub fn path_named(path: impl Into<std::path::PathBuf>, name: impl Into<String>) -> Self {
        Self::Path {
            path: path.into(),
            name: Some(name.into()),
        }
    }
}

/// Response from the file-url endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FileUrlResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub err: Option<String>,
}
