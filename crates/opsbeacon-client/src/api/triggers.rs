//! Triggers API, including MCP trigger management.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::client::OpsBeaconClient;
use crate::error::{Error, Result};
use crate::types::{
    CreateMcpTrigger, McpCreateResponse, McpTriggerCreated, McpTriggerInfo, ToolConfig,
    ToolInstance, ToolOverrides, Trigger, TriggerList, UpdateMcpTrigger, TRIGGER_KIND_MCP,
};

/// Wire payload for trigger create/update requests.
///
/// Create carries the policy list; update does not touch it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TriggerPayload {
    name: String,
    kind: &'static str,
    description: String,
    commands: Vec<String>,
    connections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    policies: Option<Vec<String>>,
    mcp_trigger_info: McpTriggerInfo,
}

/// Triggers API client.
pub struct TriggersApi {
    client: OpsBeaconClient,
}

impl TriggersApi {
    pub(crate) fn new(client: OpsBeaconClient) -> Self {
        Self { client }
    }

    /// Fetch all triggers in the workspace.
    pub async fn list(&self) -> Result<Vec<Trigger>> {
        let response: TriggerList = self.client.get("/workspace/v2/triggers").await?;
        Ok(response.triggers)
    }

    /// Fetch triggers of one kind (e.g. `mcp`, `webHook`, `cron`, `link`),
    /// preserving the server's relative order.
    pub async fn list_kind(&self, kind: &str) -> Result<Vec<Trigger>> {
        let mut triggers = self.list().await?;
        triggers.retain(|t| t.kind == kind);
        Ok(triggers)
    }

    /// Fetch the MCP triggers in the workspace.
    pub async fn mcp(&self) -> Result<Vec<Trigger>> {
        self.list_kind(TRIGGER_KIND_MCP).await
    }

    /// Get a trigger by name.
    ///
    /// The single-item endpoint is not guaranteed consistent with the list
    /// endpoint; when the direct lookup fails at the API level, the full
    /// list is scanned by name before reporting not-found.
    pub async fn get(&self, name: &str) -> Result<Trigger> {
        if name.is_empty() {
            return Err(Error::validation_field("name is required", "name"));
        }

        match self
            .client
            .get::<Trigger>(&format!("/workspace/v2/triggers/{name}"))
            .await
        {
            Ok(trigger) => Ok(trigger),
            Err(e) if e.is_api_error() => {
                tracing::debug!(trigger = name, error = %e, "direct trigger lookup failed, scanning list");
                let all = self.list().await?;
                all.into_iter()
                    .find(|t| t.name == name)
                    .ok_or_else(|| Error::not_found("Trigger", name))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a trigger by name. Returns `true` on success.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        if name.is_empty() {
            return Err(Error::validation_field("name is required", "name"));
        }
        self.client
            .delete(&format!("/workspace/v2/triggers/{name}"))
            .await?;
        Ok(true)
    }

    /// Get the MCP server URL for a trigger.
    ///
    /// Returns `None` when the trigger does not exist or is not MCP-kind.
    pub async fn mcp_url(&self, name: &str) -> Result<Option<String>> {
        if name.is_empty() {
            return Err(Error::validation_field("name is required", "name"));
        }
        match self.get(name).await {
            Ok(trigger) if trigger.is_mcp() => Ok(trigger.trigger_url),
            Ok(_) => Ok(None),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create an MCP trigger.
    ///
    /// The `commands`/`connections` scopes are derived from the tool
    /// instances and de-duplicated (set semantics; the resulting order is
    /// unspecified).
    ///
    /// The API token in the returned envelope is only available at
    /// creation time and cannot be retrieved later; persist it
    /// immediately. Responses that are neither the URL-bearing success
    /// shape nor a server error pass through as
    /// [`McpCreateResponse::Other`].
    pub async fn create_mcp(&self, request: CreateMcpTrigger) -> Result<McpCreateResponse> {
        if request.name.is_empty() {
            return Err(Error::validation_field("name is required", "name"));
        }

        let (commands, connections) = derive_scopes(&request.tool_instances);
        let payload = TriggerPayload {
            name: request.name.clone(),
            kind: TRIGGER_KIND_MCP,
            description: request.description,
            commands,
            connections,
            policies: Some(request.policies),
            mcp_trigger_info: McpTriggerInfo {
                tool_instances: request.tool_instances,
                extra: Default::default(),
            },
        };

        tracing::debug!(trigger = %request.name, "creating MCP trigger");

        let name = request.name;
        let result: Value = self
            .client
            .post("/workspace/v2/triggers", &payload)
            .await
            .map_err(|e| wrap_mcp(e, &name, "Failed to create MCP trigger"))?;

        if let Some(url) = result.get("url").and_then(Value::as_str).filter(|u| !u.is_empty()) {
            return Ok(McpCreateResponse::Created(McpTriggerCreated {
                success: true,
                name: name.clone(),
                url: url.to_string(),
                api_token: result
                    .get("apiToken")
                    .and_then(Value::as_str)
                    .map(String::from),
                message: format!("MCP trigger '{name}' created successfully"),
            }));
        }

        if let Some(err) = result.get("err").and_then(Value::as_str) {
            return Err(Error::Mcp {
                trigger: Some(name),
                message: err.to_string(),
                source: None,
            });
        }

        Ok(McpCreateResponse::Other(result))
    }

    /// Update an MCP trigger.
    ///
    /// This is a merge-update: unset fields keep their prior values. A
    /// supplied tool-instance list wholly replaces the old one and the
    /// `commands`/`connections` scopes are recomputed from it; otherwise
    /// the existing scopes are preserved unchanged.
    ///
    /// Fails with an MCP error when the named trigger is not MCP-kind.
    pub async fn update_mcp(&self, name: &str, update: UpdateMcpTrigger) -> Result<Trigger> {
        if name.is_empty() {
            return Err(Error::validation_field("name is required", "name"));
        }
        let existing = self.get(name).await?;
        self.push_update(existing, update).await
    }

    /// Add a tool to an existing MCP trigger.
    ///
    /// A fresh instance/template identifier is generated; an unnamed tool
    /// defaults to `tool_N` where N is its position in the list. Issues
    /// one read and one write.
    pub async fn add_tool(&self, trigger_name: &str, tool: ToolConfig) -> Result<Trigger> {
        if trigger_name.is_empty() {
            return Err(Error::validation_field(
                "trigger_name is required",
                "trigger_name",
            ));
        }

        let trigger = self.get(trigger_name).await?;
        require_mcp(&trigger)?;

        let mut instances = trigger
            .mcp_trigger_info
            .as_ref()
            .map(|info| info.tool_instances.clone())
            .unwrap_or_default();

        let instance_id = Uuid::new_v4().to_string();
        let position = instances.len() + 1;
        instances.push(ToolInstance {
            instance_id: instance_id.clone(),
            template_id: instance_id,
            overrides: ToolOverrides {
                name: tool.name.unwrap_or_else(|| format!("tool_{position}")),
                description: tool.description.unwrap_or_default(),
                connection: tool.connection.unwrap_or_default(),
                command: tool.command.unwrap_or_default(),
                argument_overrides: tool.arguments,
            },
        });

        self.push_update(trigger, UpdateMcpTrigger::default().tool_instances(instances))
            .await
    }

    /// Remove a tool from an MCP trigger by its visible name.
    ///
    /// When no tool matches, fails with resource-not-found and issues no
    /// update request.
    pub async fn remove_tool(&self, trigger_name: &str, tool_name: &str) -> Result<Trigger> {
        if trigger_name.is_empty() {
            return Err(Error::validation_field(
                "trigger_name is required",
                "trigger_name",
            ));
        }
        if tool_name.is_empty() {
            return Err(Error::validation_field("tool_name is required", "tool_name"));
        }

        let trigger = self.get(trigger_name).await?;
        require_mcp(&trigger)?;

        let instances = trigger
            .mcp_trigger_info
            .as_ref()
            .map(|info| info.tool_instances.clone())
            .unwrap_or_default();

        let filtered: Vec<ToolInstance> = instances
            .iter()
            .filter(|t| t.overrides.name != tool_name)
            .cloned()
            .collect();

        if filtered.len() == instances.len() {
            return Err(Error::not_found("Tool", tool_name));
        }

        self.push_update(trigger, UpdateMcpTrigger::default().tool_instances(filtered))
            .await
    }

    /// Apply a merge-update to an already-fetched trigger.
    async fn push_update(&self, existing: Trigger, update: UpdateMcpTrigger) -> Result<Trigger> {
        require_mcp(&existing)?;
        let name = existing.name.clone();

        let (commands, connections) = match &update.tool_instances {
            Some(instances) => derive_scopes(instances),
            None => (existing.commands.clone(), existing.connections.clone()),
        };

        let mut info = existing.mcp_trigger_info.unwrap_or_default();
        if let Some(instances) = update.tool_instances {
            info.tool_instances = instances;
        }

        let payload = TriggerPayload {
            name: name.clone(),
            kind: TRIGGER_KIND_MCP,
            description: update.description.unwrap_or(existing.description),
            commands,
            connections,
            policies: None,
            mcp_trigger_info: info,
        };

        tracing::debug!(trigger = %name, "updating MCP trigger");

        self.client
            .put(&format!("/workspace/v2/triggers/{name}"), &payload)
            .await
            .map_err(|e| wrap_mcp(e, &name, "Failed to update MCP trigger"))
    }
}

/// Reject triggers that are not valid targets for MCP operations.
fn require_mcp(trigger: &Trigger) -> Result<()> {
    if trigger.is_mcp() {
        Ok(())
    } else {
        Err(Error::Mcp {
            trigger: Some(trigger.name.clone()),
            message: format!("'{}' is not an MCP trigger", trigger.name),
            source: None,
        })
    }
}

/// Wrap an API-level failure in an MCP error carrying the trigger name.
/// Transport and validation failures propagate unchanged.
fn wrap_mcp(e: Error, trigger: &str, context: &str) -> Error {
    if e.is_api_error() {
        Error::Mcp {
            trigger: Some(trigger.to_string()),
            message: format!("{context}: {e}"),
            source: Some(Box::new(e)),
        }
    } else {
        e
    }
}

/// Derive the de-duplicated command/connection scopes from a tool list.
/// Set semantics: duplicates collapse and the output order is unspecified.
fn derive_scopes(instances: &[ToolInstance]) -> (Vec<String>, Vec<String>) {
    let mut commands = BTreeSet::new();
    let mut connections = BTreeSet::new();
    for instance in instances {
        if !instance.overrides.command.is_empty() {
            commands.insert(instance.overrides.command.clone());
        }
        if !instance.overrides.connection.is_empty() {
            connections.insert(instance.overrides.connection.clone());
        }
    }
    (
        commands.into_iter().collect(),
        connections.into_iter().collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(connection: &str, command: &str) -> ToolInstance {
        ToolInstance {
            overrides: ToolOverrides {
                connection: connection.to_string(),
                command: command.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_derive_scopes_deduplicates() {
        let (commands, connections) = derive_scopes(&[tool("x", "a"), tool("x", "b")]);
        assert_eq!(connections, vec!["x"]);
        assert_eq!(commands.len(), 2);
        assert!(commands.contains(&"a".to_string()));
        assert!(commands.contains(&"b".to_string()));
    }

    #[test]
    fn test_derive_scopes_skips_empty() {
        let (commands, connections) = derive_scopes(&[tool("", ""), tool("x", "a")]);
        assert_eq!(commands, vec!["a"]);
        assert_eq!(connections, vec!["x"]);
    }

    #[test]
    fn test_require_mcp_rejects_other_kinds() {
        let trigger = Trigger {
            name: "hook".to_string(),
            kind: "webHook".to_string(),
            ..Default::default()
        };
        let err = require_mcp(&trigger).unwrap_err();
        match err {
            Error::Mcp { trigger, .. } => assert_eq!(trigger.as_deref(), Some("hook")),
            other => panic!("expected MCP error, got {other:?}"),
        }
    }

    #[test]
    fn test_update_payload_skips_policies_when_absent() {
        let payload = TriggerPayload {
            name: "t".to_string(),
            kind: TRIGGER_KIND_MCP,
            description: String::new(),
            commands: vec![],
            connections: vec![],
            policies: None,
            mcp_trigger_info: McpTriggerInfo::default(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("policies").is_none());
        assert!(value.get("mcpTriggerInfo").is_some());
    }
}
