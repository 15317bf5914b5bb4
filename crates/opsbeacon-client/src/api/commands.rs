//! Commands API.

use crate::client::OpsBeaconClient;
use crate::error::{Error, Result};
use crate::types::{Command, CommandList, NewCommand};

/// Commands API client.
pub struct CommandsApi {
    client: OpsBeaconClient,
}

impl CommandsApi {
    pub(crate) fn new(client: OpsBeaconClient) -> Self {
        Self { client }
    }

    /// Fetch the commands available in the workspace.
    ///
    /// Results are never cached; every call re-fetches from the server.
    pub async fn list(&self) -> Result<Vec<Command>> {
        let response: CommandList = self.client.get("/workspace/v2/commands").await?;
        Ok(response.commands)
    }

    /// Register a new command.
    pub async fn create(&self, command: NewCommand) -> Result<Command> {
        if command.name.is_empty() {
            return Err(Error::validation_field("command name is required", "name"));
        }
        self.client.post("/workspace/v2/commands", &command).await
    }
}
