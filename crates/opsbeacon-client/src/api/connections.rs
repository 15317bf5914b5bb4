//! Connections API.

use crate::client::OpsBeaconClient;
use crate::error::Result;
use crate::types::{Connection, ConnectionList};

/// Connections API client.
///
/// Connections are read-only from the client's perspective.
pub struct ConnectionsApi {
    client: OpsBeaconClient,
}

impl ConnectionsApi {
    pub(crate) fn new(client: OpsBeaconClient) -> Self {
        Self { client }
    }

    /// Fetch the connections configured in the workspace.
    pub async fn list(&self) -> Result<Vec<Connection>> {
        let response: ConnectionList = self.client.get("/workspace/v2/connections").await?;
        Ok(response.connections)
    }
}
