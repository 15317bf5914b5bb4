//! Groups API.

use crate::client::OpsBeaconClient;
use crate::error::{Error, Result};
use crate::types::{Group, GroupList};

/// Groups API client.
pub struct GroupsApi {
    client: OpsBeaconClient,
}

impl GroupsApi {
    pub(crate) fn new(client: OpsBeaconClient) -> Self {
        Self { client }
    }

    /// Fetch the groups in the workspace.
    pub async fn list(&self) -> Result<Vec<Group>> {
        let response: GroupList = self.client.get("/workspace/v2/policy/group").await?;
        Ok(response.groups)
    }

    /// Add a group to the workspace.
    pub async fn create(&self, group: Group) -> Result<Group> {
        if group.name.is_empty() {
            return Err(Error::validation_field("group name is required", "name"));
        }
        self.client.post("/workspace/v2/policy/group", &group).await
    }

    /// Delete a group by name. Returns `true` on success.
    pub async fn delete(&self, group_name: &str) -> Result<bool> {
        if group_name.is_empty() {
            return Err(Error::validation_field(
                "group_name is required",
                "group_name",
            ));
        }
        self.client
            .delete(&format!("/workspace/v2/policy/group/{group_name}"))
            .await?;
        Ok(true)
    }
}
