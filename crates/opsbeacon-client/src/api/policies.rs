//! Policies API.

use crate::client::OpsBeaconClient;
use crate::error::{Error, Result};
use crate::types::{Policy, PolicyList};

/// Policies API client.
pub struct PoliciesApi {
    client: OpsBeaconClient,
}

impl PoliciesApi {
    pub(crate) fn new(client: OpsBeaconClient) -> Self {
        Self { client }
    }

    /// Fetch the execution policies in the workspace.
    pub async fn list(&self) -> Result<Vec<Policy>> {
        let response: PolicyList = self.client.get("/workspace/v2/policy").await?;
        Ok(response.policies)
    }

    /// Create an execution policy.
    ///
    /// The command/connection lists are submitted as given; the server does
    /// not de-duplicate them.
    pub async fn create(&self, policy: Policy) -> Result<Policy> {
        if policy.name.is_empty() {
            return Err(Error::validation_field("policy name is required", "name"));
        }
        self.client.post("/workspace/v2/policy", &policy).await
    }

    /// Get a policy by name.
    ///
    /// The single-item endpoint is not guaranteed consistent with the list
    /// endpoint, so an API-level failure falls back to scanning the full
    /// list before reporting not-found.
    pub async fn get(&self, name: &str) -> Result<Policy> {
        if name.is_empty() {
            return Err(Error::validation_field("name is required", "name"));
        }
        match self
            .client
            .get::<Policy>(&format!("/workspace/v2/policy/{name}"))
            .await
        {
            Ok(policy) => Ok(policy),
            Err(e) if e.is_api_error() => {
                tracing::debug!(policy = name, error = %e, "direct policy lookup failed, scanning list");
                let all = self.list().await?;
                all.into_iter()
                    .find(|p| p.name == name)
                    .ok_or_else(|| Error::not_found("Policy", name))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a policy by name. Returns `true` on success.
    pub async fn delete(&self, name: &str) -> Result<bool> {
        if name.is_empty() {
            return Err(Error::validation_field("name is required", "name"));
        }
        self.client
            .delete(&format!("/workspace/v2/policy/{name}"))
            .await?;
        Ok(true)
    }
}
