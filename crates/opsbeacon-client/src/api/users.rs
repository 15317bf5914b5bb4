//! Users API.

use crate::client::OpsBeaconClient;
use crate::error::{Error, Result};
use crate::types::{NewUser, User, UserList};

/// Users API client.
pub struct UsersApi {
    client: OpsBeaconClient,
}

impl UsersApi {
    pub(crate) fn new(client: OpsBeaconClient) -> Self {
        Self { client }
    }

    /// Fetch the users in the workspace.
    pub async fn list(&self) -> Result<Vec<User>> {
        let response: UserList = self.client.get("/workspace/v2/users").await?;
        Ok(response.users)
    }

    /// Add a user to the workspace.
    pub async fn create(&self, user: NewUser) -> Result<User> {
        if user.email.is_empty() {
            return Err(Error::validation_field("user email is required", "email"));
        }
        self.client.post("/workspace/v2/users", &user).await
    }

    /// Delete a user by ID. Returns `true` on success.
    pub async fn delete(&self, user_id: &str) -> Result<bool> {
        if user_id.is_empty() {
            return Err(Error::validation_field("user_id is required", "user_id"));
        }
        self.client
            .delete(&format!("/workspace/v2/users/{user_id}"))
            .await?;
        Ok(true)
    }
}
