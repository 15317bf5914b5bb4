//! HTTP client SDK for the OpsBeacon workspace automation API.
//!
//! This crate provides a typed client for the OpsBeacon API: commands,
//! connections, users, groups, files, command execution, triggers, and
//! execution policies, plus management helpers for MCP-kind triggers.
//!
//! # Example
//!
//! ```no_run
//! use opsbeacon_client::{OpsBeaconClient, Result, RunRequest};
//!
//! # async fn example() -> Result<()> {
//! let client = OpsBeaconClient::builder()
//!     .api_domain("api.console.opsbeacon.com")
//!     .api_token("your-api-token")
//!     .build()?;
//!
//! // List commands
//! for command in client.commands().list().await? {
//!     println!("{}: {}", command.name, command.description);
//! }
//!
//! // Execute a command
//! let result = client
//!     .execute()
//!     .run(RunRequest::structured("myserver", "check-disk").args("--verbose"))
//!     .await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```
//!
//! # Success signaling caveat
//!
//! The remote API conflates transport success with operation success: an
//! execution request can return HTTP 200 with a body containing an `error`
//! key or `success: false`. The client deliberately preserves that
//! ambiguity — such responses are returned as data, not raised as errors.
//! Callers that care must inspect the returned JSON; the `execute` example
//! shows the expected handling.
//!
//! # API Coverage
//!
//! - **Commands**: list, create
//! - **Connections**: list
//! - **Users**: list, create, delete
//! - **Groups**: list, create, delete
//! - **Files**: upload, signed download URLs, download
//! - **Execute**: free-text or structured command execution
//! - **Triggers**: list/get/delete, MCP trigger create/update, tool
//!   instance add/remove
//! - **Policies**: list, create, get, delete

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, OpsBeaconClient};
pub use error::{Error, Result};
pub use types::*;
