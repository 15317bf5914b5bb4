//! API endpoint implementations.

mod commands;
mod connections;
mod execute;
mod files;
mod groups;
mod policies;
mod triggers;
mod users;

pub use commands::CommandsApi;
pub use connections::ConnectionsApi;
pub use execute::ExecuteApi;
pub use files::FilesApi;
pub use groups::GroupsApi;
pub use policies::PoliciesApi;
pub use triggers::TriggersApi;
pub use users::UsersApi;
