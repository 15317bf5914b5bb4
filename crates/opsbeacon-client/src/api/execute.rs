//! Command execution API.

use serde::Serialize;
use serde_json::Value;

use crate::client::OpsBeaconClient;
use crate::error::{Error, Result};
use crate::types::{RunArgs, RunRequest};

/// Wire body for the execution endpoint.
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
enum ExecuteBody {
    CommandLine {
        #[serde(rename = "commandLine")]
        command_line: String,
    },
    Structured {
        command: String,
        connection: String,
        arguments: Vec<String>,
    },
}

/// Command execution API client.
pub struct ExecuteApi {
    client: OpsBeaconClient,
}

impl ExecuteApi {
    pub(crate) fn new(client: OpsBeaconClient) -> Self {
        Self { client }
    }

    /// Execute a command in the workspace.
    ///
    /// A non-empty `command_text` takes precedence; otherwise both
    /// `connection` and `command` are required. Exactly one execution
    /// request is issued.
    ///
    /// The server conflates transport success with operation success: a
    /// 200 response whose body contains an `error` key or `success: false`
    /// is returned as data, not raised. Interpreting it is the caller's
    /// job; see the `execute` example for the expected handling.
    pub async fn run(&self, request: RunRequest) -> Result<Value> {
        let body = build_body(&request)?;

        let command = match &body {
            ExecuteBody::CommandLine { command_line } => command_line.clone(),
            ExecuteBody::Structured { command, .. } => command.clone(),
        };
        let connection = request.connection.clone();

        tracing::debug!(command = %command, "executing command");

        self.client
            .post::<Value, _>("/trigger/v1/api", &body)
            .await
            .map_err(|e| Error::CommandExecution {
                command: Some(command),
                connection,
                source: Box::new(e),
            })
    }
}

/// Validate a run request and translate it into the wire body.
fn build_body(request: &RunRequest) -> Result<ExecuteBody> {
    if let Some(text) = request.command_text.as_deref().filter(|t| !t.is_empty()) {
        return Ok(ExecuteBody::CommandLine {
            command_line: text.to_string(),
        });
    }

    match (
        request.connection.as_deref().filter(|c| !c.is_empty()),
        request.command.as_deref().filter(|c| !c.is_empty()),
    ) {
        (Some(connection), Some(command)) => Ok(ExecuteBody::Structured {
            command: command.to_string(),
            connection: connection.to_string(),
            arguments: tokenize_args(request.args.as_ref())?,
        }),
        _ => Err(Error::validation(
            "Either command_text or both connection and command are required",
        )),
    }
}

/// Turn the args input into a token list.
///
/// A string is split with shell-style tokenization, so quoted substrings
/// stay single tokens. A list passes through unchanged. Both forms produce
/// identical request bodies for equivalent input.
fn tokenize_args(args: Option<&RunArgs>) -> Result<Vec<String>> {
    match args {
        None => Ok(Vec::new()),
        Some(RunArgs::List(tokens)) => Ok(tokens.clone()),
        Some(RunArgs::Line(line)) => {
            if line.is_empty() {
                return Ok(Vec::new());
            }
            shlex::split(line).ok_or_else(|| {
                Error::validation_field("args contain unbalanced quotes", "args")
            })
        }
    }
}
