//! Execute a command on an OpsBeacon connection.
//!
//! Usage:
//!   OPSBEACON_API_TOKEN=... cargo run --example execute -- <connection> <command> [args...]
//!
//! Reads OPSBEACON_API_DOMAIN and OPSBEACON_API_TOKEN from the environment
//! (a local .env file is honored).

use std::env;

use opsbeacon_client::{OpsBeaconClient, RunRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let api_domain = env::var("OPSBEACON_API_DOMAIN")
        .unwrap_or_else(|_| "api.console.opsbeacon.com".to_string());
    let api_token = match env::var("OPSBEACON_API_TOKEN") {
        Ok(token) => token,
        Err(_) => {
            eprintln!("Error: OPSBEACON_API_TOKEN environment variable is required");
            std::process::exit(1);
        }
    };

    let mut args = env::args().skip(1);
    let (connection, command) = match (args.next(), args.next()) {
        (Some(connection), Some(command)) => (connection, command),
        _ => {
            eprintln!("Usage: execute <connection> <command> [args...]");
            std::process::exit(1);
        }
    };
    let command_args: Vec<String> = args.collect();

    let client = OpsBeaconClient::builder()
        .api_domain(api_domain)
        .api_token(api_token)
        .build()?;

    let result = client
        .execute()
        .run(RunRequest::structured(&connection, &command).args(command_args))
        .await?;

    // The API can answer HTTP 200 with an embedded failure. An Ok return
    // only means the request went through; check the body before trusting
    // the outcome.
    let embedded_error = result
        .get("error")
        .and_then(|e| e.as_str())
        .map(String::from);
    let flagged_failure = result.get("success") == Some(&serde_json::json!(false));

    if let Some(error) = embedded_error {
        eprintln!("Command failed: {error}");
        std::process::exit(1);
    }
    if flagged_failure {
        eprintln!("Command failed: {result}");
        std::process::exit(1);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
