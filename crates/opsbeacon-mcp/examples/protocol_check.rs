//! Probe an MCP trigger endpoint end to end.
//!
//! Usage:
//!   OPSBEACON_MCP_URL=... OPSBEACON_MCP_TOKEN=... \
//!       cargo run --example protocol_check -- [tool-name]
//!
//! The URL and token come from creating an MCP trigger; the token is only
//! issued at creation time.

use std::env;

use opsbeacon_mcp::McpProbe;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mcp_url = match env::var("OPSBEACON_MCP_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Error: OPSBEACON_MCP_URL environment variable is required");
            std::process::exit(1);
        }
    };
    let mcp_token = match env::var("OPSBEACON_MCP_TOKEN") {
        Ok(token) => token,
        Err(_) => {
            eprintln!("Error: OPSBEACON_MCP_TOKEN environment variable is required");
            std::process::exit(1);
        }
    };
    let tool_name = env::args().nth(1);

    let probe = McpProbe::new(mcp_url, mcp_token)?;
    let report = probe.run(tool_name.as_deref()).await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.success {
        println!("MCP endpoint is fully operational");
        Ok(())
    } else {
        eprintln!("MCP probe failed; see the per-step results above");
        std::process::exit(1);
    }
}
