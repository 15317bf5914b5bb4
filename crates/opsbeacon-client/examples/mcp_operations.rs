//! Walk through the MCP trigger lifecycle: list, create, add and remove a
//! tool, then delete.
//!
//! Usage:
//!   OPSBEACON_API_TOKEN=... cargo run --example mcp_operations

use std::env;

use opsbeacon_client::{
    CreateMcpTrigger, McpCreateResponse, OpsBeaconClient, ToolConfig, ToolInstance, ToolOverrides,
};

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

    let client = OpsBeaconClient::builder()
        .api_domain(api_domain)
        .api_token(api_token)
        .build()?;
    let triggers = client.triggers();

    println!("1. Listing all triggers:");
    let all = triggers.list().await?;
    println!("   Found {} total triggers", all.len());

    println!("2. Listing MCP triggers:");
    for trigger in triggers.mcp().await? {
        println!("   - {}: {}", trigger.name, trigger.description);
        if let Some(url) = &trigger.trigger_url {
            println!("     URL: {url}");
        }
    }

    let trigger_name = format!("demo-mcp-{}", uuid_suffix());
    println!("3. Creating MCP trigger '{trigger_name}':");

    let tool = ToolInstance {
        instance_id: "disk-usage".to_string(),
        template_id: "disk-usage".to_string(),
        overrides: ToolOverrides {
            name: "disk_usage".to_string(),
            description: "Check disk usage on the devcontroller server".to_string(),
            connection: "devcontroller".to_string(),
            command: "df".to_string(),
            ..Default::default()
        },
    };

    let created = triggers
        .create_mcp(
            CreateMcpTrigger::new(&trigger_name)
                .description("Demo MCP server with system monitoring tools")
                .tool_instances(vec![tool]),
        )
        .await?;

    match created {
        McpCreateResponse::Created(envelope) => {
            println!("   Created: {}", envelope.message);
            println!("   MCP Server URL: {}", envelope.url);
            if let Some(token) = envelope.api_token {
                // The token is only returned at creation time; it cannot
                // be fetched again later.
                println!("   API token (save it now): {token}");
            }
        }
        McpCreateResponse::Other(value) => {
            println!("   Unexpected response shape: {value}");
            return Ok(());
        }
    }

    println!("4. Adding a tool:");
    let updated = triggers
        .add_tool(
            &trigger_name,
            ToolConfig::named("uptime")
                .description("Report server uptime")
                .connection("devcontroller")
                .command("uptime"),
        )
        .await?;
    let tool_count = updated
        .mcp_trigger_info
        .map(|info| info.tool_instances.len())
        .unwrap_or(0);
    println!("   Trigger now has {tool_count} tools");

    println!("5. Removing the tool again:");
    triggers.remove_tool(&trigger_name, "uptime").await?;

    println!("6. Deleting the trigger:");
    triggers.delete(&trigger_name).await?;
    println!("   Done");

    Ok(())
}

/// Short unique suffix so repeated runs do not collide on trigger names.
fn uuid_suffix() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
