//! MCP server transports.
//!
//! # Transports
//!
//! | Command | Transport |
//! |---------|-----------|
//! | `molsen-mcp serve stdio` | JSON-RPC over stdin/stdout (default for desktop MCP clients) |
//! | `molsen-mcp serve http` | Streamable HTTP at `/mcp`, plus `GET /health` |
//!
//! Logs go to stderr so they never interleave with the stdio protocol.
//!
//! # Client configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "molsen": {
//!       "command": "molsen-mcp",
//!       "args": ["serve", "stdio"]
//!     }
//!   }
//! }
//! ```

use axum::{routing::get, Json, Router};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use rmcp::ServiceExt;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::mcp::McpBridge;
use crate::traits::{ToolContext, ToolRegistry};

/// Build the bridge every transport serves: built-in tools over one shared cache.
pub fn build_bridge(config: &Config) -> anyhow::Result<McpBridge> {
    let ctx = ToolContext::from_config(config)?;
    Ok(McpBridge::new(Arc::new(ToolRegistry::with_builtins()), ctx))
}

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn run_stdio(config: &Config) -> anyhow::Result<()> {
    let bridge = build_bridge(config)?;

    tracing::info!(base_url = %config.source.base_url, "molsen.ca-mcp server running on stdio");

    let service = bridge.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

/// Serve MCP over Streamable HTTP on `[server].bind`.
pub async fn run_http(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!(
        base_url = %config.source.base_url,
        "MCP server listening on http://{}/mcp",
        bind_addr
    );

    axum::serve(listener, http_router(config)?).await?;

    Ok(())
}

/// Router with the MCP endpoint and health check, CORS open to all origins.
pub fn http_router(config: &Config) -> anyhow::Result<Router> {
    let bridge = build_bridge(config)?;

    let mcp_service: StreamableHttpService<McpBridge, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(bridge.clone()),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig::default(),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .nest_service("/mcp", mcp_service)
        .route("/health", get(handle_health))
        .layer(cors))
}

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
