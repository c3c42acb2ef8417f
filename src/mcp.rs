//! MCP JSON-RPC protocol bridge.
//!
//! Adapts the [`ToolRegistry`] to rmcp's [`ServerHandler`], so the same
//! bridge serves both the stdio transport and the Streamable HTTP endpoint.
//!
//! Outcome mapping for `call_tool`:
//!
//! | Tool result | MCP response |
//! |-------------|--------------|
//! | `Ok(ToolOutput { is_error: false, .. })` | success content |
//! | `Ok(ToolOutput { is_error: true, .. })` | `isError: true` content |
//! | `Err(InvalidParams)` | `invalid_params` error |
//! | any other `Err` (upstream fetch) | `internal_error` |

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};

use crate::traits::{InvalidParams, ToolContext, ToolOutput, ToolRegistry};

/// Bridges the tool registry to the MCP JSON-RPC protocol.
///
/// Each MCP session receives a clone of this struct; the registry and the
/// context's cache are shared across all of them.
#[derive(Clone)]
pub struct McpBridge {
    tools: Arc<ToolRegistry>,
    ctx: ToolContext,
}

impl McpBridge {
    pub fn new(tools: Arc<ToolRegistry>, ctx: ToolContext) -> Self {
        Self { tools, ctx }
    }

    /// Convert a tool into an rmcp `Tool` descriptor.
    fn to_mcp_tool(tool: &dyn crate::traits::Tool) -> Tool {
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> =
            match tool.parameters_schema() {
                serde_json::Value::Object(map) => Arc::new(map),
                _ => Arc::new(serde_json::Map::new()),
            };

        Tool {
            name: Cow::Owned(tool.name().to_string()),
            title: None,
            description: Some(Cow::Owned(tool.description().to_string())),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(true)),
            execution: None,
            icons: None,
            meta: None,
        }
    }

    /// Run a tool by name and map its outcome onto the MCP result shape.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallToolResult, McpError> {
        let tool = self.tools.find(name).ok_or_else(|| {
            McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("no tool registered with name: {}", name),
                None,
            )
        })?;

        let params = arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        match tool.execute(params, &self.ctx).await {
            Ok(ToolOutput {
                text,
                is_error: false,
            }) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Ok(ToolOutput {
                text,
                is_error: true,
            }) => Ok(CallToolResult::error(vec![Content::text(text)])),
            Err(e) if e.downcast_ref::<InvalidParams>().is_some() => Err(McpError::new(
                ErrorCode::INVALID_PARAMS,
                e.to_string(),
                None,
            )),
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool call failed");
                Err(McpError::new(
                    ErrorCode::INTERNAL_ERROR,
                    format!("{}: {}", name, e),
                    None,
                ))
            }
        }
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "molsen.ca-mcp".to_string(),
                title: Some("molsen.ca essays".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: Some(self.ctx.config().source.base_url.clone()),
            },
            instructions: Some(
                "Essays from molsen.ca and the knowledge graph linking them. \
                 Use list_essays or search_essays to find essays, get_essay to read one by slug, \
                 get_framework_overview for the curated reading path, and get_knowledge_graph \
                 for relationships. Graph nodes use short ids (e.g. \"eka\"), not essay slugs; \
                 call get_knowledge_graph without arguments to discover them."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .tools
            .tools()
            .iter()
            .map(|t| Self::to_mcp_tool(t.as_ref()))
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools.find(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "call_tool");
        self.dispatch(&request.name, request.arguments).await
    }
}
