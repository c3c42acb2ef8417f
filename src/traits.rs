//! Tool trait, execution context, and the built-in essay tools.
//!
//! Every query the server offers is a [`Tool`] registered in a
//! [`ToolRegistry`]. The MCP bridge and the CLI both dispatch through it.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                ToolRegistry                  │
//! │  list_essays  get_essay  search_essays       │
//! │  get_framework_overview  get_knowledge_graph │
//! │  get_site_metadata                           │
//! └──────────────┬───────────────────────────────┘
//!                ▼
//!   ToolContext → EssayRepository / GraphService
//!                ▼
//!           FetchClient (TTL cache)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use molsen_mcp::config::Config;
//! use molsen_mcp::traits::{ToolContext, ToolRegistry};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let ctx = ToolContext::from_config(&Config::default())?;
//! let tools = ToolRegistry::with_builtins();
//! let tool = tools.find("search_essays").unwrap();
//! let out = tool.execute(serde_json::json!({ "query": "oracle" }), &ctx).await?;
//! println!("{}", out.text);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::client::FetchClient;
use crate::config::Config;
use crate::error::FetchError;
use crate::essays::EssayRepository;
use crate::framework::{get_framework_overview, FrameworkRequest};
use crate::get::{get_essay, GetEssayRequest};
use crate::graph::{get_knowledge_graph, GraphRequest, GraphService};
use crate::list::{list_essays, ListEssaysRequest};
use crate::models::SiteMetadata;
use crate::search::{search_essays, SearchEssaysRequest};

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// Result of a tool call.
///
/// `is_error` marks an expected, user-facing condition (unknown slug or graph
/// id). Upstream failures are not represented here; they come back as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Arguments that do not match a tool's parameter schema.
#[derive(Debug, Error)]
#[error("invalid parameters for {tool}: {message}")]
pub struct InvalidParams {
    pub tool: String,
    pub message: String,
}

/// A query exposed to MCP clients.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as seen by MCP clients (e.g. `"get_essay"`).
    fn name(&self) -> &str;

    /// One-line description for agent discovery.
    fn description(&self) -> &str;

    /// JSON Schema for the arguments object.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. Fails with [`InvalidParams`] when `params` do not decode,
    /// or with a [`FetchError`] when the upstream site cannot be read.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolOutput>;
}

/// Decode a JSON arguments object into a typed request.
///
/// A missing or `null` arguments object is treated as `{}`.
pub fn parse_params<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T> {
    let params = match params {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| {
        InvalidParams {
            tool: tool.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Shared handles every tool call runs against.
///
/// Cloning is cheap and every clone shares one cache, so a context built once
/// at startup serves all MCP sessions.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    client: Arc<FetchClient>,
    essays: EssayRepository,
    graph: GraphService,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, client: Arc<FetchClient>) -> Self {
        let essays = EssayRepository::new(client.clone(), config.source.essays_path.clone());
        let graph = GraphService::new(client.clone(), config.source.graph_path.clone());
        Self {
            config,
            client,
            essays,
            graph,
        }
    }

    /// Build a context with its own HTTP client and an empty cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Arc::new(FetchClient::from_config(config)?);
        Ok(Self::new(Arc::new(config.clone()), client))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn essays(&self) -> &EssayRepository {
        &self.essays
    }

    pub fn graph(&self) -> &GraphService {
        &self.graph
    }

    pub async fn metadata(&self) -> Result<SiteMetadata, FetchError> {
        self.client
            .fetch_with_cache(&self.config.source.metadata_path)
            .await
    }

    /// Invalidate every cached resource.
    pub fn clear_cache(&self) {
        self.client.clear_cache();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Tool Implementations
// ═══════════════════════════════════════════════════════════════════════

const ESSAY_TYPES: [&str; 7] = [
    "hub",
    "foundational",
    "core",
    "theoretical",
    "applied",
    "empirical",
    "practice",
];

pub struct ListEssaysTool;

#[async_trait]
impl Tool for ListEssaysTool {
    fn name(&self) -> &str {
        "list_essays"
    }

    fn description(&self) -> &str {
        "List essays from molsen.ca. Can filter by type, tags, or get framework essays in reading order."
    }

    fn parameters_schema(&self) -> Value {
        let mut types: Vec<&str> = ESSAY_TYPES.to_vec();
        types.push("all");
        json!({
            "type": "object",
            "properties": {
                "type": { "type": "string", "enum": types, "default": "all", "description": "Filter by essay type" },
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Filter by tags (e.g., [\"AI Governance\", \"Professional Practice\"])"
                },
                "frameworkOnly": { "type": "boolean", "default": false, "description": "Return only framework essays in reading order" },
                "includeContent": { "type": "boolean", "default": false, "description": "Include full essay content in response" }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolOutput> {
        let req: ListEssaysRequest = parse_params(self.name(), params)?;
        list_essays(ctx, &req).await
    }
}

pub struct GetEssayTool;

#[async_trait]
impl Tool for GetEssayTool {
    fn name(&self) -> &str {
        "get_essay"
    }

    fn description(&self) -> &str {
        "Retrieve a specific essay by its slug. Returns full content, summary, or markdown format."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "slug": { "type": "string", "description": "Essay slug (e.g., \"executable-knowledge-architecture\")" },
                "format": {
                    "type": "string",
                    "enum": ["full", "summary", "markdown"],
                    "default": "full",
                    "description": "Response format: full (plain text), summary (metadata only), markdown (raw)"
                }
            },
            "required": ["slug"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolOutput> {
        let req: GetEssayRequest = parse_params(self.name(), params)?;
        get_essay(ctx, &req).await
    }
}

pub struct SearchEssaysTool;

#[async_trait]
impl Tool for SearchEssaysTool {
    fn name(&self) -> &str {
        "search_essays"
    }

    fn description(&self) -> &str {
        "Search essays by keyword. Searches title, description, and content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query to match against title, description, and content" },
                "tags": { "type": "array", "items": { "type": "string" }, "description": "Filter results by tags" },
                "type": { "type": "string", "enum": ESSAY_TYPES, "description": "Filter results by essay type" },
                "limit": { "type": "integer", "minimum": 0, "default": 10, "description": "Maximum number of results" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolOutput> {
        let req: SearchEssaysRequest = parse_params(self.name(), params)?;
        search_essays(ctx, &req).await
    }
}

pub struct FrameworkTool;

#[async_trait]
impl Tool for FrameworkTool {
    fn name(&self) -> &str {
        "get_framework_overview"
    }

    fn description(&self) -> &str {
        "Get an overview of the \"Making AI Make Sense\" framework with its essays and structure."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "depth": {
                    "type": "string",
                    "enum": ["overview", "detailed", "full"],
                    "default": "overview",
                    "description": "Level of detail: overview (titles/descriptions), detailed (includes structure), full (includes all content)"
                }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolOutput> {
        let req: FrameworkRequest = parse_params(self.name(), params)?;
        get_framework_overview(ctx, &req).await
    }
}

pub struct KnowledgeGraphTool;

#[async_trait]
impl Tool for KnowledgeGraphTool {
    fn name(&self) -> &str {
        "get_knowledge_graph"
    }

    fn description(&self) -> &str {
        "Get the knowledge graph showing relationships between essays. Optionally filter by essay or connection type."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "essay": { "type": "string", "description": "Optional: Get connections for a specific essay (graph node id, e.g. \"eka\")" },
                "connectionType": {
                    "type": "string",
                    "enum": ["core", "soft", "all"],
                    "default": "all",
                    "description": "Filter by connection type"
                }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolOutput> {
        let req: GraphRequest = parse_params(self.name(), params)?;
        get_knowledge_graph(ctx, &req).await
    }
}

pub struct SiteMetadataTool;

#[async_trait]
impl Tool for SiteMetadataTool {
    fn name(&self) -> &str {
        "get_site_metadata"
    }

    fn description(&self) -> &str {
        "Get molsen.ca site information, essay count, API endpoints, and last update time."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<ToolOutput> {
        let metadata = ctx.metadata().await?;
        Ok(ToolOutput::text(serde_json::to_string_pretty(&metadata)?))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Ordered collection of tools, looked up by name.
///
/// # Example
///
/// ```rust
/// use molsen_mcp::traits::ToolRegistry;
///
/// let tools = ToolRegistry::with_builtins();
/// assert!(tools.find("get_essay").is_some());
/// ```
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry with every essay, framework, graph and metadata tool.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ListEssaysTool));
        registry.register(Box::new(GetEssayTool));
        registry.register(Box::new(SearchEssaysTool));
        registry.register(Box::new(FrameworkTool));
        registry.register(Box::new(KnowledgeGraphTool));
        registry.register(Box::new(SiteMetadataTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
