//! # molsen-mcp CLI
//!
//! Runs the MCP server, or answers the same queries directly from the
//! command line.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `molsen-mcp serve stdio` | MCP over stdin/stdout |
//! | `molsen-mcp serve http` | MCP over Streamable HTTP |
//! | `molsen-mcp list` | List essays |
//! | `molsen-mcp get <slug>` | Print one essay |
//! | `molsen-mcp search "<query>"` | Search essays |
//! | `molsen-mcp framework` | Framework overview |
//! | `molsen-mcp graph` | Knowledge graph or one node's connections |
//! | `molsen-mcp metadata` | Site metadata |
//! | `molsen-mcp tools` | List MCP tools |
//!
//! ## Examples
//!
//! ```bash
//! molsen-mcp search "oracle" --type core --limit 3
//! molsen-mcp get strong-oracle-trap --format summary
//! molsen-mcp graph --essay eka --connection-type core
//! molsen-mcp --config ./molsen.toml serve http
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use molsen_mcp::config::{self, Config};
use molsen_mcp::server;
use molsen_mcp::traits::{ToolContext, ToolRegistry};

#[derive(Parser)]
#[command(
    name = "molsen-mcp",
    about = "MCP server for molsen.ca essays and their knowledge graph",
    version
)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override `[source].base_url`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server.
    Serve {
        #[command(subcommand)]
        transport: Transport,
    },

    /// List the MCP tools this server exposes.
    Tools,

    #[command(flatten)]
    Query(Query),
}

/// Commands answered by running one tool and printing its output.
#[derive(Subcommand)]
enum Query {
    /// List essays.
    List {
        /// Essay type, or `all`.
        #[arg(long = "type", default_value = "all")]
        essay_type: String,
        /// Keep essays carrying any of these tags (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Only framework essays, in reading order.
        #[arg(long)]
        framework_only: bool,
        /// Include full essay content.
        #[arg(long)]
        include_content: bool,
    },

    /// Print an essay by slug.
    Get {
        slug: String,
        /// `full`, `summary`, or `markdown`.
        #[arg(long, default_value = "full")]
        format: String,
    },

    /// Search essay titles, descriptions and content.
    Search {
        query: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long = "type")]
        essay_type: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show the "Making AI Make Sense" framework.
    Framework {
        /// `overview`, `detailed`, or `full`.
        #[arg(long, default_value = "overview")]
        depth: String,
    },

    /// Show the knowledge graph, or one node's connections.
    Graph {
        /// Graph node id (short code such as `eka`).
        #[arg(long)]
        essay: Option<String>,
        /// `core`, `soft`, or `all`.
        #[arg(long, default_value = "all")]
        connection_type: String,
    },

    /// Show site metadata.
    Metadata,
}

#[derive(Subcommand)]
enum Transport {
    /// JSON-RPC over stdin/stdout.
    Stdio,
    /// Streamable HTTP on `[server].bind`.
    Http,
}

fn load(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    if let Some(url) = &cli.base_url {
        cfg.source.base_url = url.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Tool name and arguments for a query command.
fn tool_call(query: Query) -> (&'static str, Value) {
    match query {
        Query::List {
            essay_type,
            tags,
            framework_only,
            include_content,
        } => {
            let mut params = Map::new();
            params.insert("type".into(), json!(essay_type));
            if !tags.is_empty() {
                params.insert("tags".into(), json!(tags));
            }
            params.insert("frameworkOnly".into(), json!(framework_only));
            params.insert("includeContent".into(), json!(include_content));
            ("list_essays", Value::Object(params))
        }
        Query::Get { slug, format } => ("get_essay", json!({ "slug": slug, "format": format })),
        Query::Search {
            query,
            tags,
            essay_type,
            limit,
        } => {
            let mut params = Map::new();
            params.insert("query".into(), json!(query));
            if !tags.is_empty() {
                params.insert("tags".into(), json!(tags));
            }
            if let Some(t) = essay_type {
                params.insert("type".into(), json!(t));
            }
            params.insert("limit".into(), json!(limit));
            ("search_essays", Value::Object(params))
        }
        Query::Framework { depth } => ("get_framework_overview", json!({ "depth": depth })),
        Query::Graph {
            essay,
            connection_type,
        } => {
            let mut params = Map::new();
            if let Some(id) = essay {
                params.insert("essay".into(), json!(id));
            }
            params.insert("connectionType".into(), json!(connection_type));
            ("get_knowledge_graph", Value::Object(params))
        }
        Query::Metadata => ("get_site_metadata", json!({})),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the stdio transport; logs go to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "molsen_mcp=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = load(&cli)?;
    let registry = ToolRegistry::with_builtins();

    match cli.command {
        Commands::Serve { transport } => match transport {
            Transport::Stdio => server::run_stdio(&cfg).await?,
            Transport::Http => server::run_http(&cfg).await?,
        },
        Commands::Tools => {
            for t in registry.tools() {
                println!("{:<24} {}", t.name(), t.description());
            }
        }
        Commands::Query(query) => {
            let (name, params) = tool_call(query);
            let ctx = ToolContext::from_config(&cfg)?;
            let tool = registry
                .find(name)
                .ok_or_else(|| anyhow::anyhow!("no tool registered with name: {}", name))?;

            let output = tool.execute(params, &ctx).await?;
            if output.is_error {
                eprintln!("Error: {}", output.text);
                std::process::exit(1);
            }
            println!("{}", output.text);
        }
    }

    Ok(())
}
