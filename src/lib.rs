//! # molsen-mcp
//!
//! Exposes the essays published on molsen.ca, and the knowledge graph that
//! links them, to AI tools over the Model Context Protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ MCP (stdio / │──▶│ ToolRegistry │──▶│ EssayRepository  │──┐
//! │ HTTP) or CLI │   │  6 tools     │   │ GraphService     │  │
//! └──────────────┘   └──────────────┘   └──────────────────┘  │
//!                                                             ▼
//!                                        ┌──────────────────────────┐
//!                                        │ FetchClient + TtlCache   │──▶ https://molsen.ca
//!                                        └──────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration |
//! | [`models`] | Essay, graph and metadata types |
//! | [`cache`] | Freshness-window cache |
//! | [`client`] | Caching fetch client |
//! | [`error`] | Typed data-layer errors |
//! | [`essays`] | Essay repository and filters |
//! | [`framework`] | Curated reading order and framework overview |
//! | [`graph`] | Graph service and neighbour resolution |
//! | [`snippet`] | Search-result context windows |
//! | [`list`], [`get`], [`search`] | Essay queries |
//! | [`traits`] | Tool trait, context, registry |
//! | [`mcp`] | rmcp server handler |
//! | [`server`] | stdio and HTTP transports |

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod essays;
pub mod framework;
pub mod get;
pub mod graph;
pub mod list;
pub mod mcp;
pub mod models;
pub mod search;
pub mod server;
pub mod snippet;
pub mod traits;
