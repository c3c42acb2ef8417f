//! Knowledge-graph retrieval, neighbour resolution, and the
//! `get_knowledge_graph` query.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::client::FetchClient;
use crate::error::{FetchError, NodeNotFound};
use crate::models::{ConnectionType, GraphLink, GraphNode, KnowledgeGraph, LinkType};
use crate::traits::{ToolContext, ToolOutput};

#[derive(Clone)]
pub struct GraphService {
    client: Arc<FetchClient>,
    path: String,
}

impl GraphService {
    pub fn new(client: Arc<FetchClient>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    pub async fn get_graph(&self) -> Result<KnowledgeGraph, FetchError> {
        self.client.fetch_with_cache(&self.path).await
    }
}

/// An edge arriving at the queried node. `from` is `None` for a dangling source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomingConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<GraphNode>,
    pub relationship: String,
    #[serde(rename = "type")]
    pub kind: LinkType,
}

/// An edge leaving the queried node. `to` is `None` for a dangling target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<GraphNode>,
    pub relationship: String,
    #[serde(rename = "type")]
    pub kind: LinkType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connections {
    pub incoming: Vec<IncomingConnection>,
    pub outgoing: Vec<OutgoingConnection>,
}

/// A node together with its resolved neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeConnections {
    pub essay: GraphNode,
    pub connections: Connections,
}

pub fn filter_links(links: &[GraphLink], connection_type: ConnectionType) -> Vec<GraphLink> {
    links
        .iter()
        .filter(|l| connection_type.matches(l.kind))
        .cloned()
        .collect()
}

/// Resolve `node_id` and partition the matching links around it.
pub fn connections_for(
    graph: &KnowledgeGraph,
    node_id: &str,
    connection_type: ConnectionType,
) -> Result<NodeConnections, NodeNotFound> {
    let node = graph.node(node_id).ok_or_else(|| NodeNotFound {
        id: node_id.to_string(),
    })?;

    let links = filter_links(&graph.links, connection_type);

    let incoming = links
        .iter()
        .filter(|l| l.target == node_id)
        .map(|l| IncomingConnection {
            from: graph.node(&l.source).cloned(),
            relationship: l.label.clone(),
            kind: l.kind,
        })
        .collect();

    let outgoing = links
        .iter()
        .filter(|l| l.source == node_id)
        .map(|l| OutgoingConnection {
            to: graph.node(&l.target).cloned(),
            relationship: l.label.clone(),
            kind: l.kind,
        })
        .collect();

    Ok(NodeConnections {
        essay: node.clone(),
        connections: Connections { incoming, outgoing },
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRequest {
    /// Graph node id (short code, not an essay slug).
    #[serde(default)]
    pub essay: Option<String>,
    #[serde(default)]
    pub connection_type: ConnectionType,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphView<'a> {
    pub nodes: &'a [GraphNode],
    pub links: Vec<GraphLink>,
}

/// Render either one node's neighbourhood or the whole (type-filtered) graph.
pub fn render_graph(graph: &KnowledgeGraph, req: &GraphRequest) -> Result<ToolOutput> {
    if let Some(id) = req.essay.as_deref().filter(|id| !id.is_empty()) {
        return match connections_for(graph, id, req.connection_type) {
            Ok(found) => Ok(ToolOutput::text(serde_json::to_string_pretty(&found)?)),
            Err(not_found) => Ok(ToolOutput::error(not_found.to_string())),
        };
    }

    let view = GraphView {
        nodes: &graph.nodes,
        links: filter_links(&graph.links, req.connection_type),
    };
    Ok(ToolOutput::text(serde_json::to_string_pretty(&view)?))
}

pub async fn get_knowledge_graph(ctx: &ToolContext, req: &GraphRequest) -> Result<ToolOutput> {
    let graph = ctx.graph().get_graph().await?;
    render_graph(&graph, req)
}
