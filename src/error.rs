//! Typed errors raised by the data layer.
//!
//! Everything above the data layer (config, tools, CLI, server) works in
//! `anyhow::Result` and wraps these with context.

use thiserror::Error;

/// Failure to obtain a resource from the upstream site.
///
/// Always a hard failure for the query that triggered it: no stale or
/// default value is substituted.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {url}: {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("Failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// The fully resolved location that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

/// A graph lookup for an id that is not among the graph's nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Essay not found in graph: {id}. Note: graph uses short IDs like \"eka\" not full slugs.")]
pub struct NodeNotFound {
    pub id: String,
}
