//! Full-text essay search with snippet previews.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::essays::EssayFilter;
use crate::models::{Essay, EssayType};
use crate::snippet::{extract_snippet, DEFAULT_CONTEXT_CHARS};
use crate::traits::{ToolContext, ToolOutput};

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchEssaysRequest {
    pub query: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "type", default)]
    pub essay_type: Option<EssayType>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl SearchEssaysRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            tags: None,
            essay_type: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    fn filter(&self) -> EssayFilter {
        EssayFilter {
            tags: self.tags.clone().unwrap_or_default(),
            essay_type: self.essay_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultItem {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EssayType,
    pub tags: Vec<String>,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    /// Matches before `limit` was applied.
    pub total_matches: usize,
    pub results: Vec<SearchResultItem>,
}

pub fn build_response(query: &str, matches: Vec<Essay>, limit: usize) -> SearchResponse {
    let total_matches = matches.len();
    let results = matches
        .into_iter()
        .take(limit)
        .map(|e| SearchResultItem {
            snippet: extract_snippet(&e.content, query, DEFAULT_CONTEXT_CHARS),
            slug: e.slug,
            title: e.title,
            description: e.description,
            kind: e.kind,
            tags: e.tags,
            url: e.url,
        })
        .collect();

    SearchResponse {
        query: query.to_string(),
        total_matches,
        results,
    }
}

pub async fn search_essays(ctx: &ToolContext, req: &SearchEssaysRequest) -> Result<ToolOutput> {
    let matches = ctx
        .essays()
        .search_essays(&req.query, &req.filter())
        .await?;
    tracing::debug!(query = %req.query, matches = matches.len(), "search");

    let response = build_response(&req.query, matches, req.limit);
    Ok(ToolOutput::text(serde_json::to_string_pretty(&response)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essays::tests::essay;

    #[test]
    fn test_total_counts_before_limit() {
        let matches = vec![
            essay("a", EssayType::Core, &[], "x agent y"),
            essay("b", EssayType::Core, &[], "agent"),
            essay("c", EssayType::Core, &[], "an agent"),
        ];
        let resp = build_response("agent", matches, 2);
        assert_eq!(resp.total_matches, 3);
        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.results[0].slug, "a");
        assert_eq!(resp.results[0].snippet, "x agent y");
    }

    #[test]
    fn test_wire_shape() {
        let resp = build_response("q", vec![essay("a", EssayType::Hub, &["T"], "q")], 10);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["query"], "q");
        assert_eq!(value["totalMatches"], 1);
        assert_eq!(value["results"][0]["type"], "hub");
        assert!(value["results"][0].get("content").is_none());
    }

    #[test]
    fn test_request_defaults() {
        let req: SearchEssaysRequest =
            serde_json::from_value(serde_json::json!({"query": "oracle"})).unwrap();
        assert_eq!(req.limit, DEFAULT_SEARCH_LIMIT);
        assert!(req.essay_type.is_none());

        let bad: Result<SearchEssaysRequest, _> =
            serde_json::from_value(serde_json::json!({"query": "x", "type": "all"}));
        assert!(bad.is_err());
    }
}
