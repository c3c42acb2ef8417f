//! Data models for the upstream JSON resources.
//!
//! Field names follow the wire format (camelCase). Decoding into these types
//! at the fetch boundary is the only shape check the server performs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A single essay from `/api/essays.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Essay {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EssayType,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: String,
    pub word_count: u64,
    pub reading_time: u64,
    pub content: String,
    #[serde(default)]
    pub content_markdown: String,
}

impl Essay {
    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// Raw markup, or the plain-text body when no markup was published.
    pub fn markdown_or_content(&self) -> &str {
        if self.content_markdown.is_empty() {
            &self.content
        } else {
            &self.content_markdown
        }
    }
}

/// The closed set of essay categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EssayType {
    Hub,
    Foundational,
    Core,
    Theoretical,
    Applied,
    Empirical,
    Practice,
}

impl EssayType {
    pub const ALL: [EssayType; 7] = [
        EssayType::Hub,
        EssayType::Foundational,
        EssayType::Core,
        EssayType::Theoretical,
        EssayType::Applied,
        EssayType::Empirical,
        EssayType::Practice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EssayType::Hub => "hub",
            EssayType::Foundational => "foundational",
            EssayType::Core => "core",
            EssayType::Theoretical => "theoretical",
            EssayType::Applied => "applied",
            EssayType::Empirical => "empirical",
            EssayType::Practice => "practice",
        }
    }
}

impl fmt::Display for EssayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EssayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EssayType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown essay type '{}'. Expected one of: hub, foundational, core, theoretical, applied, empirical, practice",
                    s
                )
            })
    }
}

/// Essay type filter that also accepts `"all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(EssayType),
}

impl TypeFilter {
    pub fn essay_type(&self) -> Option<EssayType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Only(t) => Some(*t),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

impl<'de> Deserialize<'de> for TypeFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A node in the knowledge graph. Ids are short codes (e.g. `"eka"`), not slugs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub themes: Vec<String>,
    /// Fields this server does not interpret, echoed back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Strength of a relationship between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Core,
    Soft,
}

/// A directed edge. `source` and `target` may reference ids that do not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: LinkType,
    pub label: String,
}

/// Link filter used by graph queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Core,
    Soft,
    #[default]
    All,
}

impl ConnectionType {
    pub fn matches(&self, kind: LinkType) -> bool {
        match self {
            ConnectionType::All => true,
            ConnectionType::Core => kind == LinkType::Core,
            ConnectionType::Soft => kind == LinkType::Soft,
        }
    }
}

/// `/js/knowledge-graph.json`, fetched and cached as one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl KnowledgeGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// `/api/metadata.json`. Passed through untouched: keys beyond the ones
/// named here land in `extra` and serialize back out as they came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub site: SiteInfo,
    pub essays: EssayCount,
    pub endpoints: Endpoints,
    pub last_updated: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayCount {
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub essays: String,
    pub metadata: String,
    pub llms_summary: String,
    pub llms_full: String,
    pub graph: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_essay_decodes_wire_names() {
        let essay: Essay = serde_json::from_value(json!({
            "slug": "strong-oracle-trap",
            "title": "The Strong Oracle Trap",
            "url": "https://molsen.ca/essays/strong-oracle-trap",
            "description": "Why oracles fail",
            "type": "core",
            "tags": ["AI Governance"],
            "date": "2025-01-10",
            "wordCount": 2400,
            "readingTime": 11,
            "content": "Body",
            "contentMarkdown": "# Body"
        }))
        .unwrap();
        assert_eq!(essay.kind, EssayType::Core);
        assert_eq!(essay.word_count, 2400);
        assert_eq!(essay.markdown_or_content(), "# Body");
    }

    #[test]
    fn test_missing_markdown_falls_back_to_content() {
        let essay: Essay = serde_json::from_value(json!({
            "slug": "s", "title": "t", "url": "u", "description": "d",
            "type": "hub", "tags": [], "date": "2025-01-01",
            "wordCount": 1, "readingTime": 1, "content": "plain"
        }))
        .unwrap();
        assert_eq!(essay.content_markdown, "");
        assert_eq!(essay.markdown_or_content(), "plain");
    }

    #[test]
    fn test_unknown_essay_type_rejected() {
        let result: Result<EssayType, _> = serde_json::from_value(json!("opinion"));
        assert!(result.is_err());
    }

    #[test]
    fn test_has_tag_case_insensitive() {
        let essay = Essay {
            slug: "s".into(),
            title: "t".into(),
            url: "u".into(),
            description: "d".into(),
            kind: EssayType::Applied,
            tags: vec!["AI Governance".into()],
            date: "2025-01-01".into(),
            word_count: 1,
            reading_time: 1,
            content: String::new(),
            content_markdown: String::new(),
        };
        assert!(essay.has_tag("ai governance"));
        assert!(!essay.has_tag("governance"));
    }

    #[test]
    fn test_type_filter_parse() {
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!(
            "practice".parse::<TypeFilter>().unwrap(),
            TypeFilter::Only(EssayType::Practice)
        );
        assert!("Hub".parse::<TypeFilter>().is_err());
        let filter: TypeFilter = serde_json::from_value(json!("empirical")).unwrap();
        assert_eq!(filter.essay_type(), Some(EssayType::Empirical));
    }

    #[test]
    fn test_connection_type_matches() {
        assert!(ConnectionType::All.matches(LinkType::Soft));
        assert!(ConnectionType::Core.matches(LinkType::Core));
        assert!(!ConnectionType::Core.matches(LinkType::Soft));
    }

    #[test]
    fn test_site_metadata_base_url_key() {
        let meta: SiteMetadata = serde_json::from_value(json!({
            "site": {"title": "molsen.ca", "description": "d", "author": "M", "baseURL": "https://molsen.ca"},
            "essays": {"total": 20},
            "endpoints": {
                "essays": "/api/essays.json",
                "metadata": "/api/metadata.json",
                "llmsSummary": "/llms.txt",
                "llmsFull": "/llms-full.txt",
                "graph": "/js/knowledge-graph.json"
            },
            "lastUpdated": "2025-06-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(meta.site.base_url, "https://molsen.ca");
        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back["site"]["baseURL"], "https://molsen.ca");
        assert_eq!(back["endpoints"]["llmsFull"], "/llms-full.txt");
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let node: GraphNode = serde_json::from_value(json!({
            "id": "eka", "label": "EKA", "url": "/essays/eka/", "type": "core",
            "weight": 3, "cluster": {"name": "knowledge"}
        }))
        .unwrap();
        assert_eq!(node.extra["weight"], 3);
        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["cluster"]["name"], "knowledge");
        assert_eq!(back["type"], "core");
        assert!(back.get("extra").is_none());
    }

    #[test]
    fn test_one_unknown_essay_type_fails_the_document() {
        let result: Result<Vec<Essay>, _> = serde_json::from_value(json!([
            {
                "slug": "a", "title": "t", "url": "u", "description": "d",
                "type": "core", "date": "2025-01-01",
                "wordCount": 1, "readingTime": 1, "content": "c"
            },
            {
                "slug": "b", "title": "t", "url": "u", "description": "d",
                "type": "essay", "date": "2025-01-01",
                "wordCount": 1, "readingTime": 1, "content": "c"
            }
        ]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("unknown variant `essay`"));
    }
}
