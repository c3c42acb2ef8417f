//! The curated "Making AI Make Sense" reading path and the
//! `get_framework_overview` query built on it.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{Essay, EssayType};
use crate::traits::{ToolContext, ToolOutput};

pub const FRAMEWORK_TITLE: &str = "Making AI Make Sense Framework";
pub const FRAMEWORK_DESCRIPTION: &str =
    "A framework for deploying AI where it's strong and routing around where it's weak.";

/// Slug of the framework's hub essay.
pub const HUB_SLUG: &str = "making-ai-make-sense";

/// Framework essays in reading order.
pub const FRAMEWORK_ORDER: [&str; 13] = [
    "making-ai-make-sense",
    "knowledge-as-capability",
    "agent-relative-tacitness",
    "tacit-space-shrinkage",
    "ai-oracle-vs-assistant",
    "strong-oracle-trap",
    "executable-knowledge-architecture",
    "capability-governance",
    "agentic-ai-universal-interface",
    "automating-expertise-gets-easier",
    "ontology-generation",
    "what-benchmarks-arent-measuring",
    "ai-first-software",
];

/// Position of `slug` in the reading order.
pub fn framework_rank(slug: &str) -> Option<usize> {
    FRAMEWORK_ORDER.iter().position(|s| *s == slug)
}

/// Keep only framework essays and sort them into reading order.
pub fn order_framework(essays: Vec<Essay>) -> Vec<Essay> {
    let mut ranked: Vec<(usize, Essay)> = essays
        .into_iter()
        .filter_map(|e| framework_rank(&e.slug).map(|rank| (rank, e)))
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, e)| e).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkDepth {
    /// Hub, flat essay list and reading order.
    #[default]
    Overview,
    /// Essays grouped by type.
    Detailed,
    /// Every essay with its full content.
    Full,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameworkRequest {
    #[serde(default)]
    pub depth: FrameworkDepth,
}

/// Types shown in the detailed view, in display order.
const DETAILED_BUCKETS: [EssayType; 5] = [
    EssayType::Hub,
    EssayType::Foundational,
    EssayType::Theoretical,
    EssayType::Core,
    EssayType::Applied,
];

/// Build the framework payload from framework essays already in reading order.
pub fn render_framework(ordered: &[Essay], depth: FrameworkDepth) -> Value {
    match depth {
        FrameworkDepth::Overview => {
            let hub = ordered.iter().find(|e| e.slug == HUB_SLUG);
            json!({
                "title": FRAMEWORK_TITLE,
                "description": FRAMEWORK_DESCRIPTION,
                "hub": {
                    "slug": HUB_SLUG,
                    "title": hub.map(|e| e.title.as_str()),
                    "url": hub.map(|e| e.url.as_str()),
                },
                "essays": ordered
                    .iter()
                    .map(|e| json!({
                        "slug": e.slug,
                        "title": e.title,
                        "type": e.kind,
                        "description": e.description,
                    }))
                    .collect::<Vec<_>>(),
                "readingOrder": FRAMEWORK_ORDER,
            })
        }
        FrameworkDepth::Detailed => {
            let mut structure = serde_json::Map::new();
            for kind in DETAILED_BUCKETS {
                let bucket: Vec<Value> = ordered
                    .iter()
                    .filter(|e| e.kind == kind)
                    .map(|e| json!({
                        "slug": e.slug,
                        "title": e.title,
                        "description": e.description,
                    }))
                    .collect();
                structure.insert(kind.as_str().to_string(), Value::Array(bucket));
            }
            json!({
                "title": FRAMEWORK_TITLE,
                "structure": structure,
                "readingOrder": FRAMEWORK_ORDER,
            })
        }
        FrameworkDepth::Full => json!({
            "title": FRAMEWORK_TITLE,
            "essays": ordered
                .iter()
                .map(|e| json!({
                    "slug": e.slug,
                    "title": e.title,
                    "type": e.kind,
                    "description": e.description,
                    "content": e.content,
                }))
                .collect::<Vec<_>>(),
            "readingOrder": FRAMEWORK_ORDER,
        }),
    }
}

pub async fn get_framework_overview(ctx: &ToolContext, req: &FrameworkRequest) -> Result<ToolOutput> {
    let ordered = order_framework(ctx.essays().get_essays().await?);
    let payload = render_framework(&ordered, req.depth);
    Ok(ToolOutput::text(serde_json::to_string_pretty(&payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essays::tests::essay;

    #[test]
    fn test_full_set_sorted_regardless_of_input_order() {
        let input: Vec<Essay> = FRAMEWORK_ORDER
            .iter()
            .rev()
            .map(|s| essay(s, EssayType::Core, &[], ""))
            .collect();
        let ordered = order_framework(input);
        let slugs: Vec<&str> = ordered.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, FRAMEWORK_ORDER.to_vec());
    }

    #[test]
    fn test_non_members_excluded() {
        let input = vec![
            essay("ai-first-software", EssayType::Applied, &[], ""),
            essay("some-other-essay", EssayType::Empirical, &[], ""),
            essay("making-ai-make-sense", EssayType::Hub, &[], ""),
        ];
        let ordered = order_framework(input);
        let slugs: Vec<&str> = ordered.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["making-ai-make-sense", "ai-first-software"]);
    }

    #[test]
    fn test_rank_lookup() {
        assert_eq!(framework_rank(HUB_SLUG), Some(0));
        assert_eq!(framework_rank("ai-first-software"), Some(12));
        assert_eq!(framework_rank("unknown"), None);
    }

    fn framework_essays() -> Vec<Essay> {
        let kinds = [
            EssayType::Hub,
            EssayType::Foundational,
            EssayType::Foundational,
            EssayType::Theoretical,
            EssayType::Theoretical,
            EssayType::Core,
            EssayType::Core,
            EssayType::Core,
            EssayType::Applied,
            EssayType::Applied,
            EssayType::Applied,
            EssayType::Empirical,
            EssayType::Applied,
        ];
        FRAMEWORK_ORDER
            .iter()
            .zip(kinds)
            .map(|(s, k)| essay(s, k, &[], "full text"))
            .collect()
    }

    #[test]
    fn test_overview_shape() {
        let value = render_framework(&framework_essays(), FrameworkDepth::Overview);
        assert_eq!(value["title"], FRAMEWORK_TITLE);
        assert_eq!(value["hub"]["slug"], HUB_SLUG);
        assert_eq!(value["hub"]["title"], "Title of making-ai-make-sense");
        assert_eq!(value["essays"].as_array().unwrap().len(), 13);
        assert_eq!(value["essays"][12]["slug"], "ai-first-software");
        assert!(value["essays"][0].get("content").is_none());
        assert_eq!(value["readingOrder"][0], HUB_SLUG);
    }

    #[test]
    fn test_overview_without_hub_has_null_title() {
        let value = render_framework(&[], FrameworkDepth::Overview);
        assert!(value["hub"]["title"].is_null());
        assert_eq!(value["readingOrder"].as_array().unwrap().len(), 13);
    }

    #[test]
    fn test_detailed_buckets_skip_other_types() {
        let value = render_framework(&framework_essays(), FrameworkDepth::Detailed);
        let structure = value["structure"].as_object().unwrap();
        let keys: Vec<&str> = structure.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(structure["core"].as_array().unwrap().len(), 3);
        assert_eq!(structure["applied"].as_array().unwrap().len(), 4);
        assert!(structure.get("empirical").is_none());
    }

    #[test]
    fn test_full_includes_content() {
        let value = render_framework(&framework_essays(), FrameworkDepth::Full);
        assert_eq!(value["essays"][3]["content"], "full text");
        assert!(value.get("hub").is_none());
    }
}
