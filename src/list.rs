//! Essay listing with type, tag and framework filters.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::essays::filter_by_tags;
use crate::framework::order_framework;
use crate::models::{Essay, EssayType, TypeFilter};
use crate::traits::{ToolContext, ToolOutput};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEssaysRequest {
    #[serde(rename = "type", default)]
    pub essay_type: TypeFilter,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Only framework essays, in reading order.
    #[serde(default)]
    pub framework_only: bool,
    #[serde(default)]
    pub include_content: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayListItem<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub url: &'a str,
    pub description: &'a str,
    #[serde(rename = "type")]
    pub kind: EssayType,
    pub tags: &'a [String],
    pub date: &'a str,
    pub word_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
}

/// Framework ordering first, then type, then tags.
pub fn select_essays(essays: Vec<Essay>, req: &ListEssaysRequest) -> Vec<Essay> {
    let mut essays = if req.framework_only {
        order_framework(essays)
    } else {
        essays
    };

    if let Some(kind) = req.essay_type.essay_type() {
        essays.retain(|e| e.kind == kind);
    }

    match &req.tags {
        Some(tags) => filter_by_tags(essays, tags),
        None => essays,
    }
}

pub async fn list_essays(ctx: &ToolContext, req: &ListEssaysRequest) -> Result<ToolOutput> {
    let essays = select_essays(ctx.essays().get_essays().await?, req);

    let items: Vec<EssayListItem<'_>> = essays
        .iter()
        .map(|e| EssayListItem {
            slug: &e.slug,
            title: &e.title,
            url: &e.url,
            description: &e.description,
            kind: e.kind,
            tags: &e.tags,
            date: &e.date,
            word_count: e.word_count,
            content: req.include_content.then_some(e.content.as_str()),
        })
        .collect();

    Ok(ToolOutput::text(serde_json::to_string_pretty(&items)?))
}
