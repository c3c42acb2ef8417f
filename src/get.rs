//! Single-essay retrieval by slug.
//!
//! Used by the `molsen-mcp get` CLI command and the `get_essay` tool.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{Essay, EssayType};
use crate::traits::{ToolContext, ToolOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EssayFormat {
    /// Heading, metadata line and plain-text body.
    #[default]
    Full,
    /// Metadata only, as JSON.
    Summary,
    /// Raw markup, or plain text when no markup exists.
    Markdown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetEssayRequest {
    pub slug: String,
    #[serde(default)]
    pub format: EssayFormat,
}

/// Metadata view of an essay. Never carries the body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EssaySummary<'a> {
    pub title: &'a str,
    pub description: &'a str,
    #[serde(rename = "type")]
    pub kind: EssayType,
    pub tags: &'a [String],
    pub date: &'a str,
    pub url: &'a str,
    pub word_count: u64,
    pub reading_time: u64,
}

impl<'a> From<&'a Essay> for EssaySummary<'a> {
    fn from(e: &'a Essay) -> Self {
        Self {
            title: &e.title,
            description: &e.description,
            kind: e.kind,
            tags: &e.tags,
            date: &e.date,
            url: &e.url,
            word_count: e.word_count,
            reading_time: e.reading_time,
        }
    }
}

pub async fn get_essay(ctx: &ToolContext, req: &GetEssayRequest) -> Result<ToolOutput> {
    let Some(essay) = ctx.essays().get_essay(&req.slug).await? else {
        return Ok(ToolOutput::error(format!(
            "Essay not found: {}. Use list_essays to see available essays.",
            req.slug
        )));
    };

    render_essay(&essay, req.format).map(ToolOutput::text)
}

pub fn render_essay(essay: &Essay, format: EssayFormat) -> Result<String> {
    Ok(match format {
        EssayFormat::Summary => serde_json::to_string_pretty(&EssaySummary::from(essay))?,
        EssayFormat::Markdown => essay.markdown_or_content().to_string(),
        EssayFormat::Full => format!(
            "# {}\n\n> {}\n\nType: {} | Tags: {} | Date: {}\nURL: {}\n\n---\n\n{}",
            essay.title,
            essay.description,
            essay.kind,
            essay.tags.join(", "),
            essay.date,
            essay.url,
            essay.content
        ),
    })
}
