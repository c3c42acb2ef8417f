//! Essay listing, lookup and filtering.

use std::sync::Arc;

use crate::client::FetchClient;
use crate::error::FetchError;
use crate::models::{Essay, EssayType};

/// Optional narrowing applied by [`filter_essays`].
#[derive(Debug, Clone, Default)]
pub struct EssayFilter {
    /// Keep essays carrying any of these tags (case-insensitive). Empty = no filter.
    pub tags: Vec<String>,
    pub essay_type: Option<EssayType>,
}

#[derive(Clone)]
pub struct EssayRepository {
    client: Arc<FetchClient>,
    path: String,
}

impl EssayRepository {
    pub fn new(client: Arc<FetchClient>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    pub async fn get_essays(&self) -> Result<Vec<Essay>, FetchError> {
        self.client.fetch_with_cache(&self.path).await
    }

    /// Exact slug match. `Ok(None)` when the slug is not published.
    pub async fn get_essay(&self, slug: &str) -> Result<Option<Essay>, FetchError> {
        let essays = self.get_essays().await?;
        Ok(essays.into_iter().find(|e| e.slug == slug))
    }

    pub async fn search_essays(
        &self,
        query: &str,
        filter: &EssayFilter,
    ) -> Result<Vec<Essay>, FetchError> {
        let essays = self.get_essays().await?;
        Ok(filter_essays(essays, query, filter))
    }
}

/// Apply tag, type and text filters, in that order, each narrowing the last.
pub fn filter_essays(essays: Vec<Essay>, query: &str, filter: &EssayFilter) -> Vec<Essay> {
    let mut essays = filter_by_tags(essays, &filter.tags);

    if let Some(kind) = filter.essay_type {
        essays.retain(|e| e.kind == kind);
    }

    if !query.is_empty() {
        let needle = query.to_lowercase();
        essays.retain(|e| {
            e.title.to_lowercase().contains(&needle)
                || e.description.to_lowercase().contains(&needle)
                || e.content.to_lowercase().contains(&needle)
        });
    }

    essays
}

/// Keep essays that carry at least one of `tags`. No-op when `tags` is empty.
pub fn filter_by_tags(mut essays: Vec<Essay>, tags: &[String]) -> Vec<Essay> {
    if !tags.is_empty() {
        essays.retain(|e| tags.iter().any(|tag| e.has_tag(tag)));
    }
    essays
}
