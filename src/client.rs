//! Caching HTTP client for the upstream site.
//!
//! Each resource path is resolved against the base URL and cached under the
//! resolved URL, so the essays, graph and metadata documents expire
//! independently. A fresh hit never touches the network.
//!
//! Concurrent misses on the same URL are not coalesced: each caller fetches
//! on its own and the last one to finish overwrites the entry.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::FetchError;

pub struct FetchClient {
    http: reqwest::Client,
    base_url: String,
    cache: Mutex<TtlCache<Value>>,
}

impl FetchClient {
    /// Build a client from the `[source]`, `[cache]` and `[http]` sections.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.http.user_agent.clone());
        if let Some(secs) = config.http.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        Ok(Self::with_http(
            http,
            &config.source.base_url,
            config.cache.ttl(),
        ))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str, ttl: Duration) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a resource path such as `/api/essays.json`.
    pub fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Return the resource at `path`, from cache when fresh.
    pub async fn fetch_with_cache<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.resolve(path);

        let cached = self.cache().get(&url);
        if let Some(value) = cached {
            tracing::debug!(%url, "cache hit");
            return decode(&url, &value);
        }

        tracing::debug!(%url, "cache miss, fetching");
        let value = match self.fetch_json(&url).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(%url, error = %e, "fetch failed");
                return Err(e);
            }
        };
        let data = decode(&url, &value)?;
        self.cache().set(url, value);
        Ok(data)
    }

    /// Drop every cached resource. The next fetch of any path hits the network.
    pub fn clear_cache(&self) {
        self.cache().clear();
        tracing::debug!("cache cleared");
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn cache(&self) -> MutexGuard<'_, TtlCache<Value>> {
        // The cache holds plain data; a panic elsewhere cannot leave it half-written.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn decode<T: DeserializeOwned>(url: &str, value: &Value) -> Result<T, FetchError> {
    T::deserialize(value).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}
