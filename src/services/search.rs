// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::search::{
    Cursor, Hit, IndexedDocument, Query, QueryParser, ResultSet, ReturnFields, SortSpec,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use meilisearch_sdk::client::Client;
use meilisearch_sdk::search::{MatchingStrategies, Selectors};
use meilisearch_sdk::tasks::Task;
use serde_json::{Map, Value};
use std::env;
use std::sync::Arc;
use tracing::{info, warn};

/// A search index that can execute one query and return one page of hits
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &Query) -> Result<ResultSet>;
}

/// Hands out a live backend, or `None` when no backend can be reached
#[async_trait]
pub trait BackendProvider: Send + Sync {
    async fn provision(&self) -> Option<Arc<dyn SearchBackend>>;
}

/// Connection settings for the Meilisearch index
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub host: String,
    pub index_name: String,
    pub api_key: Option<String>,
    /// Document field reported as the hit id; falls back to the primary key
    pub id_field: String,
}

impl BackendConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("MEILISEARCH_HOST").context("MEILISEARCH_HOST must be set")?,
            index_name: env::var("MEILISEARCH_INDEX").unwrap_or_else(|_| "documents".to_string()),
            api_key: env::var("MEILISEARCH_API_KEY").ok(),
            id_field: env::var("MEILISEARCH_ID_FIELD").unwrap_or_else(|_| "source".to_string()),
        })
    }

    /// Full endpoint URL without a trailing slash; `http://` is assumed when
    /// only host:port is given
    pub fn endpoint(&self) -> Result<String> {
        let host = self.host.trim();
        let url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        let url = url::Url::parse(&url)
            .with_context(|| format!("Invalid search endpoint: '{}'", self.host))?;

        // The SDK appends "/indexes/..." itself
        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

/// Meilisearch client wrapper for querying and loading the document index
pub struct MeilisearchBackend {
    client: Client,
    index_name: String,
    id_field: String,
}

impl MeilisearchBackend {
    /// Create a new Meilisearch client. No request is sent until the first call.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let client = Client::new(endpoint.as_str(), config.api_key.clone())
            .map_err(|e| anyhow!("Failed to create Meilisearch client: {}", e))?;

        info!(endpoint = %endpoint, index = %config.index_name, "Meilisearch client ready");

        Ok(Self {
            client,
            index_name: config.index_name.clone(),
            id_field: config.id_field.clone(),
        })
    }

    /// Configure sortable and filterable attributes used by the corpus
    pub async fn init_index(&self) -> Result<()> {
        let index = self.client.index(&self.index_name);

        if let Err(e) = index.set_sortable_attributes(["source"]).await {
            warn!("Failed to set sortable attributes: {}", e);
        }
        if let Err(e) = index.set_filterable_attributes(["source"]).await {
            warn!("Failed to set filterable attributes: {}", e);
        }

        info!(index = %self.index_name, "Initialized Meilisearch index");

        Ok(())
    }

    /// Add or replace documents in batch, waiting for the backend to apply them
    pub async fn index_documents(&self, docs: &[IndexedDocument]) -> Result<()> {
        if docs.is_empty() {
            return Ok(());
        }

        let index = self.client.index(&self.index_name);

        let task = index
            .add_documents(docs, Some("id"))
            .await
            .map_err(|e| anyhow!("Failed to batch index documents: {}", e))?
            .wait_for_completion(&self.client, None, None)
            .await
            .map_err(|e| anyhow!("Indexing task did not complete: {}", e))?;

        if let Task::Failed { content } = task {
            return Err(anyhow!("Indexing task failed: {}", content.error));
        }

        info!(count = docs.len(), index = %self.index_name, "Indexed documents");

        Ok(())
    }

    fn to_hit(&self, fields: Map<String, Value>) -> Hit {
        let id = [self.id_field.as_str(), "id"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(id_value))
            .unwrap_or_default();

        Hit { id, fields }
    }
}

#[async_trait]
impl SearchBackend for MeilisearchBackend {
    async fn search(&self, query: &Query) -> Result<ResultSet> {
        let index = self.client.index(&self.index_name);

        let offset = cursor_offset(query.cursor())?;
        let sort = sort_criteria(query.sort());
        let sort: Vec<&str> = sort.iter().map(String::as_str).collect();
        let fields: Vec<&str> = match query.return_fields() {
            ReturnFields::All => Vec::new(),
            ReturnFields::Only(fields) => fields.iter().map(String::as_str).collect(),
        };

        let mut search = index.search();
        search
            .with_query(query.text())
            .with_limit(query.page_size() as usize)
            .with_offset(offset)
            .with_matching_strategy(matching_strategy(query.parser()));

        if !sort.is_empty() {
            search.with_sort(sort.as_slice());
        }
        if !fields.is_empty() {
            search.with_attributes_to_retrieve(Selectors::Some(fields.as_slice()));
        }

        let search_result = search
            .execute::<Map<String, Value>>()
            .await
            .map_err(|e| anyhow!("Meilisearch query on index '{}': {}", self.index_name, e))?;

        let found = search_result
            .estimated_total_hits
            .or(search_result.total_hits)
            .unwrap_or(search_result.hits.len()) as u64;

        let hits = search_result
            .hits
            .into_iter()
            .map(|hit| self.to_hit(hit.result))
            .collect();

        Ok(ResultSet { hits, found })
    }
}

/// Provisions a fresh Meilisearch client for every invocation
pub struct MeilisearchProvider {
    config: Option<BackendConfig>,
}

impl MeilisearchProvider {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// Read `BackendConfig` from the environment. A missing or broken
    /// configuration yields a provider that never has a backend.
    pub fn from_env() -> Self {
        match BackendConfig::from_env() {
            Ok(config) => Self::new(config),
            Err(e) => {
                warn!("Search backend is not configured: {:#}", e);
                Self { config: None }
            }
        }
    }
}

#[async_trait]
impl BackendProvider for MeilisearchProvider {
    async fn provision(&self) -> Option<Arc<dyn SearchBackend>> {
        let config = self.config.as_ref()?;

        match MeilisearchBackend::new(config) {
            Ok(backend) => Some(Arc::new(backend)),
            Err(e) => {
                warn!("Search backend unavailable: {:#}", e);
                None
            }
        }
    }
}

fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Meilisearch pages by offset; the initial cursor is offset 0
fn cursor_offset(cursor: &Cursor) -> Result<usize> {
    if cursor.is_initial() {
        return Ok(0);
    }

    cursor
        .as_str()
        .parse()
        .with_context(|| format!("Unsupported cursor: {}", cursor.as_str()))
}

fn sort_criteria(sort: &SortSpec) -> Vec<String> {
    match sort {
        SortSpec::Relevance => Vec::new(),
        field => vec![field.to_string()],
    }
}

fn matching_strategy(parser: QueryParser) -> MatchingStrategies {
    match parser {
        QueryParser::Simple => MatchingStrategies::ALL,
        QueryParser::Loose => MatchingStrategies::LAST,
    }
}
