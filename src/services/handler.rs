// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Invocation adapter: one event in, one summary string out.
//!
//! Every failure is encoded as a `SearchOutcome` variant. Transports render it
//! with `Display` and never see an error.

use crate::services::logging::preview;
use crate::services::query::{build_query, QueryConfig};
use crate::services::reducer::reduce_results;
use crate::services::search::BackendProvider;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest summary excerpt written to the log
const LOG_PREVIEW_CHARS: usize = 200;

/// Result of handling one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Non-empty summary of the matched documents
    Matched(String),
    /// The search ran but nothing matched
    NoResults { query: String },
    /// No backend could be provisioned; nothing was searched
    ClientUnavailable,
    /// The backend rejected or failed the search
    Failed(String),
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Matched(summary) => write!(f, "{summary}"),
            SearchOutcome::NoResults { query } => write!(f, "no results found for query {query}"),
            SearchOutcome::ClientUnavailable => {
                write!(f, "Can't perform search, search client not available")
            }
            SearchOutcome::Failed(reason) => write!(f, "Search failed: {reason}"),
        }
    }
}

/// String form of an event payload: strings are used as-is, anything else
/// is rendered as JSON (so `null` becomes `"null"`).
pub fn event_text(input: &Value) -> String {
    match input {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Sequences provisioning, query building, search, and reduction
pub struct SearchHandler {
    provider: Arc<dyn BackendProvider>,
    query_config: QueryConfig,
}

impl SearchHandler {
    pub fn new(provider: Arc<dyn BackendProvider>, query_config: QueryConfig) -> Self {
        Self {
            provider,
            query_config,
        }
    }

    pub async fn execute(&self, input: &Value) -> SearchOutcome {
        let Some(backend) = self.provider.provision().await else {
            warn!("Search backend could not be provisioned");
            return SearchOutcome::ClientUnavailable;
        };

        let text = event_text(input);
        let query = build_query(&text, &self.query_config);
        debug!(?query, "Prepared search query");

        let results = match backend.search(&query).await {
            Ok(results) => results,
            Err(e) => {
                warn!(query = %text, "Search failed: {:#}", e);
                return SearchOutcome::Failed(format!("{:#}", e));
            }
        };

        let summary = reduce_results(Some(&results));
        if summary.is_empty() {
            info!(query = %text, found = results.found, "No matching documents");
            return SearchOutcome::NoResults { query: text };
        }

        info!(
            query = %text,
            found = results.found,
            returned = results.hits.len(),
            "matched results {}",
            preview(&summary, LOG_PREVIEW_CHARS)
        );
        SearchOutcome::Matched(summary)
    }

    /// `execute` rendered for a transport that only understands strings
    pub async fn handle(&self, input: &Value) -> String {
        self.execute(input).await.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::{Hit, ResultSet};
    use crate::services::fixture::{FixtureBackend, FixtureProvider};
    use crate::services::search::{BackendConfig, MeilisearchProvider};
    use serde_json::{json, Map};

    fn users_hit() -> Hit {
        let mut fields = Map::new();
        fields.insert("source".to_string(), json!("users.json"));
        Hit {
            id: "users.json".to_string(),
            fields,
        }
    }

    fn handler_with(backend: FixtureBackend) -> (SearchHandler, Arc<FixtureBackend>) {
        let backend = Arc::new(backend);
        let provider = Arc::new(FixtureProvider::available(backend.clone()));
        (SearchHandler::new(provider, QueryConfig::default()), backend)
    }

    #[test]
    fn test_event_text_string_is_unquoted() {
        assert_eq!(event_text(&json!("Coffey")), "Coffey");
        assert_eq!(event_text(&json!("")), "");
    }

    #[test]
    fn test_event_text_other_values_are_stringified() {
        assert_eq!(event_text(&Value::Null), "null");
        assert_eq!(event_text(&json!(103)), "103");
        assert_eq!(event_text(&json!({"q": "cherry"})), r#"{"q":"cherry"}"#);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            SearchOutcome::NoResults {
                query: "coff".to_string()
            }
            .to_string(),
            "no results found for query coff"
        );
        assert_eq!(
            SearchOutcome::ClientUnavailable.to_string(),
            "Can't perform search, search client not available"
        );
        assert_eq!(
            SearchOutcome::Failed("timeout".to_string()).to_string(),
            "Search failed: timeout"
        );
    }

    #[tokio::test]
    async fn test_execute_matched() {
        let results = ResultSet {
            hits: vec![users_hit()],
            found: 1,
        };
        let (handler, _) = handler_with(FixtureBackend::new().with_results("coffey", results));

        let outcome = handler.execute(&json!("coffey")).await;
        assert_eq!(
            outcome,
            SearchOutcome::Matched(format!("users.json {}", users_hit()))
        );
    }

    #[tokio::test]
    async fn test_execute_no_results() {
        let (handler, _) = handler_with(FixtureBackend::new());

        let outcome = handler.execute(&json!("coff")).await;
        assert_eq!(
            outcome,
            SearchOutcome::NoResults {
                query: "coff".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_execute_backend_failure() {
        let (handler, _) = handler_with(FixtureBackend::failing("index not found"));

        let outcome = handler.execute(&json!("coffey")).await;
        assert_eq!(outcome, SearchOutcome::Failed("index not found".to_string()));
    }

    #[tokio::test]
    async fn test_execute_passes_stringified_input_to_backend() {
        let (handler, backend) = handler_with(FixtureBackend::new());

        handler.execute(&Value::Null).await;

        let executed = backend.executed_queries();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].text(), "null");
    }

    #[tokio::test]
    async fn test_handle_unreachable_meilisearch_reports_failure_once() {
        let config = BackendConfig {
            host: "127.0.0.1:1".to_string(),
            index_name: "documents".to_string(),
            api_key: None,
            id_field: "source".to_string(),
        };
        let handler = SearchHandler::new(
            Arc::new(MeilisearchProvider::new(config)),
            QueryConfig::default(),
        );

        let output = handler.handle(&json!("coffey")).await;

        assert!(output.starts_with("Search failed: Meilisearch query on index 'documents'"));
        assert_eq!(output.matches("Search failed").count(), 1);
        assert!(!output.contains("127.0.0.1:1//"));
    }

    #[tokio::test]
    async fn test_handle_client_unavailable() {
        let provider = Arc::new(FixtureProvider::unavailable());
        let handler = SearchHandler::new(provider.clone(), QueryConfig::default());

        let output = handler.handle(&json!("coffey")).await;
        assert_eq!(output, "Can't perform search, search client not available");
        assert_eq!(provider.provision_count(), 1);
    }
}
