// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! In-memory backend returning canned result sets, for tests and local runs
//! without a Meilisearch instance.

use crate::models::search::{Query, ResultSet};
use crate::services::search::{BackendProvider, SearchBackend};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Answers queries from a fixed map of query text to result set.
/// Unknown queries return an empty page.
#[derive(Default)]
pub struct FixtureBackend {
    results: HashMap<String, ResultSet>,
    failure: Option<String>,
    executed: Mutex<Vec<Query>>,
}

impl FixtureBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the result set returned for an exact query text
    pub fn with_results(mut self, text: &str, results: ResultSet) -> Self {
        self.results.insert(text.to_string(), results);
        self
    }

    /// Backend whose every search fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Queries received so far, oldest first
    pub fn executed_queries(&self) -> Vec<Query> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SearchBackend for FixtureBackend {
    async fn search(&self, query: &Query) -> Result<ResultSet> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        if let Some(message) = &self.failure {
            return Err(anyhow!("{}", message));
        }

        Ok(self.results.get(query.text()).cloned().unwrap_or_default())
    }
}

/// Provider over an optional `FixtureBackend`
pub struct FixtureProvider {
    backend: Option<Arc<FixtureBackend>>,
    provisions: AtomicUsize,
}

impl FixtureProvider {
    pub fn available(backend: Arc<FixtureBackend>) -> Self {
        Self {
            backend: Some(backend),
            provisions: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            backend: None,
            provisions: AtomicUsize::new(0),
        }
    }

    /// Number of times a backend was requested
    pub fn provision_count(&self) -> usize {
        self.provisions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendProvider for FixtureProvider {
    async fn provision(&self) -> Option<Arc<dyn SearchBackend>> {
        self.provisions.fetch_add(1, Ordering::SeqCst);
        self.backend
            .clone()
            .map(|backend| backend as Arc<dyn SearchBackend>)
    }
}
