// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::search::IndexedDocument;
use crate::services::search::MeilisearchBackend;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Meilisearch primary keys allow only `[A-Za-z0-9_-]`, so `users.json`
/// is stored under `users_json` and keeps its name in `source`.
pub fn document_key(source: &str) -> String {
    source
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Read one JSON corpus file into a document named after the file
pub async fn load_document(path: &Path) -> Result<IndexedDocument> {
    let source = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Not a file path: {}", path.display()))?
        .to_string();

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let records: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    Ok(IndexedDocument {
        id: document_key(&source),
        source,
        records,
    })
}

/// Load every file and upload them as one batch
pub async fn index_files<P: AsRef<Path>>(backend: &MeilisearchBackend, paths: &[P]) -> Result<usize> {
    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        docs.push(load_document(path.as_ref()).await?);
    }

    backend.init_index().await?;
    backend.index_documents(&docs).await?;

    info!(count = docs.len(), "Corpus indexed");

    Ok(docs.len())
}
