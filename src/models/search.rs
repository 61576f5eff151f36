// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// How the backend interprets the query text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryParser {
    /// Literal phrase: every term must match, no operator syntax
    #[default]
    Simple,
    /// Trailing terms may be dropped until something matches
    Loose,
}

/// Sort direction for a field sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Ordering applied to every search request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortSpec {
    /// Keep the backend's relevance ranking
    #[default]
    Relevance,
    /// Sort on a sortable attribute of the index
    Field { name: String, order: SortOrder },
}

impl FromStr for SortSpec {
    type Err = anyhow::Error;

    /// Parse `"field:asc"`, `"field:desc"`, or `"_score"` / `"relevance"` / empty
    fn from_str(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() || spec == "_score" || spec == "relevance" {
            return Ok(SortSpec::Relevance);
        }

        let (name, order) = spec
            .split_once(':')
            .ok_or_else(|| anyhow!("Sort must look like 'field:asc' or 'field:desc', got: {spec}"))?;

        if name.is_empty() {
            return Err(anyhow!("Sort field name cannot be empty: {spec}"));
        }

        let order = match order {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => return Err(anyhow!("Sort order must be 'asc' or 'desc', got: {order}")),
        };

        Ok(SortSpec::Field {
            name: name.to_string(),
            order,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortSpec::Relevance => write!(f, "_score"),
            SortSpec::Field { name, order } => write!(f, "{name}:{order}"),
        }
    }
}

/// Which document fields the backend should return
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnFields {
    #[default]
    All,
    Only(Vec<String>),
}

/// Backend pagination token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    const INITIAL: &'static str = "initial";

    /// Token for the first page of results
    pub fn initial() -> Self {
        Self(Self::INITIAL.to_string())
    }

    pub fn is_initial(&self) -> bool {
        self.0 == Self::INITIAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A fully specified search request. Only the query builder constructs these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    text: String,
    parser: QueryParser,
    sort: SortSpec,
    return_fields: ReturnFields,
    cursor: Cursor,
    page_size: u32,
}

impl Query {
    pub(crate) fn new(
        text: String,
        parser: QueryParser,
        sort: SortSpec,
        return_fields: ReturnFields,
        page_size: u32,
    ) -> Self {
        Self {
            text,
            parser,
            sort,
            return_fields,
            cursor: Cursor::initial(),
            page_size,
        }
    }

    /// The raw input, matched as a literal phrase
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parser(&self) -> QueryParser {
        self.parser
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn return_fields(&self) -> &ReturnFields {
        &self.return_fields
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

/// A single matched document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Document identifier, `<name>.json` for the indexed corpus
    pub id: String,
    /// Every field the backend returned for the document
    pub fields: Map<String, Value>,
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
        write!(f, "{{id: {}, fields: {}}}", self.id, fields)
    }
}

/// One page of hits as ranked by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub hits: Vec<Hit>,
    /// Total number of matches; may exceed `hits.len()`
    pub found: u64,
}

/// Corpus file as stored in the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Primary key (backend-safe form of `source`)
    pub id: String,
    /// Corpus file name, e.g. `users.json`
    pub source: String,
    /// Parsed file contents
    pub records: Value,
}
