// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Turns a raw query string into a fully specified search request.

use crate::models::search::{Query, QueryParser, ReturnFields, SortSpec};
use anyhow::{Context, Result};
use std::env;

/// Results returned per request; only the first page is ever fetched
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Settings applied uniformly to every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    pub parser: QueryParser,
    pub sort: SortSpec,
    pub return_fields: ReturnFields,
    pub page_size: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            parser: QueryParser::Simple,
            sort: SortSpec::Relevance,
            return_fields: ReturnFields::All,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryConfig {
    /// Load query settings from environment variables.
    /// Only `SEARCH_SORT` is configurable; everything else keeps its default.
    pub fn from_env() -> Result<Self> {
        let sort = match env::var("SEARCH_SORT") {
            Ok(spec) => spec
                .parse()
                .with_context(|| format!("SEARCH_SORT is not a valid sort: {spec}"))?,
            Err(_) => SortSpec::Relevance,
        };

        Ok(Self {
            sort,
            ..Self::default()
        })
    }
}

/// Build the request for `text`. The text is passed through untouched: no
/// escaping, trimming, or operator handling.
pub fn build_query(text: &str, config: &QueryConfig) -> Query {
    Query::new(
        text.to_string(),
        config.parser,
        config.sort.clone(),
        config.return_fields.clone(),
        config.page_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::SortOrder;

    #[test]
    fn test_build_query_uses_text_verbatim() {
        let query = build_query("  A Catastrophe in Korea ", &QueryConfig::default());
        assert_eq!(query.text(), "  A Catastrophe in Korea ");
    }

    #[test]
    fn test_build_query_defaults() {
        let query = build_query("coffey", &QueryConfig::default());

        assert_eq!(query.parser(), QueryParser::Simple);
        assert_eq!(query.sort(), &SortSpec::Relevance);
        assert_eq!(query.return_fields(), &ReturnFields::All);
        assert!(query.cursor().is_initial());
        assert_eq!(query.page_size(), 20);
    }

    #[test]
    fn test_build_query_empty_text() {
        let query = build_query("", &QueryConfig::default());
        assert_eq!(query.text(), "");
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);
        assert!(query.cursor().is_initial());
    }

    #[test]
    fn test_build_query_operator_characters_are_literal() {
        let input = "+Trinidad -\"MegaCorp\" | http://initech.zendesk.com/api/v2/organizations/103.json";
        let query = build_query(input, &QueryConfig::default());
        assert_eq!(query.text(), input);
    }

    #[test]
    fn test_build_query_is_deterministic() {
        let config = QueryConfig::default();
        assert_eq!(build_query("cherry", &config), build_query("cherry", &config));
    }

    #[test]
    fn test_build_query_applies_config() {
        let config = QueryConfig {
            parser: QueryParser::Loose,
            sort: SortSpec::Field {
                name: "source".to_string(),
                order: SortOrder::Asc,
            },
            return_fields: ReturnFields::Only(vec!["source".to_string()]),
            page_size: 5,
        };

        let query = build_query("cherry", &config);

        assert_eq!(query.parser(), QueryParser::Loose);
        assert_eq!(query.sort(), &config.sort);
        assert_eq!(query.return_fields(), &config.return_fields);
        assert_eq!(query.page_size(), 5);
        assert!(query.cursor().is_initial());
    }
}
