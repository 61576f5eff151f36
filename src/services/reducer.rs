// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::search::ResultSet;
use std::fmt::Write;

/// Flatten a result page into one string: `<id> <hit>` for every hit, in the
/// order the backend ranked them. No sorting, filtering, or dedup.
/// A missing result set reduces to an empty string.
pub fn reduce_results(results: Option<&ResultSet>) -> String {
    let mut summary = String::new();

    if let Some(results) = results {
        for hit in &results.hits {
            let _ = write!(summary, "{} {}", hit.id, hit);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::Hit;
    use serde_json::{json, Map};

    fn hit(id: &str) -> Hit {
        let mut fields = Map::new();
        fields.insert("source".to_string(), json!(id));
        Hit {
            id: id.to_string(),
            fields,
        }
    }

    #[test]
    fn test_reduce_absent_results() {
        assert_eq!(reduce_results(None), "");
    }

    #[test]
    fn test_reduce_empty_results() {
        let results = ResultSet {
            hits: vec![],
            found: 0,
        };
        assert_eq!(reduce_results(Some(&results)), "");
    }

    #[test]
    fn test_reduce_single_hit() {
        let users = hit("users.json");
        let results = ResultSet {
            hits: vec![users.clone()],
            found: 1,
        };

        assert_eq!(
            reduce_results(Some(&results)),
            format!("users.json {users}")
        );
    }

    #[test]
    fn test_reduce_preserves_backend_order() {
        let tickets = hit("tickets.json");
        let users = hit("users.json");
        let results = ResultSet {
            hits: vec![tickets.clone(), users.clone()],
            found: 2,
        };

        assert_eq!(
            reduce_results(Some(&results)),
            format!("tickets.json {tickets}users.json {users}")
        );
    }

    #[test]
    fn test_reduce_keeps_duplicates() {
        let users = hit("users.json");
        let results = ResultSet {
            hits: vec![users.clone(), users.clone()],
            found: 2,
        };

        let summary = reduce_results(Some(&results));
        assert_eq!(summary.matches("users.json {id").count(), 2);
    }

    #[test]
    fn test_reduce_reports_only_present_hits() {
        // found exceeds the page; only the returned hit is reported
        let results = ResultSet {
            hits: vec![hit("organizations.json")],
            found: 57,
        };

        let summary = reduce_results(Some(&results));
        assert!(summary.starts_with("organizations.json {id: organizations.json"));
        assert_eq!(summary.matches("{id:").count(), 1);
    }
}
