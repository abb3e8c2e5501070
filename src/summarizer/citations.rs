//! Citation validation against the search results of the same cycle.

use crate::types::{Citation, SearchResult};
use std::collections::HashSet;
use tracing::debug;

fn normalize(url: &str) -> &str {
    url.trim().trim_end_matches('/')
}

/// Keep only citations whose url appears in `results`.
///
/// Matching ignores surrounding whitespace and a trailing `/`. The url of the
/// matched result is returned, duplicates are removed and missing titles are
/// taken from the result.
pub fn validate_citations(claimed: Vec<Citation>, results: &[SearchResult]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for citation in claimed {
        let wanted = normalize(&citation.url);
        let Some(source) = results.iter().find(|r| normalize(&r.url) == wanted) else {
            debug!(url = %citation.url, "Dropping citation not present in search results");
            continue;
        };

        if !seen.insert(source.url.as_str()) {
            continue;
        }

        let title = citation.title.or_else(|| {
            let title = source.title.trim();
            (!title.is_empty()).then(|| title.to_string())
        });

        kept.push(Citation {
            url: source.url.clone(),
            title,
        });
    }

    kept
}
