//! Document search
//!
//! Case-insensitive substring match over id, keywords and title, filtered
//! through [`can_access`]. Results keep corpus order.

use crate::access::can_access;
use crate::session::Session;
use haca_corpus::{Corpus, Document, DocumentSummary};
use serde::{Deserialize, Serialize};

/// Visible documents matching `query`, in corpus order
///
/// A blank query matches nothing.
#[must_use]
pub fn search<'a>(corpus: &'a Corpus, query: &str, session: &Session) -> Vec<&'a Document> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let results: Vec<_> = corpus
        .documents()
        .iter()
        .filter(|document| can_access(document, session))
        .filter(|document| matches_query(document, &needle))
        .collect();

    tracing::debug!(
        query = %query.trim(),
        clearance = %session.effective_clearance(),
        matches = results.len(),
        "Search completed"
    );
    results
}

/// Whether id, any keyword, or title contains the lowercase `needle`
#[must_use]
pub fn matches_query(document: &Document, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(document.id()) || document.keywords().any(contains) || contains(document.title())
}

/// Non-empty search outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Query as entered (trimmed)
    pub query: String,
    /// Matching documents, corpus order
    pub results: Vec<DocumentSummary>,
}

impl SearchResults {
    /// Summaries for `documents`
    #[must_use]
    pub fn new(query: impl Into<String>, documents: &[&Document]) -> Self {
        Self {
            query: query.into(),
            results: documents.iter().map(|document| document.summary()).collect(),
        }
    }

    /// Number of matches
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if nothing matched
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EscalationConfig;
    use haca_corpus::{Account, Clearance};

    fn corpus() -> Corpus {
        Corpus::builder()
            .documents([
                Document::new("SYS-001", "Orientation Guide", "GUIDE", Clearance::new(1), "")
                    .with_keywords(["guide"]),
                Document::new("MED-002", "Dr. Vance Medical File", "FILE", Clearance::new(2), ""),
                Document::new("LAB-004", "Containment Log", "LOG", Clearance::new(4), "")
                    .with_keywords(["Resonance"]),
            ])
            .build()
            .unwrap()
    }

    fn session(scl: u8) -> Session {
        Session::new(Account::new("T", "t", Clearance::new(scl)), EscalationConfig::default())
    }

    fn ids(found: &[&Document]) -> Vec<String> {
        found.iter().map(|d| d.id().to_string()).collect()
    }

    #[test]
    fn matches_id_keyword_and_title() {
        let corpus = corpus();
        let s = session(5);
        assert_eq!(ids(&search(&corpus, "sys", &s)), vec!["SYS-001"]);
        assert_eq!(ids(&search(&corpus, "RESON", &s)), vec!["LAB-004"]);
        assert_eq!(ids(&search(&corpus, "vance", &s)), vec!["MED-002"]);
    }

    #[test]
    fn results_keep_corpus_order() {
        let corpus = corpus();
        assert_eq!(
            ids(&search(&corpus, "-00", &session(5))),
            vec!["SYS-001", "MED-002", "LAB-004"]
        );
    }

    #[test]
    fn hidden_documents_never_match() {
        let corpus = corpus();
        assert!(search(&corpus, "LAB-004", &session(3)).is_empty());
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(search(&corpus(), "  ", &session(5)).is_empty());
    }

    #[test]
    fn results_carry_summaries() {
        let corpus = corpus();
        let found = search(&corpus, "guide", &session(1));
        let results = SearchResults::new("guide", &found);
        assert_eq!(results.len(), 1);
        assert_eq!(results.results[0].document_type, "GUIDE");
    }
}
