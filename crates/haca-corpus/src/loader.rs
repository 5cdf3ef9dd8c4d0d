//! Corpus file loading
//!
//! Reads the archive dataset from YAML or JSON. The on-disk shape keeps
//! three account maps keyed by identifier and a flat document list:
//!
//! ```yaml
//! users:
//!   INTERN-01: { name: "J. Doe", clearance: 1 }
//! hiddenUsers: {}
//! secretUsers:
//!   ECHO: { name: "Echo", clearance: 5, infected: true }
//! documents:
//!   - id: SYS-001
//!     title: Orientation
//!     type: GUIDE
//!     scl: 1
//!     keywords: [guide, orientation]
//!     content: |
//!       Welcome to the archive.
//! ```

use crate::account::{Account, AccountTier};
use crate::clearance::Clearance;
use crate::corpus::Corpus;
use crate::document::Document;
use crate::error::CorpusError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Supported corpus encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl CorpusFormat {
    /// Detect format from file extension
    ///
    /// # Errors
    /// [`CorpusError::UnsupportedFormat`] for any other extension
    pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(CorpusError::UnsupportedFormat(ext)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCorpus {
    #[serde(default)]
    users: IndexMap<String, RawAccount>,
    #[serde(default)]
    hidden_users: IndexMap<String, RawAccount>,
    #[serde(default)]
    secret_users: IndexMap<String, RawAccount>,
    #[serde(default)]
    documents: Vec<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    name: String,
    clearance: u8,
    #[serde(default)]
    infected: bool,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    id: String,
    title: String,
    #[serde(rename = "type")]
    document_type: String,
    scl: u8,
    #[serde(default)]
    keywords: Vec<String>,
    content: String,
}

impl RawCorpus {
    fn into_corpus(self) -> Result<Corpus, CorpusError> {
        let tiers = [
            (AccountTier::Standard, self.users),
            (AccountTier::Hidden, self.hidden_users),
            (AccountTier::Secret, self.secret_users),
        ];

        let accounts = tiers.into_iter().flat_map(|(tier, map)| {
            map.into_iter().map(move |(identifier, raw)| {
                let account = Account::new(identifier, raw.name, Clearance::new(raw.clearance))
                    .with_tier(tier);
                if raw.infected {
                    account.infected()
                } else {
                    account
                }
            })
        });

        let documents = self.documents.into_iter().map(|raw| {
            Document::new(
                raw.id,
                raw.title,
                raw.document_type,
                Clearance::new(raw.scl),
                raw.content,
            )
            .with_keywords(raw.keywords)
        });

        Corpus::builder()
            .accounts(accounts)
            .documents(documents)
            .build()
    }
}

/// Parse corpus text in the given format
///
/// # Errors
/// Syntax/schema errors from the decoder, or validation errors from
/// [`crate::CorpusBuilder::build`].
pub fn parse_corpus(source: &str, format: CorpusFormat) -> Result<Corpus, CorpusError> {
    let raw: RawCorpus = match format {
        CorpusFormat::Yaml => serde_yaml::from_str(source)?,
        CorpusFormat::Json => serde_json::from_str(source)?,
    };
    raw.into_corpus()
}

/// Load corpus from a file, format chosen by extension
///
/// # Errors
/// IO, format detection, decoding, or validation failures.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Corpus, CorpusError> {
    let path = path.as_ref();
    let format = CorpusFormat::from_path(path)?;
    let source =
        std::fs::read_to_string(path).map_err(|e| CorpusError::io_error(path, e))?;

    let corpus = parse_corpus(&source, format)?;
    tracing::info!(
        path = %path.display(),
        documents = corpus.documents().len(),
        "Corpus loaded"
    );
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
users:
  intern-01: { name: "Intern", clearance: 1 }
hiddenUsers:
  VANCE: { name: "Dr. Vance", clearance: 4 }
secretUsers:
  ECHO: { name: "Echo", clearance: 5, infected: true }
documents:
  - id: sys-001
    title: Orientation
    type: GUIDE
    scl: 1
    keywords: [guide]
    content: "Welcome."
"#;

    #[test]
    fn parses_yaml_tiers() {
        let corpus = parse_corpus(YAML, CorpusFormat::Yaml).unwrap();

        assert_eq!(corpus.find_account("INTERN-01").unwrap().tier(), AccountTier::Standard);
        assert_eq!(corpus.find_account("vance").unwrap().tier(), AccountTier::Hidden);
        let echo = corpus.find_account("echo").unwrap();
        assert_eq!(echo.tier(), AccountTier::Secret);
        assert!(echo.is_infected());
    }

    #[test]
    fn parses_json_documents() {
        let json = r#"{
            "users": { "A": { "name": "a", "clearance": 2 } },
            "documents": [
                { "id": "X-1", "title": "t", "type": "MEMO", "scl": 2, "content": "c" }
            ]
        }"#;
        let corpus = parse_corpus(json, CorpusFormat::Json).unwrap();
        let doc = corpus.find_document("x-1").unwrap();

        assert_eq!(doc.required_clearance(), Clearance::new(2));
        assert_eq!(doc.keywords().count(), 0);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let corpus = parse_corpus("documents: []", CorpusFormat::Yaml).unwrap();
        assert_eq!(corpus.stats().documents, 0);
        assert_eq!(corpus.stats().standard_accounts, 0);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(CorpusFormat::from_path(Path::new("a.yml")).unwrap(), CorpusFormat::Yaml);
        assert_eq!(CorpusFormat::from_path(Path::new("a.JSON")).unwrap(), CorpusFormat::Json);
        assert!(matches!(
            CorpusFormat::from_path(Path::new("a.txt")),
            Err(CorpusError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_error() {
        let result = parse_corpus("documents: [ { id: 1", CorpusFormat::Yaml);
        assert!(matches!(result, Err(CorpusError::Yaml(_))));
    }
}
