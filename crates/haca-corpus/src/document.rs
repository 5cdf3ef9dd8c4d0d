//! Archive documents

use crate::clearance::Clearance;
use crate::corpus::normalize_key;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Archive document
///
/// `raw_body` holds untransformed text with embedded markup tokens; the
/// markup crate turns it into structured fragments when the document is
/// opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DocumentFields")]
pub struct Document {
    id: String,
    title: String,
    document_type: String,
    required_clearance: Clearance,
    keywords: IndexSet<String>,
    raw_body: String,
}

impl Document {
    /// Create document without keywords
    #[must_use]
    pub fn new(
        id: impl AsRef<str>,
        title: impl Into<String>,
        document_type: impl Into<String>,
        required_clearance: Clearance,
        raw_body: impl Into<String>,
    ) -> Self {
        Self {
            id: normalize_key(id.as_ref()),
            title: title.into(),
            document_type: document_type.into(),
            required_clearance,
            keywords: IndexSet::new(),
            raw_body: raw_body.into(),
        }
    }

    /// Attach search keywords (duplicates collapse)
    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Normalized document id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-form type label (e.g. `MEMO`, `INCIDENT REPORT`)
    #[inline]
    #[must_use]
    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    /// Minimum clearance needed to see or open this document
    #[inline]
    #[must_use]
    pub fn required_clearance(&self) -> Clearance {
        self.required_clearance
    }

    /// Search keywords in declaration order
    #[inline]
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Raw body text with markup tokens
    #[inline]
    #[must_use]
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Header fields for result lists and document views
    #[must_use]
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            document_type: self.document_type.clone(),
            required_clearance: self.required_clearance,
        }
    }
}

/// Header fields of a document, without its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document id
    pub id: String,
    /// Title
    pub title: String,
    /// Type label
    pub document_type: String,
    /// Required clearance
    pub required_clearance: Clearance,
}

/// Wire shape of [`Document`]
#[derive(Deserialize)]
struct DocumentFields {
    id: String,
    title: String,
    document_type: String,
    required_clearance: Clearance,
    #[serde(default)]
    keywords: IndexSet<String>,
    #[serde(default)]
    raw_body: String,
}

impl From<DocumentFields> for Document {
    fn from(fields: DocumentFields) -> Self {
        Document::new(
            fields.id,
            fields.title,
            fields.document_type,
            fields.required_clearance,
            fields.raw_body,
        )
        .with_keywords(fields.keywords)
    }
}
