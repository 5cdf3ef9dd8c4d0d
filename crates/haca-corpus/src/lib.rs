//! HACA Corpus Store
//!
//! Static, read-only dataset behind the archive terminal.
//!
//! # Overview
//!
//! The corpus provides:
//! - **Clearance**: integer security level (SCL) shared by accounts and documents
//! - **Account**: employee identity in one of three discoverability tiers
//! - **Document**: archive record gated by a required clearance
//! - **Corpus**: validated, immutable collection of both, loaded once at startup
//!
//! # Example
//!
//! ```rust
//! use haca_corpus::{Account, AccountTier, Clearance, Corpus, Document};
//!
//! let corpus = Corpus::builder()
//!     .account(Account::new("intern-01", "Intern", Clearance::new(1)))
//!     .account(Account::new("ECHO", "Echo", Clearance::new(5)).with_tier(AccountTier::Secret))
//!     .document(Document::new("SYS-001", "Orientation", "GUIDE", Clearance::new(1), "Welcome."))
//!     .build()
//!     .unwrap();
//!
//! let account = corpus.find_account("Intern-01").unwrap();
//! assert_eq!(account.identifier(), "INTERN-01");
//! assert!(corpus.find_document("sys-001").is_some());
//! ```

#![warn(missing_docs)]

pub mod account;
pub mod clearance;
pub mod corpus;
pub mod document;
pub mod error;
pub mod loader;

// Re-exports
pub use account::{Account, AccountTier};
pub use clearance::Clearance;
pub use corpus::{normalize_key, Corpus, CorpusBuilder, CorpusStats};
pub use document::{Document, DocumentSummary};
pub use error::CorpusError;
pub use loader::{load_corpus, parse_corpus, CorpusFormat};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for corpus access
    pub use crate::{
        Account, AccountTier, Clearance, Corpus, CorpusError, Document, DocumentSummary,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
