//! HACA Markup
//!
//! Rewrites raw archive text into structured, interactive fragments.
//!
//! # Rules
//!
//! Applied in a fixed order; text produced by one rule is never rescanned
//! by a later one:
//!
//! 1. `[DATA REDACTED]` → [`Fragment::Redacted`]
//! 2. `[DATA CORRUPTED]` → [`Fragment::Corrupted`]
//! 3. `[GARBLED]` → [`Fragment::Garbled`] (fresh random glyphs per occurrence)
//! 4. keyword list, whole-word, case-insensitive → [`Fragment::Keyword`]
//! 5. `[WARNING <text>]` → [`Fragment::Warning`]
//! 6. `\n` → [`Fragment::LineBreak`]
//!
//! Everything else passes through as [`Fragment::Text`]. The transformer
//! never fails on document text.
//!
//! # Example
//!
//! ```rust
//! use haca_markup::{ContentTransformer, Fragment};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let transformer = ContentTransformer::default();
//! let mut rng = StdRng::seed_from_u64(7);
//! let body = transformer.transform("Ask VANCE.\n[DATA REDACTED]", &mut rng);
//!
//! assert_eq!(body.keywords(), vec!["VANCE"]);
//! assert!(body.fragments().contains(&Fragment::LineBreak));
//! ```

#![warn(missing_docs)]

pub mod fragment;
pub mod glyph;
pub mod transformer;

// Re-exports
pub use fragment::{Fragment, TransformedBody, ALERT_GLYPH};
pub use glyph::{garble, is_garble, GARBLE_CORE_LEN};
pub use transformer::{
    ContentTransformer, MarkupError, CORRUPTED_MARKER, DEFAULT_KEYWORDS, GARBLED_MARKER,
    REDACTED_MARKER, WARNING_OPEN,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
