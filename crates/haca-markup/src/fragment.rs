//! Structured output of the transformer

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

/// Glyph that leads every warning span
pub const ALERT_GLYPH: char = '⚠';

/// One classified piece of a transformed document body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    /// Unannotated text (never contains a line break)
    Text(String),

    /// Redaction marker; non-interactive
    Redacted {
        /// Marker text as it appeared in the source
        text: String,
    },

    /// Corruption marker; non-interactive
    Corrupted {
        /// Marker text as it appeared in the source
        text: String,
    },

    /// Randomized glitch glyphs
    Garbled {
        /// Generated glyph run
        glyphs: String,
    },

    /// Interactive keyword; selecting it searches for `text`
    Keyword {
        /// Matched text, original casing
        text: String,
    },

    /// Warning span; children are whatever earlier rules produced inside it
    Warning {
        /// Warning content, leading whitespace trimmed
        children: Vec<Fragment>,
    },

    /// Explicit line break
    LineBreak,
}

impl Fragment {
    /// Hover text for annotated spans
    #[must_use]
    pub fn tooltip(&self) -> Option<Cow<'static, str>> {
        match self {
            Fragment::Redacted { .. } => Some(Cow::Borrowed("requires higher clearance")),
            Fragment::Corrupted { .. } => Some(Cow::Borrowed("data corrupted")),
            Fragment::Keyword { text } => Some(Cow::Owned(format!("click to search: {text}"))),
            _ => None,
        }
    }

    /// Whether the presentation layer should make this fragment clickable
    #[inline]
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self, Fragment::Keyword { .. })
    }
}

impl Display for Fragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Text(text)
            | Fragment::Redacted { text }
            | Fragment::Corrupted { text }
            | Fragment::Keyword { text } => f.write_str(text),
            Fragment::Garbled { glyphs } => f.write_str(glyphs),
            Fragment::Warning { children } => {
                write!(f, "{ALERT_GLYPH} ")?;
                children.iter().try_for_each(|child| write!(f, "{child}"))
            }
            Fragment::LineBreak => f.write_str("\n"),
        }
    }
}

/// Transformed document body
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformedBody {
    fragments: Vec<Fragment>,
}

impl TransformedBody {
    /// Wrap a fragment list
    #[inline]
    #[must_use]
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    /// Top-level fragments in document order
    #[inline]
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Consume into the fragment list
    #[inline]
    #[must_use]
    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    /// Depth-first walk including warning children
    #[must_use]
    pub fn flatten(&self) -> Vec<&Fragment> {
        fn walk<'a>(fragments: &'a [Fragment], out: &mut Vec<&'a Fragment>) {
            for fragment in fragments {
                out.push(fragment);
                if let Fragment::Warning { children } = fragment {
                    walk(children, out);
                }
            }
        }

        let mut out = Vec::with_capacity(self.fragments.len());
        walk(&self.fragments, &mut out);
        out
    }

    /// Keyword texts in reading order, including those inside warnings
    #[must_use]
    pub fn keywords(&self) -> Vec<&str> {
        self.flatten()
            .into_iter()
            .filter_map(|fragment| match fragment {
                Fragment::Keyword { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of line breaks
    #[must_use]
    pub fn line_breaks(&self) -> usize {
        self.fragments
            .iter()
            .filter(|f| matches!(f, Fragment::LineBreak))
            .count()
    }
}

impl Display for TransformedBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fragments.iter().try_for_each(|fragment| write!(f, "{fragment}"))
    }
}
