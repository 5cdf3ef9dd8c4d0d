//! Markup transformer
//!
//! Each rule rewrites only the [`Fragment::Text`] pieces left by the
//! previous rules, so annotated output is never matched twice.

use crate::fragment::{Fragment, TransformedBody};
use crate::glyph::garble;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use std::collections::VecDeque;

/// Redaction marker
pub const REDACTED_MARKER: &str = "[DATA REDACTED]";

/// Corruption marker
pub const CORRUPTED_MARKER: &str = "[DATA CORRUPTED]";

/// Glitch marker, replaced by random glyphs
pub const GARBLED_MARKER: &str = "[GARBLED]";

/// Opening of a warning span; closed by the next `]` on the same line
pub const WARNING_OPEN: &str = "[WARNING";

/// Keywords highlighted when no list is configured
pub const DEFAULT_KEYWORDS: &[&str] = &["THORNE", "VANCE", "KAELEN", "B4", "RESONANCE", "MIMIR"];

static DEFAULT_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| keyword_pattern(DEFAULT_KEYWORDS).ok().flatten());

/// Errors building a transformer
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// Keyword list entry is empty or whitespace
    #[error("keyword must not be blank")]
    BlankKeyword,

    /// Keyword alternation failed to compile
    #[error("keyword pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

fn keyword_pattern<S: AsRef<str>>(keywords: &[S]) -> Result<Option<Regex>, MarkupError> {
    if keywords.is_empty() {
        return Ok(None);
    }
    let mut alternatives = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.as_ref().trim();
        if keyword.is_empty() {
            return Err(MarkupError::BlankKeyword);
        }
        alternatives.push(regex::escape(keyword));
    }
    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    Ok(Some(Regex::new(&pattern)?))
}

/// Document body transformer
#[derive(Debug, Clone)]
pub struct ContentTransformer {
    keywords: Option<Regex>,
}

impl Default for ContentTransformer {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_PATTERN.clone(),
        }
    }
}

impl ContentTransformer {
    /// Transformer highlighting a custom keyword list
    ///
    /// An empty list disables keyword highlighting.
    ///
    /// # Errors
    /// [`MarkupError::BlankKeyword`] for blank entries.
    pub fn with_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self, MarkupError> {
        Ok(Self {
            keywords: keyword_pattern(keywords)?,
        })
    }

    /// Transform raw document text
    ///
    /// Deterministic except for [`GARBLED_MARKER`], which draws fresh glyphs
    /// from `rng` for every occurrence.
    pub fn transform<R: Rng + ?Sized>(&self, raw: &str, rng: &mut R) -> TransformedBody {
        let mut fragments = vec![Fragment::Text(raw.to_string())];

        fragments = map_text(fragments, |text, out| {
            split_literal(&text, REDACTED_MARKER, out, || Fragment::Redacted {
                text: REDACTED_MARKER.to_string(),
            });
        });
        fragments = map_text(fragments, |text, out| {
            split_literal(&text, CORRUPTED_MARKER, out, || Fragment::Corrupted {
                text: CORRUPTED_MARKER.to_string(),
            });
        });
        fragments = map_text(fragments, |text, out| {
            split_literal(&text, GARBLED_MARKER, out, || Fragment::Garbled {
                glyphs: garble(rng),
            });
        });
        if let Some(pattern) = &self.keywords {
            fragments = map_text(fragments, |text, out| mark_keywords(pattern, &text, out));
        }
        fragments = mark_warnings(fragments);
        fragments = map_text(fragments, |text, out| split_line_breaks(&text, out));

        tracing::debug!(fragments = fragments.len(), "Document body transformed");
        TransformedBody::new(fragments)
    }
}

/// Apply `split` to every text fragment, passing others through
fn map_text<F>(fragments: Vec<Fragment>, mut split: F) -> Vec<Fragment>
where
    F: FnMut(String, &mut Vec<Fragment>),
{
    let mut out = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => split(text, &mut out),
            other => out.push(other),
        }
    }
    out
}

/// Append text, merging with a trailing text fragment
fn push_text(out: &mut Vec<Fragment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Fragment::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Fragment::Text(text.to_string()));
    }
}

fn split_literal<F>(text: &str, marker: &str, out: &mut Vec<Fragment>, mut make: F)
where
    F: FnMut() -> Fragment,
{
    let mut rest = text;
    while let Some(pos) = rest.find(marker) {
        push_text(out, &rest[..pos]);
        out.push(make());
        rest = &rest[pos + marker.len()..];
    }
    push_text(out, rest);
}

fn mark_keywords(pattern: &Regex, text: &str, out: &mut Vec<Fragment>) {
    let mut last = 0;
    for m in pattern.find_iter(text) {
        push_text(out, &text[last..m.start()]);
        out.push(Fragment::Keyword {
            text: m.as_str().to_string(),
        });
        last = m.end();
    }
    push_text(out, &text[last..]);
}

fn split_line_breaks(text: &str, out: &mut Vec<Fragment>) {
    let mut lines = text.split('\n');
    if let Some(first) = lines.next() {
        push_text(out, first);
    }
    for line in lines {
        out.push(Fragment::LineBreak);
        push_text(out, line);
    }
}

/// Where a warning closes within one text fragment
enum Close {
    /// Byte offset of the closing `]`
    At(usize),
    /// A line break comes first; the opener is not a warning
    LineEnds,
    /// Neither; the span may continue into the next fragment
    Open,
}

fn find_close(text: &str) -> Close {
    for (idx, c) in text.char_indices() {
        match c {
            ']' => return Close::At(idx),
            '\n' => return Close::LineEnds,
            _ => {}
        }
    }
    Close::Open
}

/// Wrap `[WARNING ...]` spans, possibly spanning earlier annotations
fn mark_warnings(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut queue: VecDeque<Fragment> = fragments.into();
    let mut out = Vec::with_capacity(queue.len());

    while let Some(fragment) = queue.pop_front() {
        let Fragment::Text(text) = fragment else {
            out.push(fragment);
            continue;
        };
        let Some(start) = text.find(WARNING_OPEN) else {
            push_text(&mut out, &text);
            continue;
        };

        let body_start = start + WARNING_OPEN.len();
        let mut children: Vec<Fragment> = Vec::new();
        let mut closed = false;

        match find_close(&text[body_start..]) {
            Close::At(rel) => {
                push_text(&mut children, &text[body_start..body_start + rel]);
                queue.push_front(Fragment::Text(text[body_start + rel + 1..].to_string()));
                closed = true;
            }
            Close::LineEnds => {}
            Close::Open => {
                push_text(&mut children, &text[body_start..]);
                let mut consumed = 0;
                while let Some(next) = queue.get(consumed) {
                    match next {
                        Fragment::Text(t) => match find_close(t) {
                            Close::At(rel) => {
                                let head = t[..rel].to_string();
                                let tail = t[rel + 1..].to_string();
                                children.extend(queue.drain(..consumed));
                                queue.pop_front();
                                push_text(&mut children, &head);
                                queue.push_front(Fragment::Text(tail));
                                closed = true;
                                break;
                            }
                            Close::LineEnds => break,
                            Close::Open => consumed += 1,
                        },
                        _ => consumed += 1,
                    }
                }
            }
        }

        if closed {
            push_text(&mut out, &text[..start]);
            trim_leading(&mut children);
            out.push(Fragment::Warning { children });
        } else {
            // Not a warning: keep the opener as text and rescan after it
            push_text(&mut out, &text[..body_start]);
            queue.push_front(Fragment::Text(text[body_start..].to_string()));
        }
    }

    out
}

fn trim_leading(children: &mut Vec<Fragment>) {
    if let Some(Fragment::Text(first)) = children.first_mut() {
        let trimmed = first.trim_start();
        if trimmed.is_empty() {
            children.remove(0);
        } else if trimmed.len() != first.len() {
            *first = trimmed.to_string();
        }
    }
}
