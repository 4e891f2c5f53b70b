//! Anchor indexing: header extraction and deterministic section slugs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::corpus::Corpus;
use crate::types::Header;

/// Global (document, anchor) index. Populated for the whole corpus before
/// any link is validated, because a link may legally target an anchor
/// defined later in traversal order.
pub struct AnchorIndex {
    /// Document path -> anchor slug -> text of the first header producing it.
    by_document: HashMap<PathBuf, HashMap<String, String>>,
}

impl AnchorIndex {
    /// Build the index over every loaded document.
    ///
    /// Duplicate anchors within one document are first-wins: a repeated
    /// identical header indexes once and later occurrences are ignored.
    /// No `-1`/`-2` suffixing — the slug stays a pure function of the text.
    pub fn build(corpus: &Corpus) -> Self {
        let mut by_document: HashMap<PathBuf, HashMap<String, String>> = HashMap::new();

        for (path, content) in corpus.documents() {
            let doc_anchors = by_document.entry(path.clone()).or_default();
            for header in extract_headers(content) {
                doc_anchors.entry(slugify(&header.text)).or_insert(header.text);
            }
        }

        Self { by_document }
    }

    /// True if `anchor` is defined by some header of the document at `path`.
    pub fn contains(&self, path: &Path, anchor: &str) -> bool {
        self.by_document
            .get(path)
            .is_some_and(|anchors| anchors.contains_key(anchor))
    }
}

/// Extract ATX headers: one to six `#` markers, whitespace, then text.
/// Header-like lines that don't match are skipped, not errors.
///
/// # Panics
///
/// Panics if the hardcoded header regex is invalid (compile-time invariant).
pub fn extract_headers(content: &str) -> Vec<Header> {
    let pattern = Regex::new(r"^(#{1,6})\s+(.+?)\s*$").expect("valid regex");
    let mut headers = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let Some(cap) = pattern.captures(line) else {
            continue;
        };
        headers.push(Header {
            level: u8::try_from(cap[1].len()).unwrap_or(6),
            line: line_number(idx),
            text: cap[2].to_string(),
        });
    }

    headers
}

/// One-based line number from a zero-based line index.
fn line_number(idx: usize) -> u32 {
    u32::try_from(idx.saturating_add(1)).unwrap_or(u32::MAX)
}

/// Deterministic slug of a header's text: trimmed and lowercased, ASCII
/// alphanumerics and literal hyphens kept, whitespace runs collapsed to a
/// single hyphen, everything else stripped. Output alphabet is `[a-z0-9-]`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else if ch.is_whitespace() {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_lowercase_hyphenated() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("API Reference"), "api-reference");
    }

    #[test]
    fn slug_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(slugify("Errors, Panics & Aborts"), "errors-panics-aborts");
        assert_eq!(slugify("What's   new?"), "whats-new");
    }

    #[test]
    fn slug_keeps_literal_hyphens() {
        assert_eq!(slugify("Re-entry rules"), "re-entry-rules");
    }

    #[test]
    fn slug_alphabet_is_constrained() {
        for text in ["Ünïcode Header", "under_score", "trailing! "] {
            let slug = slugify(text);
            assert!(
                slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "slug {slug:?} escapes [a-z0-9-]"
            );
            assert!(!slug.starts_with('-'), "leading hyphen in {slug:?}");
        }
    }

    #[test]
    fn extracts_headers_with_levels_and_lines() {
        let content = "# Title\n\ntext\n\n###   Deep Section  \n####### not a header\n##nospace\n";
        let headers = extract_headers(content);

        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].level, 1);
        assert_eq!(headers[0].line, 1);
        assert_eq!(headers[0].text, "Title");
        assert_eq!(headers[1].level, 3);
        assert_eq!(headers[1].line, 5);
        assert_eq!(headers[1].text, "Deep Section");
    }

    #[test]
    fn duplicate_anchors_are_first_wins() {
        let content = "## Setup\n\n## Setup\n";
        let headers = extract_headers(content);
        assert_eq!(headers.len(), 2);

        let mut anchors: HashMap<String, String> = HashMap::new();
        for header in headers {
            anchors.entry(slugify(&header.text)).or_insert(header.text);
        }
        assert_eq!(anchors.len(), 1);
        assert!(anchors.contains_key("setup"));
    }
}
