//! Link extraction: markdown link syntax into structured records.

use std::path::{Component, Path, PathBuf};

use regex::{Captures, Regex};

use crate::types::{Link, LinkKind};

/// Schemes that mark a link external. Anything else is corpus-internal.
const EXTERNAL_SCHEMES: [&str; 4] = ["http://", "https://", "mailto:", "tel:"];

/// Markdown inline link syntax: `[text](target)`.
pub const LINK_PATTERN: &str = r"\[([^\]]+)\]\(([^)]+)\)";

/// Classify a raw link target without touching the corpus.
pub fn classify(raw_target: &str) -> LinkKind {
    if EXTERNAL_SCHEMES.iter().any(|scheme| raw_target.starts_with(scheme)) {
        LinkKind::External
    } else if raw_target.starts_with('#') {
        LinkKind::SameDocument
    } else {
        LinkKind::Internal
    }
}

/// Extract every link in a document, in encounter order.
/// Fragments that don't match the link syntax are not extracted.
///
/// # Panics
///
/// Panics if the hardcoded link regex is invalid (compile-time invariant).
pub fn extract_links(source: &Path, content: &str) -> Vec<Link> {
    let pattern = Regex::new(LINK_PATTERN).expect("valid regex");
    let mut links = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        for cap in pattern.captures_iter(line) {
            links.push(parse_link_capture(&cap, source, line_number(idx)));
        }
    }

    links
}

/// One-based line number from a zero-based line index.
fn line_number(idx: usize) -> u32 {
    u32::try_from(idx.saturating_add(1)).unwrap_or(u32::MAX)
}

/// Collapse `.` and `..` components in a path without touching the
/// filesystem. Preserves leading `..` when there is nothing left to pop.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                let can_pop = matches!(
                    parts.last(),
                    Some(c) if !matches!(c, Component::ParentDir)
                );
                if can_pop {
                    parts.pop();
                } else {
                    parts.push(component);
                }
            },
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}

/// Turn a regex capture into a structured link record.
fn parse_link_capture(cap: &Captures<'_>, source: &Path, line: u32) -> Link {
    let text = cap[1].to_string();
    let raw_target = cap[2].to_string();
    let kind = classify(&raw_target);

    let (base, anchor) = match kind {
        LinkKind::External => (raw_target.clone(), None),
        LinkKind::Internal => split_fragment(&raw_target),
        LinkKind::SameDocument => {
            let fragment = raw_target.trim_start_matches('#');
            (String::new(), Some(fragment.to_string()))
        },
    };

    Link {
        anchor,
        base,
        kind,
        line,
        raw_target,
        source: source.to_path_buf(),
        text,
    }
}

/// Compute the relative path from one corpus directory to a corpus file,
/// rendered with forward slashes as markdown links are written.
pub fn relative_link(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let to_parts: Vec<Component<'_>> = to.components().collect();
    let common = from
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    segments.resize(from.len().saturating_sub(common), "..".to_string());
    for part in to_parts.iter().skip(common) {
        segments.push(part.as_os_str().to_string_lossy().into_owned());
    }

    if segments.is_empty() {
        return ".".to_string();
    }
    segments.join("/")
}

/// Resolve an internal link's base path against its source document's
/// directory (not the corpus root). An empty base resolves to the source
/// document itself.
pub fn resolve_target(source: &Path, base: &str) -> PathBuf {
    if base.is_empty() {
        return source.to_path_buf();
    }
    let source_dir = source.parent().unwrap_or(Path::new(""));
    normalize_path(&source_dir.join(base))
}

/// Split an internal target into base path and optional anchor fragment.
/// An empty fragment counts as no anchor.
fn split_fragment(raw: &str) -> (String, Option<String>) {
    match raw.split_once('#') {
        None => (raw.to_string(), None),
        Some((base, "")) => (base.to_string(), None),
        Some((base, anchor)) => (base.to_string(), Some(anchor.to_string())),
    }
}
