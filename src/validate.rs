//! Link validation: membership checks against the snapshot and anchor index.

use std::path::{Path, PathBuf};

use crate::anchors::AnchorIndex;
use crate::corpus::Corpus;
use crate::links;
use crate::types::{Link, LinkKind, Violation, ViolationKind};

/// Check one link against the snapshot and the anchor index.
/// External and bare-fragment links never produce violations. The two
/// failure kinds are independent: a missing anchor on an existing target
/// is reported even though the target file exists.
fn check_link(corpus: &Corpus, index: &AnchorIndex, link: &Link) -> Option<Violation> {
    if !matches!(link.kind, LinkKind::Internal) {
        return None;
    }

    let resolved = links::resolve_target(&link.source, &link.base);
    if !corpus.contains(&resolved) {
        return Some(link_violation(link, ViolationKind::TargetMissing, &resolved));
    }

    // A link to an existing file with no anchor is always valid.
    match &link.anchor {
        Some(anchor) if !index.contains(&resolved, anchor) => {
            Some(link_violation(link, ViolationKind::AnchorMissing, &resolved))
        },
        _ => None,
    }
}

/// Build a violation record for one failed link.
fn link_violation(link: &Link, kind: ViolationKind, resolved: &Path) -> Violation {
    let target = match &link.anchor {
        None => resolved.display().to_string(),
        Some(anchor) => format!("{}#{anchor}", resolved.display()),
    };

    Violation {
        kind,
        line: link.line,
        link_text: link.text.clone(),
        link_url: link.raw_target.clone(),
        source: link.source.clone(),
        target,
    }
}

/// The single record an unreadable document contributes.
fn unreadable_violation(path: &Path, reason: &str) -> Violation {
    Violation {
        kind: ViolationKind::SourceUnreadable,
        line: 0,
        link_text: String::new(),
        link_url: reason.to_string(),
        source: path.to_path_buf(),
        target: String::new(),
    }
}

/// Validate every internal link in the corpus.
///
/// Requires a fully built `AnchorIndex`; indexing strictly precedes
/// validation, with no interleaving. Violations come back in document
/// traversal order, then link encounter order within each document.
/// A file that failed to read contributes a single record and never
/// blocks validation of the others.
pub fn validate(corpus: &Corpus, index: &AnchorIndex) -> Vec<Violation> {
    let mut paths: Vec<&PathBuf> = corpus
        .paths()
        .chain(corpus.unreadable().map(|(path, _)| path))
        .collect();
    paths.sort();

    let mut violations = Vec::new();
    for path in paths {
        if let Some(content) = corpus.content(path) {
            for link in links::extract_links(path, content) {
                if let Some(violation) = check_link(corpus, index, &link) {
                    violations.push(violation);
                }
            }
        } else if let Some(reason) = corpus.read_failure(path) {
            violations.push(unreadable_violation(path, reason));
        }
    }

    violations
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn corpus_from(files: &[(&str, &str)]) -> (tempfile::TempDir, Corpus) {
        let dir = tempfile::tempdir().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }
        let config = Config::load(dir.path()).unwrap();
        let corpus = Corpus::load(dir.path(), &config).unwrap();
        (dir, corpus)
    }

    fn run(corpus: &Corpus) -> Vec<Violation> {
        let index = AnchorIndex::build(corpus);
        validate(corpus, &index)
    }

    #[test]
    fn missing_target_is_reported_once() {
        let (_dir, corpus) = corpus_from(&[("doc.md", "[x](missing.md)\n")]);
        let violations = run(&corpus);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::TargetMissing);
        assert_eq!(violations[0].source, PathBuf::from("doc.md"));
        assert_eq!(violations[0].target, "missing.md");
    }

    #[test]
    fn missing_anchor_on_existing_target_is_reported() {
        let (_dir, corpus) = corpus_from(&[
            ("doc.md", "[x](guide.md#nope)\n"),
            ("guide.md", "## Setup\n"),
        ]);
        let violations = run(&corpus);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::AnchorMissing);
        assert_eq!(violations[0].target, "guide.md#nope");
    }

    #[test]
    fn existing_target_without_anchor_is_always_valid() {
        let (_dir, corpus) = corpus_from(&[
            ("doc.md", "[x](guide.md)\n"),
            ("guide.md", "no headers here\n"),
        ]);
        assert!(run(&corpus).is_empty());
    }

    #[test]
    fn anchor_defined_later_in_traversal_order_resolves() {
        // a.md sorts before z.md, so z.md is indexed after a.md's links
        // would be seen by a single interleaved pass.
        let (_dir, corpus) = corpus_from(&[
            ("a.md", "[end](z.md#wrap-up)\n"),
            ("z.md", "# Wrap Up\n"),
        ]);
        assert!(run(&corpus).is_empty());
    }

    #[test]
    fn external_and_bare_fragment_links_are_skipped() {
        let (_dir, corpus) = corpus_from(&[(
            "doc.md",
            "[a](https://example.com/x.md)\n[b](mailto:me@example.com)\n[c](#local-note)\n",
        )]);
        assert!(run(&corpus).is_empty());
    }

    #[test]
    fn violations_keep_document_then_link_order() {
        let (_dir, corpus) = corpus_from(&[
            ("b.md", "[one](gone.md)\n[two](also-gone.md)\n"),
            ("a.md", "[zero](nope.md)\n"),
        ]);
        let violations = run(&corpus);

        let order: Vec<(&Path, u32)> = violations
            .iter()
            .map(|v| (v.source.as_path(), v.line))
            .collect();
        assert_eq!(
            order,
            vec![
                (Path::new("a.md"), 1),
                (Path::new("b.md"), 1),
                (Path::new("b.md"), 2),
            ]
        );
    }

    #[test]
    fn unreadable_file_contributes_one_record_and_isolates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.md"), "[x](missing.md)\n").unwrap();
        std::fs::write(dir.path().join("bad.md"), [0xff_u8, 0x00, 0x9f]).unwrap();
        let config = Config::load(dir.path()).unwrap();
        let corpus = Corpus::load(dir.path(), &config).unwrap();

        let violations = run(&corpus);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].kind, ViolationKind::SourceUnreadable);
        assert_eq!(violations[0].source, PathBuf::from("bad.md"));
        assert_eq!(violations[1].kind, ViolationKind::TargetMissing);
    }
}
