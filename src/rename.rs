//! Filename canonicalization: kebab-case detection, conversion, mapping.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::corpus::Corpus;
use crate::error::Error;
use crate::redirect;
use crate::types::RenameMapping;

/// Canonical filename shape: lowercase alphanumeric segments separated by
/// single hyphens, lowercase `.md` suffix.
const CANONICAL_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*\.md$";

/// Compute the old->new basename mapping over every non-canonical filename
/// in the corpus. Redirect stubs left by an earlier run are skipped, so a
/// partially-completed harmonization can be resumed without touching them.
///
/// # Errors
///
/// Returns `Error::RenameCollision` when two old names map to the same new
/// name, or a new name is already taken by a file that stays put. Detection
/// happens before any mutation.
pub fn build_mapping(corpus: &Corpus) -> Result<RenameMapping, Error> {
    let mut basenames: BTreeSet<String> = BTreeSet::new();
    let mut entries: BTreeMap<String, String> = BTreeMap::new();

    for path in corpus.paths() {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        basenames.insert(name.to_string());

        if is_canonical(name) || !has_conversion_trigger(name) {
            continue;
        }
        if corpus.content(path).is_some_and(redirect::is_redirect_stub) {
            continue;
        }

        let converted = canonicalize(name);
        let (stem, _) = split_extension(&converted);
        if converted != name && !stem.is_empty() {
            entries.insert(name.to_string(), converted);
        }
    }

    detect_collisions(&entries, &basenames)?;
    return Ok(RenameMapping::from_entries(entries));
}

/// Convert a filename to kebab-case: underscores become hyphens, a hyphen
/// lands at every lowercase-or-digit to uppercase boundary, and the whole
/// name is lowercased. Hyphen runs collapse and edge hyphens are trimmed,
/// so conversion is idempotent on its own output.
pub fn canonicalize(filename: &str) -> String {
    let (stem, ext) = split_extension(filename);

    let mut out = String::with_capacity(filename.len().saturating_add(4));
    let mut prev: Option<char> = None;
    for ch in stem.chars() {
        if ch == '_' {
            out.push('-');
        } else {
            if ch.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                out.push('-');
            }
            out.push(ch);
        }
        prev = Some(ch);
    }

    let lowered = out.to_lowercase();
    return format!("{}{}", collapse_hyphens(&lowered), ext.to_lowercase());
}

/// Collapse hyphen runs to a single hyphen and trim edge hyphens.
fn collapse_hyphens(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    for ch in stem.chars() {
        if ch == '-' && out.ends_with('-') {
            continue;
        }
        out.push(ch);
    }
    return out.trim_matches('-').to_string();
}

/// Fail loudly when two old names map to one new name, or the new name is
/// occupied by a file that is not being renamed.
fn detect_collisions(
    entries: &BTreeMap<String, String>,
    basenames: &BTreeSet<String>,
) -> Result<(), Error> {
    let mut by_target: BTreeMap<&String, Vec<&String>> = BTreeMap::new();
    for (old, new) in entries {
        by_target.entry(new).or_default().push(old);
    }

    for (new_name, old_names) in by_target {
        // Mapped old names are never canonical, so an occupant can only be
        // a file that stays put.
        let occupied = basenames.contains(new_name.as_str());
        if old_names.len() > 1 || occupied {
            let mut names: Vec<String> = old_names.iter().map(|old| format!("`{old}`")).collect();
            if occupied {
                names.push(format!("`{new_name}` (existing)"));
            }
            return Err(Error::RenameCollision {
                new_name: new_name.clone(),
                old_names: names,
            });
        }
    }

    return Ok(());
}

/// Conversion triggers: any uppercase letter or underscore anywhere in the
/// filename, extension included so `.MD` suffixes are caught too.
fn has_conversion_trigger(filename: &str) -> bool {
    return filename.chars().any(|c| c.is_uppercase() || c == '_');
}

/// True if `filename` already matches the canonical kebab-case shape.
///
/// # Panics
///
/// Panics if the hardcoded canonical-name regex is invalid (compile-time
/// invariant).
pub fn is_canonical(filename: &str) -> bool {
    return Regex::new(CANONICAL_PATTERN).expect("valid regex").is_match(filename);
}

/// Split a filename at its last dot: (stem, extension-with-dot).
fn split_extension(filename: &str) -> (&str, &str) {
    return match filename.rfind('.') {
        None => (filename, ""),
        Some(idx) => filename.split_at(idx),
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::Path;

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

    #[test]
    fn canonical_names_pass_the_shape_test() {
        assert!(is_canonical("overview.md"));
        assert!(is_canonical("black-litterman-implementation.md"));
        assert!(!is_canonical("OverView.md"));
        assert!(!is_canonical("a_b.md"));
        assert!(!is_canonical("a--b.md"));
        assert!(!is_canonical("-a.md"));
    }

    #[test]
    fn converts_camel_case_and_underscores() {
        assert_eq!(canonicalize("OverView.md"), "overview.md");
        assert_eq!(canonicalize("A_B.md"), "a-b.md");
        assert_eq!(
            canonicalize("BlackLitterman-Implementation.md"),
            "black-litterman-implementation.md"
        );
        assert_eq!(canonicalize("api2Reference.md"), "api2-reference.md");
        assert_eq!(canonicalize("HTTPNotes.md"), "httpnotes.md");
        assert_eq!(canonicalize("readme.MD"), "readme.md");
    }

    #[test]
    fn conversion_is_idempotent() {
        for name in ["OverView.md", "A__B.md", "Mixed_CaseFile.md", "plain.md"] {
            let once = canonicalize(name);
            assert_eq!(canonicalize(&once), once, "second pass changed {name}");
        }
    }

    #[test]
    fn mapping_skips_canonical_and_untriggered_names() {
        let (_dir, corpus) = corpus_from(&[
            ("overview.md", ""),
            ("notes.v2.md", ""),
            ("OverView-Notes.md", ""),
        ]);
        let mapping = build_mapping(&corpus).unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("OverView-Notes.md"), Some("over-view-notes.md"));
    }

    #[test]
    fn duplicate_new_names_collide() {
        let (_dir, corpus) = corpus_from(&[("A_B.md", ""), ("A-B.md", "")]);
        let err = build_mapping(&corpus).unwrap_err();
        assert!(matches!(err, Error::RenameCollision { ref new_name, .. } if new_name == "a-b.md"));
    }

    #[test]
    fn occupied_target_collides() {
        let (_dir, corpus) = corpus_from(&[("A_B.md", ""), ("a-b.md", "")]);
        let err = build_mapping(&corpus).unwrap_err();
        assert!(matches!(err, Error::RenameCollision { ref new_name, .. } if new_name == "a-b.md"));
    }

    #[test]
    fn redirect_stubs_are_never_remapped() {
        let stub = redirect::stub_content("overview.md");
        let (_dir, corpus) = corpus_from(&[("OverView.md", stub.as_str()), ("overview.md", "# Real\n")]);
        let mapping = build_mapping(&corpus).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn same_basename_in_two_directories_maps_once() {
        let (_dir, corpus) = corpus_from(&[("a/Guide.md", ""), ("b/Guide.md", "")]);
        let mapping = build_mapping(&corpus).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("Guide.md"), Some("guide.md"));
        assert!(corpus.contains(Path::new("a/Guide.md")));
    }
}
