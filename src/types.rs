/// Core domain types for documents, links, renames, and violations.
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One ATX header extracted from a document. Source of anchor derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header depth, 1 through 6.
    pub level: u8,
    /// One-based line number in the document.
    pub line: u32,
    /// Literal header text with markers and surrounding whitespace removed.
    pub text: String,
}

/// A link parsed out of markdown `[text](target)` syntax.
/// Immutable once extracted; re-derived whenever content changes.
#[derive(Debug, Clone)]
pub struct Link {
    /// Anchor fragment following `#`, if any. Empty fragments count as none.
    pub anchor: Option<String>,
    /// Target with any fragment removed. Empty for bare-fragment links.
    pub base: String,
    /// External / internal / same-document classification.
    pub kind: LinkKind,
    /// One-based line number in the source document.
    pub line: u32,
    /// Raw target string inside the parentheses, exactly as written.
    pub raw_target: String,
    /// Document containing the link, corpus-relative.
    pub source: PathBuf,
    /// Display text inside the brackets.
    pub text: String,
}

/// Classification of a link target, decided at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Target begins with a network or contact scheme; never validated.
    External,
    /// Target is a corpus path, optionally with an anchor fragment.
    Internal,
    /// Bare `#fragment` into the source document; never validated.
    SameDocument,
}

/// Old-basename to new-basename mapping, computed once per run.
///
/// Constructed only by `rename::build_mapping`, which guarantees values are
/// unique and never collide with basenames that stay put.
#[derive(Debug, Default)]
pub struct RenameMapping {
    /// Sorted old name -> new name entries.
    entries: BTreeMap<String, String>,
}

impl RenameMapping {
    /// Wrap collision-checked entries into a mapping.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        return Self { entries };
    }

    /// The new basename for `old`, if `old` is being renamed.
    pub fn get(&self, old: &str) -> Option<&str> {
        return self.entries.get(old).map(String::as_str);
    }

    /// True when no filename needs renaming.
    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// All (old, new) pairs in old-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        return self.entries.iter();
    }

    /// Number of basenames being renamed.
    pub fn len(&self) -> usize {
        return self.entries.len();
    }
}

/// A recorded failure of one link, or of one unreadable document.
/// Transient: rebuilt from scratch on every validation pass.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    /// Failure kind. Drives the exit code.
    pub kind: ViolationKind,
    /// One-based line of the offending link; 0 for whole-file records.
    pub line: u32,
    /// Display text of the offending link; empty for whole-file records.
    pub link_text: String,
    /// Raw link target as written; for unreadable files, the read error.
    pub link_url: String,
    /// Document the violation was found in, corpus-relative.
    pub source: PathBuf,
    /// Resolved target (with anchor, if any) that failed the check.
    pub target: String,
}

/// The independent failure kinds of a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// The target file exists but does not define the anchor.
    AnchorMissing,
    /// The source document could not be read or decoded.
    SourceUnreadable,
    /// The resolved target path is not in the corpus.
    TargetMissing,
}

impl ViolationKind {
    /// Short human-readable label used in status lines and reports.
    pub fn describe(self) -> &'static str {
        return match self {
            ViolationKind::AnchorMissing => "anchor missing",
            ViolationKind::SourceUnreadable => "source unreadable",
            ViolationKind::TargetMissing => "target missing",
        };
    }
}
