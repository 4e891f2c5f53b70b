//! Markdown report rendering. Pure formatting, no decision logic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::types::{RenameMapping, Violation, ViolationKind};

/// Render the harmonization report: convention note, mapping table with
/// renamed rows first (alphabetical) then unchanged rows, and impact
/// counts.
pub fn render_rename_report(
    total_files: usize,
    stubs: usize,
    basenames: &BTreeSet<String>,
    mapping: &RenameMapping,
) -> String {
    let mut out = String::new();
    out.push_str("# File Name Harmonization Report\n\n");
    out.push_str(
        "This report documents the file name changes made to standardize \
         documentation naming conventions.\n\n",
    );

    out.push_str("## Naming Convention\n\n");
    out.push_str("- All documentation files use **kebab-case** (lowercase with hyphens)\n");
    out.push_str("- Example: `BlackLitterman-Implementation.md` -> `black-litterman-implementation.md`\n\n");

    out.push_str("## File Mapping\n\n");
    out.push_str("| Original Filename | New Filename | Status |\n");
    out.push_str("|-------------------|--------------|--------|\n");
    for (old, new) in mapping.iter() {
        let _ = writeln!(out, "| {old} | {new} | Renamed |");
    }
    for name in basenames {
        if mapping.get(name).is_none() {
            let _ = writeln!(out, "| {name} | {name} | Unchanged |");
        }
    }

    out.push_str("\n## Impact\n\n");
    let _ = writeln!(out, "- Total markdown files: {total_files}");
    let _ = writeln!(out, "- Files renamed: {}", mapping.len());
    let _ = writeln!(out, "- Redirect stubs created: {stubs}");

    out.push_str("\n## Next Steps\n\n");
    out.push_str("1. Update any external references to these files\n");
    out.push_str("2. Review the redirect stubs for correctness\n");
    out.push_str("3. Run `doclink check` to verify all internal references resolve\n");

    out
}

/// Render the link-integrity report: summary counts, then one row per
/// file with affected files first (alphabetical) followed by clean ones,
/// then the detail list of every violation in validation order.
pub fn render_validation_report(all_paths: &[PathBuf], violations: &[Violation]) -> String {
    let mut per_file: BTreeMap<&PathBuf, usize> = BTreeMap::new();
    for violation in violations {
        let count = per_file.entry(&violation.source).or_insert(0);
        *count = count.saturating_add(1);
    }

    let mut out = String::new();
    out.push_str("# Link Integrity Report\n\n");

    out.push_str("## Summary\n\n");
    let _ = writeln!(out, "- Total files: {}", all_paths.len());
    let _ = writeln!(out, "- Valid files: {}", all_paths.len().saturating_sub(per_file.len()));
    let _ = writeln!(out, "- Files with violations: {}", per_file.len());
    let _ = writeln!(out, "- Total violations: {}", violations.len());

    out.push_str("\n## Files\n\n");
    out.push_str("| File | Status | Violations |\n");
    out.push_str("|------|--------|------------|\n");
    for (path, count) in &per_file {
        let _ = writeln!(out, "| {} | Invalid | {count} |", path.display());
    }
    for path in all_paths {
        if !per_file.contains_key(path) {
            let _ = writeln!(out, "| {} | Valid | 0 |", path.display());
        }
    }

    if !violations.is_empty() {
        out.push_str("\n## Violations\n\n");
        for violation in violations {
            match violation.kind {
                ViolationKind::SourceUnreadable => {
                    let _ = writeln!(
                        out,
                        "- `{}` - {}: {}",
                        violation.source.display(),
                        violation.kind.describe(),
                        violation.link_url,
                    );
                },
                ViolationKind::AnchorMissing | ViolationKind::TargetMissing => {
                    let _ = writeln!(
                        out,
                        "- `{}`:{} `[{}]({})` - {}: `{}`",
                        violation.source.display(),
                        violation.line,
                        violation.link_text,
                        violation.link_url,
                        violation.kind.describe(),
                        violation.target,
                    );
                },
            }
        }
    }

    out
}
