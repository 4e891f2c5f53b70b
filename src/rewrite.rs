//! Reference rewriting: apply a rename mapping to link targets and
//! frontmatter dependency lists, token-exact.

use regex::{Captures, Regex};

use crate::anchors;
use crate::links;
use crate::types::{LinkKind, RenameMapping};

/// Frontmatter dependency list: `dependencies: [a.md, "b.md"]`.
/// `(?s)` lets the bracket body span lines.
const DEPENDENCIES_PATTERN: &str = r"(?s)(dependencies:\s*\[)(.*?)\]";

/// Apply a rename mapping to one document's content.
///
/// Markdown link targets are rewritten only when the final path segment
/// exactly equals a mapped old name; the directory prefix passes through
/// untouched and the anchor fragment is canonicalized through the slug
/// rule so header-cased fragments keep resolving after the rename.
/// Dependency-list entries are matched as whole bare or quoted tokens,
/// never as substrings of longer identifiers.
///
/// Re-running with the same mapping is a no-op: mapped old names are
/// non-canonical and their replacements are canonical, so updated content
/// contains nothing left to match.
///
/// # Panics
///
/// Panics if a hardcoded rewrite regex is invalid (compile-time invariant).
pub fn rewrite_content(content: &str, mapping: &RenameMapping) -> String {
    let link_pattern = Regex::new(links::LINK_PATTERN).expect("valid regex");
    let rewritten = link_pattern
        .replace_all(content, |cap: &Captures<'_>| rewrite_link_capture(cap, mapping));

    let deps_pattern = Regex::new(DEPENDENCIES_PATTERN).expect("valid regex");
    return deps_pattern
        .replace_all(&rewritten, |cap: &Captures<'_>| {
            format!("{}{}]", &cap[1], rewrite_dependency_list(&cap[2], mapping))
        })
        .into_owned();
}

/// Rewrite one comma-separated dependency item when its token (whitespace
/// and quotes aside) exactly equals a mapped old name.
fn rewrite_dependency_item(item: &str, mapping: &RenameMapping) -> String {
    let trimmed_start = item.trim_start();
    let leading = &item[..item.len().saturating_sub(trimmed_start.len())];
    let core = trimmed_start.trim_end();
    let trailing = &trimmed_start[core.len()..];

    let (quote, token) = strip_matching_quotes(core);
    let Some(new_name) = mapping.get(token) else {
        return item.to_string();
    };
    return format!("{leading}{quote}{new_name}{quote}{trailing}");
}

/// Rewrite a dependency list body one item at a time, preserving the
/// original separators and spacing.
fn rewrite_dependency_list(list: &str, mapping: &RenameMapping) -> String {
    return list
        .split(',')
        .map(|item| rewrite_dependency_item(item, mapping))
        .collect::<Vec<_>>()
        .join(",");
}

/// Rewrite one `[text](target)` capture, or reproduce it unchanged.
fn rewrite_link_capture(cap: &Captures<'_>, mapping: &RenameMapping) -> String {
    let text = &cap[1];
    let raw_target = &cap[2];

    if !matches!(links::classify(raw_target), LinkKind::Internal) {
        return cap[0].to_string();
    }

    let (base, fragment) = match raw_target.split_once('#') {
        None => (raw_target, None),
        Some((b, f)) => (b, Some(f)),
    };
    let (dir, file) = match base.rsplit_once('/') {
        None => ("", base),
        Some((d, f)) => (d, f),
    };
    let Some(new_file) = mapping.get(file) else {
        return cap[0].to_string();
    };

    let mut target = String::with_capacity(raw_target.len());
    if !dir.is_empty() {
        target.push_str(dir);
        target.push('/');
    }
    target.push_str(new_file);
    if let Some(fragment) = fragment {
        target.push('#');
        target.push_str(&anchors::slugify(fragment));
    }
    return format!("[{text}]({target})");
}

/// Split a possibly-quoted token into its quote character and inner text.
fn strip_matching_quotes(core: &str) -> (&str, &str) {
    for quote in ["\"", "'"] {
        if let Some(inner) = core.strip_prefix(quote).and_then(|rest| rest.strip_suffix(quote)) {
            return (quote, inner);
        }
    }
    return ("", core);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn mapping(pairs: &[(&str, &str)]) -> RenameMapping {
        let entries: BTreeMap<String, String> = pairs
            .iter()
            .map(|(old, new)| ((*old).to_string(), (*new).to_string()))
            .collect();
        RenameMapping::from_entries(entries)
    }

    #[test]
    fn rewrites_final_segment_and_keeps_prefix() {
        let m = mapping(&[("OverView.md", "overview.md")]);
        let content = "See [intro](../guides/OverView.md) for details.\n";
        assert_eq!(
            rewrite_content(content, &m),
            "See [intro](../guides/overview.md) for details.\n"
        );
    }

    #[test]
    fn canonicalizes_anchor_fragment_on_rewrite() {
        let m = mapping(&[("OverView.md", "overview.md")]);
        let content = "[intro](OverView.md#Intro)\n";
        assert_eq!(rewrite_content(content, &m), "[intro](overview.md#intro)\n");
    }

    #[test]
    fn leaves_external_and_unmapped_links_alone() {
        let m = mapping(&[("OverView.md", "overview.md")]);
        let content = "[a](https://example.com/OverView.md)\n[b](#OverView.md)\n[c](other.md)\n";
        assert_eq!(rewrite_content(content, &m), content);
    }

    #[test]
    fn never_matches_inside_a_longer_segment() {
        let m = mapping(&[("Data.md", "data.md")]);
        let content = "[x](MetaData.md) [y](sub/Data.md)\n";
        assert_eq!(rewrite_content(content, &m), "[x](MetaData.md) [y](sub/data.md)\n");
    }

    #[test]
    fn rewrites_dependency_tokens_quote_aware() {
        let m = mapping(&[("OverView.md", "overview.md"), ("A_B.md", "a-b.md")]);
        let content = "---\ndependencies: [OverView.md, \"A_B.md\", 'other.md']\n---\n";
        assert_eq!(
            rewrite_content(content, &m),
            "---\ndependencies: [overview.md, \"a-b.md\", 'other.md']\n---\n"
        );
    }

    #[test]
    fn dependency_tokens_never_match_partially() {
        let m = mapping(&[("Data.md", "data.md")]);
        let content = "dependencies: [MetaData.md, Data.mdx]\n";
        assert_eq!(rewrite_content(content, &m), content);
    }

    #[test]
    fn multiline_dependency_lists_are_handled() {
        let m = mapping(&[("OverView.md", "overview.md")]);
        let content = "dependencies: [\n  OverView.md,\n  other.md\n]\n";
        assert_eq!(
            rewrite_content(content, &m),
            "dependencies: [\n  overview.md,\n  other.md\n]\n"
        );
    }

    #[test]
    fn rewriting_is_idempotent() {
        let m = mapping(&[("OverView.md", "overview.md"), ("A_B.md", "a-b.md")]);
        let content = "[x](OverView.md#Setup)\ndependencies: [A_B.md]\n";
        let once = rewrite_content(content, &m);
        let twice = rewrite_content(&once, &m);
        assert_eq!(once, twice);
    }
}
