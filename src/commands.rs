//! Core CLI commands for doclink: check and harmonize.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::anchors::AnchorIndex;
use crate::config::Config;
use crate::corpus::{self, Corpus};
use crate::error::Error;
use crate::links;
use crate::redirect;
use crate::rename;
use crate::report;
use crate::rewrite;
use crate::types::{RenameMapping, Violation, ViolationKind};
use crate::validate;

/// A pending link retarget: replace one link's target in a source document.
struct FixAction {
    /// Markdown file containing the broken link.
    file: PathBuf,
    /// Replacement target, relative to the source document's directory.
    new_target: String,
    /// The broken target exactly as written.
    old_target: String,
    /// Display text of the link being retargeted.
    text: String,
}

/// Apply retarget actions to the snapshot. Links are rewritten as whole
/// `[text](target)` tokens so surrounding prose is never touched.
fn apply_fixes(corpus: &mut Corpus, fixes: &[FixAction]) {
    for fix in fixes {
        let Some(content) = corpus.content(&fix.file) else {
            continue;
        };
        let old_link = format!("[{}]({})", fix.text, fix.old_target);
        let new_link = format!("[{}]({})", fix.text, fix.new_target);
        let updated = content.replace(&old_link, &new_link);
        corpus.update(&fix.file, updated);
    }
    return;
}

/// Validate every internal link, optionally retargeting fixable ones.
///
/// Anchor indexing strictly precedes validation. With `fix`, changed
/// documents are flushed and the corpus is re-indexed and re-validated so
/// the exit code reflects what actually remains broken.
///
/// # Errors
///
/// Returns errors from config loading, corpus loading, flushing, report
/// writing, or JSON serialization.
pub fn check(
    root: &Path,
    fix: bool,
    json: bool,
    report_path: Option<&Path>,
) -> Result<ExitCode, Error> {
    let config = Config::load(root)?;
    let mut corpus = Corpus::load(root, &config)?;

    eprintln!("Collecting section anchors...");
    let index = AnchorIndex::build(&corpus);
    eprintln!("Checking internal links...");
    let mut violations = validate::validate(&corpus, &index);

    if fix && !violations.is_empty() {
        let fixes = collect_retarget_fixes(&corpus, &violations);
        if !fixes.is_empty() {
            for action in &fixes {
                eprintln!(
                    "fix: {}  {} -> {}",
                    action.file.display(),
                    action.old_target,
                    action.new_target
                );
            }
            apply_fixes(&mut corpus, &fixes);
            let written = corpus.flush()?;
            eprintln!("Updated links in {written} files");

            let index = AnchorIndex::build(&corpus);
            violations = validate::validate(&corpus, &index);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&violations)?);
    } else {
        print_violations(&violations);
    }

    if let Some(path) = report_path {
        let all_paths = collect_all_paths(&corpus);
        let rendered = report::render_validation_report(&all_paths, &violations);
        corpus::write_atomic(path, &rendered)?;
        eprintln!("Wrote report to {}", path.display());
    }

    if violations.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    return Ok(ExitCode::from(1));
}

/// Every known path, loaded documents plus unreadable files, sorted.
fn collect_all_paths(corpus: &Corpus) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = corpus.paths().cloned().collect();
    paths.extend(corpus.unreadable().map(|(path, _)| path.clone()));
    paths.sort();
    return paths;
}

/// Distinct basenames of every loaded document.
fn collect_basenames(corpus: &Corpus) -> BTreeSet<String> {
    return corpus
        .paths()
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()))
        .map(str::to_string)
        .collect();
}

/// Corpus paths affected by the mapping, as (old, new) pairs. Redirect
/// stubs stay put even when their basename appears in the mapping.
fn collect_rename_paths(corpus: &Corpus, mapping: &RenameMapping) -> Vec<(PathBuf, PathBuf)> {
    let mut renames = Vec::new();
    for path in corpus.paths() {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(new_name) = mapping.get(name) else {
            continue;
        };
        if corpus.content(path).is_some_and(redirect::is_redirect_stub) {
            continue;
        }
        renames.push((path.clone(), path.with_file_name(new_name)));
    }
    return renames;
}

/// For each missing target whose basename matches exactly one corpus file,
/// build a retarget action. Ambiguous basenames stay violations.
fn collect_retarget_fixes(corpus: &Corpus, violations: &[Violation]) -> Vec<FixAction> {
    let mut fixes = Vec::new();

    for violation in violations {
        if !matches!(violation.kind, ViolationKind::TargetMissing) {
            continue;
        }

        // The recorded target may carry an anchor; the lookup wants the path.
        let missing = violation.target.split('#').next().unwrap_or("");
        let Some(basename) = Path::new(missing).file_name() else {
            continue;
        };

        let candidates: Vec<&PathBuf> = corpus
            .paths()
            .filter(|path| path.file_name() == Some(basename))
            .collect();
        let [candidate] = candidates.as_slice() else {
            continue;
        };

        let source_dir = violation.source.parent().unwrap_or(Path::new(""));
        let mut new_target = links::relative_link(source_dir, candidate);
        if let Some((_, fragment)) = violation.link_url.split_once('#') {
            new_target = format!("{new_target}#{fragment}");
        }

        fixes.push(FixAction {
            file: violation.source.clone(),
            new_target,
            old_target: violation.link_url.clone(),
            text: violation.link_text.clone(),
        });
    }

    return fixes;
}

/// Canonicalize filenames, update every reference, leave redirect stubs.
///
/// References are rewritten before documents move so renamed files carry
/// updated content. Nothing touches storage until the final flush, and a
/// dry run never reaches it; correctness after interruption comes from
/// idempotent re-entry, not rollback.
///
/// # Errors
///
/// Returns `Error::RenameCollision` before any mutation when two filenames
/// canonicalize to the same name, plus config, corpus, flush, and report
/// errors.
pub fn harmonize(root: &Path, dry_run: bool, report_path: &Path) -> Result<ExitCode, Error> {
    let config = Config::load(root)?;
    let mut corpus = Corpus::load(root, &config)?;

    if dry_run {
        eprintln!("Dry run: no changes will be written");
    }
    if corpus.is_empty() {
        eprintln!("No markdown files under {}", root.display());
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("Scanning for files to rename...");
    let mapping = rename::build_mapping(&corpus)?;
    let total_files = corpus.len();
    if mapping.is_empty() {
        eprintln!("All {total_files} filenames already canonical, nothing to do.");
        return Ok(ExitCode::SUCCESS);
    }
    for (old, new) in mapping.iter() {
        eprintln!("rename: {old} -> {new}");
    }

    let basenames = collect_basenames(&corpus);
    let renames = collect_rename_paths(&corpus, &mapping);
    let rewritten = rewrite_references(&mut corpus, &mapping, dry_run);

    if dry_run {
        for (old_path, new_path) in &renames {
            eprintln!(
                "would rename {} -> {} and leave a redirect stub",
                old_path.display(),
                new_path.display()
            );
        }
        eprintln!(
            "Would rename {} files and update references in {rewritten} files",
            renames.len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    for (old_path, new_path) in &renames {
        let Some(new_name) = new_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        corpus.rename(old_path, new_path.clone());
        corpus.insert(old_path.clone(), redirect::stub_content(new_name));
        eprintln!(
            "Renamed {} -> {} (redirect stub left behind)",
            old_path.display(),
            new_path.display()
        );
    }

    let written = corpus.flush()?;
    eprintln!("Wrote {written} files");

    let rendered = report::render_rename_report(total_files, renames.len(), &basenames, &mapping);
    corpus::write_atomic(report_path, &rendered)?;
    eprintln!("Wrote report to {}", report_path.display());

    return Ok(ExitCode::SUCCESS);
}

/// Print one aligned line per violation, then a summary count.
fn print_violations(violations: &[Violation]) {
    for violation in violations {
        match violation.kind {
            ViolationKind::SourceUnreadable => {
                println!(
                    "UNREADABLE  {} ({})",
                    violation.source.display(),
                    violation.link_url
                );
            },
            ViolationKind::AnchorMissing | ViolationKind::TargetMissing => {
                println!(
                    "BROKEN  {}:{}  [{}]({})  ({}: {})",
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

    if violations.is_empty() {
        println!("All internal links valid");
    } else {
        println!();
        println!("{} violations", violations.len());
    }
    return;
}

/// Apply the mapping to every document's links and dependency lists,
/// returning how many documents would change. In dry-run mode the snapshot
/// is left untouched and intended updates are only logged.
fn rewrite_references(corpus: &mut Corpus, mapping: &RenameMapping, dry_run: bool) -> usize {
    let changed: Vec<(PathBuf, String)> = corpus
        .documents()
        .filter_map(|(path, content)| {
            let updated = rewrite::rewrite_content(content, mapping);
            if updated == content {
                None
            } else {
                Some((path.clone(), updated))
            }
        })
        .collect();

    let count = changed.len();
    for (path, updated) in changed {
        if dry_run {
            eprintln!("would update references in {}", path.display());
        } else {
            eprintln!("Updating references in {}", path.display());
            corpus.update(&path, updated);
        }
    }
    return count;
}
