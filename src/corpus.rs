//! Corpus snapshot: every markdown document under a root, loaded once.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;

/// The full document set, path-keyed and held in memory. The single source
/// of truth for every other component: nothing re-reads storage mid-run,
/// and the path set is fixed for the duration of a validation pass.
#[derive(Debug)]
pub struct Corpus {
    /// Paths whose in-memory content differs from storage.
    dirty: BTreeSet<PathBuf>,
    /// Corpus-relative path -> raw content. Sorted iteration order is the
    /// canonical document traversal order.
    docs: BTreeMap<PathBuf, String>,
    /// Root directory all paths are relative to.
    root: PathBuf,
    /// Files that could not be read or decoded, with the reason.
    /// Isolated here instead of failing the run.
    unreadable: BTreeMap<PathBuf, String>,
}

impl Corpus {
    /// True if a document exists at this corpus-relative path.
    pub fn contains(&self, path: &Path) -> bool {
        self.docs.contains_key(path)
    }

    /// Content of the document at `path`, if loaded.
    pub fn content(&self, path: &Path) -> Option<&str> {
        self.docs.get(path).map(String::as_str)
    }

    /// All loaded documents in traversal order.
    pub fn documents(&self) -> impl Iterator<Item = (&PathBuf, &str)> {
        self.docs.iter().map(|(path, content)| (path, content.as_str()))
    }

    /// Write every dirtied document back to storage, each atomically.
    /// Returns how many files were written.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if any write fails. Already-written files stay
    /// written; there is no rollback.
    pub fn flush(&mut self) -> Result<usize, Error> {
        let mut written = 0_usize;
        for path in &self.dirty {
            let Some(content) = self.docs.get(path) else { continue };
            write_atomic(&self.root.join(path), content)?;
            written = written.saturating_add(1);
        }
        self.dirty.clear();
        Ok(written)
    }

    /// Add a new document to the snapshot (used for redirect stubs).
    /// Marked dirty so the next flush creates it on storage.
    pub fn insert(&mut self, path: PathBuf, content: String) {
        self.dirty.insert(path.clone());
        self.docs.insert(path, content);
    }

    /// True when the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Load every markdown file under `root` allowed by the config.
    /// Unreadable or undecodable files are recorded, not fatal.
    ///
    /// # Errors
    ///
    /// Returns `Error::CorpusRootNotFound` if `root` is missing or not a
    /// directory.
    pub fn load(root: &Path, config: &Config) -> Result<Self, Error> {
        if !root.is_dir() {
            return Err(Error::CorpusRootNotFound { path: root.to_path_buf() });
        }

        let mut docs = BTreeMap::new();
        let mut unreadable = BTreeMap::new();

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && has_markdown_extension(e.path()))
        {
            let md_path = entry.path();
            let relative = md_path.strip_prefix(root).unwrap_or(md_path).to_path_buf();
            if !config.should_load(&relative.to_string_lossy()) {
                continue;
            }

            match std::fs::read_to_string(md_path) {
                Ok(content) => {
                    docs.insert(relative, content);
                },
                Err(e) => {
                    unreadable.insert(relative, e.to_string());
                },
            }
        }

        Ok(Self {
            dirty: BTreeSet::new(),
            docs,
            root: root.to_path_buf(),
            unreadable,
        })
    }

    /// All loaded paths in traversal order.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.docs.keys()
    }

    /// Why `path` failed to read, if it did.
    pub fn read_failure(&self, path: &Path) -> Option<&str> {
        self.unreadable.get(path).map(String::as_str)
    }

    /// Move a document's content from `old` to `new`. The new path is
    /// dirtied; callers are expected to insert a redirect stub at the old
    /// path afterwards, so the old file is overwritten rather than deleted.
    pub fn rename(&mut self, old: &Path, new: PathBuf) {
        if let Some(content) = self.docs.remove(old) {
            self.dirty.remove(old);
            self.dirty.insert(new.clone());
            self.docs.insert(new, content);
        }
    }

    /// Files that failed to read, with reasons, in traversal order.
    pub fn unreadable(&self) -> impl Iterator<Item = (&PathBuf, &str)> {
        self.unreadable.iter().map(|(path, reason)| (path, reason.as_str()))
    }

    /// Replace a document's content, dirtying it only when it changed.
    pub fn update(&mut self, path: &Path, content: String) {
        match self.docs.get_mut(path) {
            Some(existing) if *existing != content => {
                *existing = content;
                self.dirty.insert(path.to_path_buf());
            },
            _ => {},
        }
    }
}

/// Case-insensitive `.md` extension test.
fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Write `content` to `path` atomically: temp file in the destination
/// directory, then persist over the target. An interrupted write never
/// leaves a truncated document.
///
/// # Errors
///
/// Returns `Error::Io` on create, write, or persist failure.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
