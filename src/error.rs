/// Crate-level error types for doclink diagnostics.
use std::path::PathBuf;

/// Only run-fatal conditions become `Error` values. Per-file read failures
/// are isolated inside the corpus snapshot and surface as violations, never
/// as errors. Each variant carries enough context to produce a useful
/// diagnostic without a debugger.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The documentation root is missing or not a directory.
    /// Fatal before any phase starts.
    #[error("documentation root not found: {}", path.display())]
    CorpusRootNotFound {
        /// Root path given on the command line.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of the violation list failed.
    #[error("json serialize: {0}")]
    JsonSer(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// Two or more filenames canonicalize to the same new name.
    /// Fatal before any mutation; never resolved silently.
    #[error("rename collision: {} would all become `{new_name}`", old_names.join(", "))]
    RenameCollision {
        /// The kebab-case name the colliding files map to.
        new_name: String,
        /// Every colliding filename, including an already-canonical occupant.
        old_names: Vec<String>,
    },

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
