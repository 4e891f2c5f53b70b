use std::path::Path;

use crate::error::Error;

/// Corpus scan configuration loaded from `.doclink.toml` at the root.
/// Include/exclude patterns are path prefixes applied to corpus-relative
/// markdown paths before they enter the snapshot.
pub struct Config {
    exclude: Vec<String>,
    include: Vec<String>,
}

/// Raw TOML structure for `.doclink.toml`.
#[derive(serde::Deserialize)]
struct DoclinkTomlConfig {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
}

impl Config {
    /// Load config from `.doclink.toml` in the corpus root.
    /// Returns a default that loads everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed — never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(".doclink.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::load_everything_by_default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: DoclinkTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
        })
    }

    /// Default config that includes everything and excludes nothing.
    fn load_everything_by_default() -> Self {
        Self {
            exclude: Vec::new(),
            include: Vec::new(),
        }
    }

    /// Check whether a corpus-relative markdown path belongs in the snapshot.
    ///
    /// A path is included if no include patterns are set (load everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_load(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        !self.exclude.iter().any(|p| relative_path.starts_with(p.as_str()))
    }
}
