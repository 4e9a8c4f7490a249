use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Extensions used when the user does not name any
pub const DEFAULT_EXTENSIONS: [&str; 5] = ["wav", "aif", "aiff", "mp3", "flac"];

/// Set of normalized file extensions (lowercase, no leading dot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSet {
    extensions: BTreeSet<String>,
}

impl ExtensionSet {
    /// Build a set from raw extension strings, normalizing each one
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .filter_map(|ext| normalize_extension(ext.as_ref()))
            .collect();

        Self { extensions }
    }

    /// Parse a user supplied list separated by whitespace or commas.
    /// Blank input yields the default set.
    pub fn parse(input: &str) -> Self {
        let set = Self::new(
            input
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty()),
        );

        if set.is_empty() {
            Self::default()
        } else {
            set
        }
    }

    pub fn contains(&self, extension: &str) -> bool {
        normalize_extension(extension)
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Check whether the extension of `path` is a member of the set
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.contains(ext))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

/// Trim surrounding whitespace and leading dots, then lowercase.
/// Returns `None` for an empty result.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
