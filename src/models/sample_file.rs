use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::extension_set::normalize_extension;

/// A discovered source file - immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleFile {
    pub path: PathBuf,
    pub extension: String,
}

impl SampleFile {
    /// Build a sample from a path that has both a file name and an extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        path.file_name()?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(normalize_extension)?;

        Some(Self {
            path: path.to_path_buf(),
            extension,
        })
    }

    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }

    /// Lossy file name for display and logging
    pub fn display_name(&self) -> String {
        self.file_name().to_string_lossy().into_owned()
    }

    /// Name of the entry inside a kit: `<NN>_<original file name>`
    pub fn placed_name(&self, index: usize) -> OsString {
        let mut name = OsString::from(format!("{:02}_", index));
        name.push(self.file_name());
        name
    }
}
