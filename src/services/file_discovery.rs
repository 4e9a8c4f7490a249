use crate::models::{ExtensionSet, SampleFile};
use crate::utils::list_files_with_extensions;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Discovery errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Report structure for sample discovery
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    pub root: PathBuf,
    pub files: Vec<SampleFile>,
    pub by_extension: BTreeMap<String, usize>,
    pub skipped_entries: usize,
}

impl DiscoveryReport {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files_discovered(&self) -> usize {
        self.files.len()
    }
}

/// Find every sample under `root` whose extension is in `extensions`.
///
/// An empty result is not an error. Results are in traversal order.
pub fn discover_samples<P: AsRef<Path>>(
    root: P,
    extensions: &ExtensionSet,
) -> Result<DiscoveryReport, DiscoveryError> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(DiscoveryError::PathNotFound(root.to_path_buf()));
    }

    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
    }

    info!("Searching for audio files in: {}", root.display());
    debug!("Extensions: {}", extensions);

    let listing = list_files_with_extensions(root, extensions);
    let files: Vec<SampleFile> = listing
        .files
        .iter()
        .filter_map(SampleFile::from_path)
        .collect();

    let report = DiscoveryReport {
        root: root.to_path_buf(),
        by_extension: count_by_extension(&files),
        files,
        skipped_entries: listing.skipped_entries,
    };

    info!(
        "Discovered {} files ({} unreadable entries skipped)",
        report.files_discovered(),
        report.skipped_entries
    );

    Ok(report)
}

/// Count discovered samples per normalized extension
pub fn count_by_extension(files: &[SampleFile]) -> BTreeMap<String, usize> {
    files.iter().fold(BTreeMap::new(), |mut counts, file| {
        *counts.entry(file.extension.clone()).or_insert(0) += 1;
        counts
    })
}
