use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File, FileTimes};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::models::ExtensionSet;

/// Files found by a recursive walk plus the number of unreadable entries
#[derive(Debug, Clone, Default)]
pub struct FileListing {
    pub files: Vec<PathBuf>,
    pub skipped_entries: usize,
}

/// Recursively list files under `directory` whose extension is in `extensions`.
///
/// Directory symlinks are not descended. Symlinks to regular files are listed.
/// Unreadable entries are skipped and counted, they never abort the walk.
pub fn list_files_with_extensions<P: AsRef<Path>>(
    directory: P,
    extensions: &ExtensionSet,
) -> FileListing {
    let mut listing = FileListing::default();

    for entry in WalkDir::new(directory.as_ref()) {
        match entry {
            Ok(entry) => {
                let is_file = entry.file_type().is_file()
                    || (entry.path_is_symlink() && entry.path().is_file());

                if is_file && matches_extensions(entry.path(), extensions) {
                    listing.files.push(entry.into_path());
                }
            }
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
                listing.skipped_entries += 1;
            }
        }
    }

    listing
}

/// Check if file matches any of the given extensions
fn matches_extensions(path: &Path, extensions: &ExtensionSet) -> bool {
    extensions.matches_path(path)
}

/// Create `directory` and its parents; succeeds if it already exists
pub fn ensure_directory<P: AsRef<Path>>(directory: P) -> Result<()> {
    let path = directory.as_ref();
    fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))
}

/// Copy a file and carry over permissions and timestamps.
///
/// An existing destination is overwritten. Timestamps are best effort:
/// platforms that refuse them still get the copied bytes.
pub fn copy_file_preserving<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
) -> std::io::Result<u64> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();

    // fs::copy also copies the permission bits
    let bytes = fs::copy(src_path, dest_path)?;

    if let Err(e) = copy_timestamps(src_path, dest_path) {
        tracing::debug!("Could not preserve timestamps on {:?}: {}", dest_path, e);
    }

    Ok(bytes)
}

fn copy_timestamps(source: &Path, destination: &Path) -> std::io::Result<()> {
    let metadata = fs::metadata(source)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    File::open(destination)?.set_times(times)
}

/// Create a symbolic link at `link` pointing to the absolute path of `target`
pub fn create_symlink<P: AsRef<Path>, Q: AsRef<Path>>(target: P, link: Q) -> std::io::Result<()> {
    let target = std::path::absolute(target.as_ref())?;

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&target, link.as_ref())
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_file(&target, link.as_ref())
    }
}

/// SHA-256 of a file's contents as lowercase hex
pub fn hash_file<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let mut file = File::open(file_path.as_ref())
        .with_context(|| format!("Failed to open file: {:?}", file_path.as_ref()))?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 128 * 1024]; // 128KB buffer

    loop {
        let bytes_read = file.read(&mut buffer).context("Failed to read from file")?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare two files by content hash
pub fn same_contents<P: AsRef<Path>, Q: AsRef<Path>>(left: P, right: Q) -> Result<bool> {
    Ok(hash_file(left)? == hash_file(right)?)
}
