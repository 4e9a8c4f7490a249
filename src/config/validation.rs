use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a count entered by the user was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountError {
    #[error("Please enter a number.")]
    Empty,
    #[error("Please enter a valid number.")]
    NotANumber,
    #[error("Please enter a number greater than 0.")]
    Zero,
}

/// Why a source directory was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceDirError {
    #[error("That folder doesn't exist: {0}")]
    NotFound(PathBuf),
    #[error("That path is not a folder: {0}")]
    NotADirectory(PathBuf),
}

/// Strip whitespace and the quotes terminals add on drag and drop
pub fn clean_path_input(input: &str) -> PathBuf {
    PathBuf::from(input.trim().trim_matches(|c: char| c == '\'' || c == '"'))
}

/// Parse a strictly positive count. Blank input yields `default` when given.
pub fn parse_positive_count(input: &str, default: Option<usize>) -> Result<usize, CountError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return default.ok_or(CountError::Empty);
    }

    match trimmed.parse::<usize>() {
        Ok(0) => Err(CountError::Zero),
        Ok(count) => Ok(count),
        // "-3" is a number, just not a usable one
        Err(_) if trimmed.parse::<i64>().is_ok() => Err(CountError::Zero),
        Err(_) => Err(CountError::NotANumber),
    }
}

pub fn validate_source_dir(path: &Path) -> Result<(), SourceDirError> {
    if !path.exists() {
        return Err(SourceDirError::NotFound(path.to_path_buf()));
    }

    if !path.is_dir() {
        return Err(SourceDirError::NotADirectory(path.to_path_buf()));
    }

    Ok(())
}

/// Closest ancestor of `path` that exists on disk and is a directory.
/// A relative path with one component resolves to the current directory.
pub fn nearest_existing_ancestor(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .skip(1)
        .map(|ancestor| {
            if ancestor.as_os_str().is_empty() {
                Path::new(".")
            } else {
                ancestor
            }
        })
        .find(|ancestor| ancestor.is_dir())
        .map(Path::to_path_buf)
}

/// Sorted names of the folders directly inside `directory`
pub fn list_subfolders(directory: &Path) -> std::io::Result<Vec<String>> {
    let mut folders: Vec<String> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    folders.sort();
    Ok(folders)
}
