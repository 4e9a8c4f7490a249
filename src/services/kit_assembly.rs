use crate::models::{Kit, KitNaming, PlacedEntry, PlacementMode, SampleFile};
use crate::utils::{copy_file_preserving, create_symlink, same_contents, sample_without_replacement};
use chrono::Local;
use rand::Rng;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Parameters for assembling one kit
#[derive(Debug, Clone)]
pub struct KitRequest {
    pub output_root: PathBuf,
    pub max_files: usize,
    pub mode: PlacementMode,
    pub naming: KitNaming,
    pub verify_copies: bool,
}

impl KitRequest {
    pub fn new<P: AsRef<Path>>(output_root: P, max_files: usize, mode: PlacementMode) -> Self {
        Self {
            output_root: output_root.as_ref().to_path_buf(),
            max_files,
            mode,
            naming: KitNaming::default(),
            verify_copies: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum KitError {
    #[error("No audio files found")]
    NoFiles,

    #[error("Files per kit must be greater than 0")]
    ZeroFilesPerKit,

    #[error("Failed to create kit directory {path:?}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error {action} {file_name} (file {index}): {source}")]
    Placement {
        index: usize,
        file_name: String,
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy of {file_name} (file {index}) does not match its source")]
    VerificationFailed { index: usize, file_name: String },

    #[error("Could not verify copy of {file_name} (file {index}): {reason}")]
    VerificationError {
        index: usize,
        file_name: String,
        reason: String,
    },
}

/// A kit that did not complete. Entries placed before the failure stay on disk.
#[derive(Debug)]
pub struct KitFailure {
    pub kit_name: Option<String>,
    pub kit_dir: Option<PathBuf>,
    pub placed: Vec<PlacedEntry>,
    pub error: KitError,
}

impl KitFailure {
    fn before_creation(error: KitError) -> Self {
        Self {
            kit_name: None,
            kit_dir: None,
            placed: Vec::new(),
            error,
        }
    }
}

impl fmt::Display for KitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kit_dir {
            Some(dir) => write!(
                f,
                "{} ({} files left in {})",
                self.error,
                self.placed.len(),
                dir.display()
            ),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for KitFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Assemble one kit from `files`.
///
/// Draws `min(files.len(), request.max_files)` distinct samples, creates a
/// freshly named directory under `request.output_root` and places
/// `<NN>_<name>` entries in draw order. The first placement error aborts the
/// kit; files already placed are left in place and no rollback happens.
/// With no files at all, or a `max_files` of 0, nothing is touched on disk.
pub fn assemble_kit<R>(
    files: &[SampleFile],
    request: &KitRequest,
    rng: &mut R,
) -> Result<Kit, KitFailure>
where
    R: Rng + ?Sized,
{
    if files.is_empty() {
        return Err(KitFailure::before_creation(KitError::NoFiles));
    }

    if request.max_files == 0 {
        return Err(KitFailure::before_creation(KitError::ZeroFilesPerKit));
    }

    let selected = sample_without_replacement(files, request.max_files, rng);

    let created_at = Local::now();
    let name = request.naming.kit_name(created_at);
    let kit_dir = request.output_root.join(&name);

    std::fs::create_dir_all(&kit_dir).map_err(|source| {
        KitFailure::before_creation(KitError::CreateDirectory {
            path: kit_dir.clone(),
            source,
        })
    })?;

    info!("Creating drum kit: {}", name);
    info!("{} {} files...", request.mode.action(), selected.len());

    match place_selection(&kit_dir, &selected, request.mode, request.verify_copies) {
        Ok(entries) => {
            info!("Drum kit created successfully at {}", kit_dir.display());
            Ok(Kit {
                name,
                directory: kit_dir,
                created_at,
                mode: request.mode,
                entries,
            })
        }
        Err((placed, error)) => {
            error!("{}", error);
            Err(KitFailure {
                kit_name: Some(name),
                kit_dir: Some(kit_dir),
                placed,
                error,
            })
        }
    }
}

/// Place `selected` into `kit_dir` as `<NN>_<name>`, numbered from 1 in order.
///
/// Stops at the first failure and hands back what was placed so far.
pub fn place_selection(
    kit_dir: &Path,
    selected: &[&SampleFile],
    mode: PlacementMode,
    verify_copies: bool,
) -> Result<Vec<PlacedEntry>, (Vec<PlacedEntry>, KitError)> {
    let mut placed = Vec::with_capacity(selected.len());

    for (offset, sample) in selected.iter().enumerate() {
        let index = offset + 1;
        let destination = kit_dir.join(sample.placed_name(index));

        if let Err(error) = place_file(index, sample, &destination, mode, verify_copies) {
            return Err((placed, error));
        }

        info!("  {:2}. {}", index, sample.display_name());
        placed.push(PlacedEntry {
            index,
            source: sample.path.clone(),
            destination,
        });
    }

    Ok(placed)
}

fn place_file(
    index: usize,
    sample: &SampleFile,
    destination: &Path,
    mode: PlacementMode,
    verify_copies: bool,
) -> Result<(), KitError> {
    let placement_error = |action: &'static str| {
        move |source: std::io::Error| KitError::Placement {
            index,
            file_name: sample.display_name(),
            action,
            source,
        }
    };

    match mode {
        PlacementMode::Copy => {
            copy_file_preserving(&sample.path, destination).map_err(placement_error("copying"))?;

            if verify_copies {
                verify_copy(index, sample, destination)?;
            }
        }
        PlacementMode::Symlink => {
            create_symlink(&sample.path, destination).map_err(placement_error("linking"))?;
        }
    }

    Ok(())
}

fn verify_copy(index: usize, sample: &SampleFile, destination: &Path) -> Result<(), KitError> {
    match same_contents(&sample.path, destination) {
        Ok(true) => Ok(()),
        Ok(false) => Err(KitError::VerificationFailed {
            index,
            file_name: sample.display_name(),
        }),
        Err(e) => Err(KitError::VerificationError {
            index,
            file_name: sample.display_name(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::create_rng;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn write_samples(dir: &Path, names: &[&str]) -> Vec<SampleFile> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                fs::write(&path, format!("audio data for {name}")).unwrap();
                SampleFile::from_path(path).unwrap()
            })
            .collect()
    }

    fn entry_names(kit_dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(kit_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn has_index_prefix(name: &str) -> bool {
        let bytes = name.as_bytes();
        bytes.len() > 3
            && bytes[0].is_ascii_digit()
            && bytes[1].is_ascii_digit()
            && bytes[2] == b'_'
    }

    #[test]
    fn test_small_library_places_everything() {
        let library = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["kick.wav", "snare.wav", "hat.wav"]);

        let request = KitRequest::new(output.path(), 10, PlacementMode::Copy);
        let kit = assemble_kit(&files, &request, &mut create_rng(Some(1))).unwrap();

        assert_eq!(kit.len(), 3);
        assert!(kit.name.starts_with("DrumKit_"));
        assert_eq!(kit.directory, output.path().join(&kit.name));

        let names = entry_names(&kit.directory);
        assert_eq!(names.len(), 3);
        for (position, name) in names.iter().enumerate() {
            assert!(has_index_prefix(name), "bad entry name {name}");
            assert!(name.starts_with(&format!("{:02}_", position + 1)));
        }

        let sources: HashSet<&PathBuf> = kit.entries.iter().map(|entry| &entry.source).collect();
        assert_eq!(sources.len(), 3);
    }

    #[test]
    fn test_selection_is_capped_and_indices_are_contiguous() {
        let library = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let names: Vec<String> = (0..20).map(|i| format!("one_shot_{i}.wav")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let files = write_samples(library.path(), &name_refs);

        let request = KitRequest::new(output.path(), 5, PlacementMode::Copy);
        let kit = assemble_kit(&files, &request, &mut create_rng(Some(9))).unwrap();

        let indices: Vec<usize> = kit.entries.iter().map(|entry| entry.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);

        let sources: HashSet<&PathBuf> = kit.entries.iter().map(|entry| &entry.source).collect();
        assert_eq!(sources.len(), 5);

        for entry in &kit.entries {
            let expected = format!(
                "{:02}_{}",
                entry.index,
                entry.source.file_name().unwrap().to_string_lossy()
            );
            assert_eq!(entry.destination, kit.directory.join(expected));
        }
    }

    #[test]
    fn test_copy_preserves_bytes() {
        let library = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["crash.aif", "ride.aif"]);

        let mut request = KitRequest::new(output.path(), 2, PlacementMode::Copy);
        request.verify_copies = true;
        let kit = assemble_kit(&files, &request, &mut create_rng(Some(5))).unwrap();

        for entry in &kit.entries {
            assert_eq!(
                fs::read(&entry.destination).unwrap(),
                fs::read(&entry.source).unwrap()
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_resolve_to_sources() {
        let library = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["conga.wav", "bongo.wav"]);

        let request = KitRequest::new(output.path(), 2, PlacementMode::Symlink);
        let kit = assemble_kit(&files, &request, &mut create_rng(Some(5))).unwrap();

        for entry in &kit.entries {
            let metadata = fs::symlink_metadata(&entry.destination).unwrap();
            assert!(metadata.file_type().is_symlink());
            assert_eq!(
                fs::canonicalize(&entry.destination).unwrap(),
                fs::canonicalize(&entry.source).unwrap()
            );
        }
    }

    #[test]
    fn test_no_files_touches_nothing() {
        let output = TempDir::new().unwrap();
        let request = KitRequest::new(output.path(), 10, PlacementMode::Copy);

        let failure = assemble_kit(&[], &request, &mut create_rng(Some(1))).unwrap_err();

        assert!(matches!(failure.error, KitError::NoFiles));
        assert!(failure.kit_dir.is_none());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_zero_files_per_kit_touches_nothing() {
        let library = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["kick.wav"]);
        let request = KitRequest::new(output.path(), 0, PlacementMode::Copy);

        let failure = assemble_kit(&files, &request, &mut create_rng(Some(1))).unwrap_err();

        assert!(matches!(failure.error, KitError::ZeroFilesPerKit));
        assert!(failure.kit_dir.is_none());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_output_root_that_is_a_file_fails_before_placing() {
        let library = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["kick.wav"]);
        let not_a_dir = scratch.path().join("kits.txt");
        fs::write(&not_a_dir, b"not a folder").unwrap();

        let request = KitRequest::new(&not_a_dir, 4, PlacementMode::Copy);
        let failure = assemble_kit(&files, &request, &mut create_rng(Some(1))).unwrap_err();

        assert!(matches!(failure.error, KitError::CreateDirectory { .. }));
        assert!(failure.placed.is_empty());
        assert!(failure.kit_dir.is_none());
    }

    #[test]
    fn test_verify_detects_mismatched_copy() {
        let library = TempDir::new().unwrap();
        let kit_dir = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["snare.wav"]);
        let destination = kit_dir.path().join("03_snare.wav");
        fs::write(&destination, b"truncated").unwrap();

        let error = verify_copy(3, &files[0], &destination).unwrap_err();
        assert!(matches!(error, KitError::VerificationFailed { index: 3, .. }));
    }

    #[test]
    fn test_verify_reports_unreadable_copy() {
        let library = TempDir::new().unwrap();
        let kit_dir = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["snare.wav"]);
        let missing = kit_dir.path().join("01_snare.wav");

        let error = verify_copy(1, &files[0], &missing).unwrap_err();
        assert!(matches!(error, KitError::VerificationError { index: 1, .. }));
    }

    #[test]
    fn test_failure_keeps_already_placed_files() {
        let library = TempDir::new().unwrap();
        let kit_dir = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["first.wav", "third.wav"]);
        let missing = SampleFile::from_path(library.path().join("second.wav")).unwrap();

        let selected = vec![&files[0], &missing, &files[1]];
        let (placed, error) =
            place_selection(kit_dir.path(), &selected, PlacementMode::Copy, false).unwrap_err();

        assert_eq!(placed.len(), 1);
        assert!(matches!(error, KitError::Placement { index: 2, .. }));
        assert_eq!(entry_names(kit_dir.path()), vec!["01_first.wav"]);
    }

    #[test]
    fn test_failed_kit_reports_partial_directory() {
        let library = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let mut files = write_samples(library.path(), &["present.wav"]);
        files.push(SampleFile::from_path(library.path().join("vanished.wav")).unwrap());

        let request = KitRequest::new(output.path(), 2, PlacementMode::Copy);
        let failure = assemble_kit(&files, &request, &mut create_rng(Some(11))).unwrap_err();

        let kit_dir = failure.kit_dir.clone().unwrap();
        assert!(kit_dir.is_dir());
        assert!(failure.placed.len() < 2);
        assert_eq!(entry_names(&kit_dir).len(), failure.placed.len());
        assert!(failure.to_string().contains("vanished.wav"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_collision_fails_the_kit() {
        let library = TempDir::new().unwrap();
        let kit_dir = TempDir::new().unwrap();
        let files = write_samples(library.path(), &["tom.wav"]);
        fs::write(kit_dir.path().join("01_tom.wav"), b"already here").unwrap();

        let selected = vec![&files[0]];
        let (placed, error) =
            place_selection(kit_dir.path(), &selected, PlacementMode::Symlink, false).unwrap_err();

        assert!(placed.is_empty());
        assert!(matches!(error, KitError::Placement { action: "linking", .. }));
    }
}
