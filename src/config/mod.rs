pub mod prompt;
pub mod validation;

pub use prompt::{NonInteractive, PromptError, Prompter, SettingsSource};
pub use validation::{
    clean_path_input, list_subfolders, nearest_existing_ancestor, parse_positive_count,
    validate_source_dir, CountError, SourceDirError,
};

use crate::models::{ExtensionSet, PlacementMode};
use std::path::PathBuf;

/// Values supplied on the command line or through the environment.
/// Anything left `None` is asked for.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub files_per_kit: Option<usize>,
    pub extensions: Option<ExtensionSet>,
    pub mode: Option<PlacementMode>,
    pub kit_count: Option<usize>,
}

/// Validated settings needed before discovery runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files_per_kit: usize,
    pub extensions: ExtensionSet,
    pub mode: PlacementMode,
}

/// Complete the session settings in the console order: source, output,
/// files per kit, extensions, placement mode.
pub fn gather_session_settings<S>(
    overrides: &ConfigOverrides,
    source: &mut S,
) -> Result<SessionSettings, PromptError>
where
    S: SettingsSource + ?Sized,
{
    let source_dir = match &overrides.source_dir {
        Some(path) => {
            validate_source_dir(path).map_err(|e| PromptError::Invalid {
                field: "source",
                reason: e.to_string(),
            })?;
            path.clone()
        }
        None => source.source_dir()?,
    };

    let output_dir = match &overrides.output_dir {
        Some(path) => path.clone(),
        None => source.output_dir()?,
    };

    let files_per_kit = match overrides.files_per_kit {
        Some(0) => {
            return Err(PromptError::Invalid {
                field: "files per kit",
                reason: CountError::Zero.to_string(),
            })
        }
        Some(count) => count,
        None => source.files_per_kit()?,
    };

    let extensions = match &overrides.extensions {
        Some(extensions) if !extensions.is_empty() => extensions.clone(),
        _ => source.extensions()?,
    };

    let mode = match overrides.mode {
        Some(mode) => mode,
        None => source.placement_mode()?,
    };

    Ok(SessionSettings {
        source_dir,
        output_dir,
        files_per_kit,
        extensions,
        mode,
    })
}

/// Number of kits, asked once discovery knows how many files exist
pub fn resolve_kit_count<S>(
    overrides: &ConfigOverrides,
    source: &mut S,
    files_found: usize,
) -> Result<usize, PromptError>
where
    S: SettingsSource + ?Sized,
{
    match overrides.kit_count {
        Some(0) => Err(PromptError::Invalid {
            field: "kit count",
            reason: CountError::Zero.to_string(),
        }),
        Some(count) => Ok(count),
        None => source.kit_count(files_found),
    }
}
