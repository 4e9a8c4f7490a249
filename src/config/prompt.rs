use crate::config::validation::{
    clean_path_input, list_subfolders, nearest_existing_ancestor, parse_positive_count,
    validate_source_dir, SourceDirError,
};
use crate::models::{ExtensionSet, PlacementMode, DEFAULT_EXTENSIONS};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Input ended before a value for {0} was given")]
    EndOfInput(&'static str),

    #[error("No value for {0} and prompting is disabled")]
    Missing(&'static str),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Where session settings come from when they were not given up front
pub trait SettingsSource {
    fn source_dir(&mut self) -> Result<PathBuf, PromptError>;
    fn output_dir(&mut self) -> Result<PathBuf, PromptError>;
    fn files_per_kit(&mut self) -> Result<usize, PromptError>;
    fn extensions(&mut self) -> Result<ExtensionSet, PromptError>;
    fn placement_mode(&mut self) -> Result<PlacementMode, PromptError>;
    fn kit_count(&mut self, files_found: usize) -> Result<usize, PromptError>;
}

/// Interactive console session over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a line of console text
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }

    fn ask(&mut self, question: &str, field: &'static str) -> Result<String, PromptError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::EndOfInput(field));
        }

        Ok(line.trim().to_string())
    }

    fn ask_count(
        &mut self,
        question: &str,
        field: &'static str,
        default: Option<usize>,
    ) -> Result<usize, PromptError> {
        loop {
            let answer = self.ask(question, field)?;
            match parse_positive_count(&answer, default) {
                Ok(count) => return Ok(count),
                Err(e) => self.say(&e.to_string())?,
            }
        }
    }

    fn suggest_folders(&mut self, requested: &Path) -> io::Result<()> {
        let Some(ancestor) = nearest_existing_ancestor(requested) else {
            return Ok(());
        };

        self.say(&format!("Hint: Nearest existing folder: {}", ancestor.display()))?;
        match list_subfolders(&ancestor) {
            Ok(folders) => {
                self.say("Available folders in that directory:")?;
                for folder in folders {
                    self.say(&format!("  - {}", folder))?;
                }
            }
            Err(e) => self.say(&format!("  Could not list directory: {}", e))?,
        }
        self.say("Maybe try one of these paths, or check the folder name spelling.")
    }
}

impl<R: BufRead, W: Write> SettingsSource for Prompter<R, W> {
    fn source_dir(&mut self) -> Result<PathBuf, PromptError> {
        loop {
            let answer = self.ask("Enter the path to your sample library folder: ", "source")?;
            let path = clean_path_input(&answer);

            match validate_source_dir(&path) {
                Ok(()) => return Ok(path),
                Err(SourceDirError::NotFound(_)) => {
                    self.say("That folder doesn't exist. Please try again.")?;
                    self.suggest_folders(&path)?;
                }
                Err(e) => self.say(&format!("{}. Please try again.", e))?,
            }
        }
    }

    fn output_dir(&mut self) -> Result<PathBuf, PromptError> {
        loop {
            let answer = self.ask("Enter the output folder (where to save drum kits): ", "output")?;
            let path = clean_path_input(&answer);

            if !path.as_os_str().is_empty() {
                return Ok(path);
            }
            self.say("Please enter a folder path.")?;
        }
    }

    fn files_per_kit(&mut self) -> Result<usize, PromptError> {
        self.ask_count("How many files per drum kit? (e.g., 10): ", "files per kit", None)
    }

    fn extensions(&mut self) -> Result<ExtensionSet, PromptError> {
        self.say("Which audio file types to include?")?;
        self.say(&format!("Default: {}", DEFAULT_EXTENSIONS.join(", ")))?;
        let answer = self.ask(
            "Press Enter for default, or type extensions (e.g., wav mp3 aif): ",
            "extensions",
        )?;

        Ok(ExtensionSet::parse(&answer))
    }

    fn placement_mode(&mut self) -> Result<PlacementMode, PromptError> {
        self.say("File handling options:")?;
        self.say("1. Copy files (duplicates files, uses more disk space)")?;
        self.say("2. Create symbolic links (points to originals, saves disk space)")?;

        loop {
            let answer = self.ask("Choose option (1 or 2): ", "placement mode")?;
            match answer.parse::<PlacementMode>() {
                Ok(mode) => return Ok(mode),
                Err(_) => self.say("Please enter 1 or 2.")?,
            }
        }
    }

    fn kit_count(&mut self, files_found: usize) -> Result<usize, PromptError> {
        self.say(&format!("Found {} audio files", files_found))?;
        self.ask_count("How many drum kits to generate? (1): ", "kit count", Some(1))
    }
}

/// Settings source for unattended runs: required values are errors, the
/// rest fall back to the interactive defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive;

impl SettingsSource for NonInteractive {
    fn source_dir(&mut self) -> Result<PathBuf, PromptError> {
        Err(PromptError::Missing("source"))
    }

    fn output_dir(&mut self) -> Result<PathBuf, PromptError> {
        Err(PromptError::Missing("output"))
    }

    fn files_per_kit(&mut self) -> Result<usize, PromptError> {
        Err(PromptError::Missing("files per kit"))
    }

    fn extensions(&mut self) -> Result<ExtensionSet, PromptError> {
        Ok(ExtensionSet::default())
    }

    fn placement_mode(&mut self) -> Result<PlacementMode, PromptError> {
        Ok(PlacementMode::Copy)
    }

    fn kit_count(&mut self, _files_found: usize) -> Result<usize, PromptError> {
        Ok(1)
    }
}
