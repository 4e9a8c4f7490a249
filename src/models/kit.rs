use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

pub const KIT_NAME_PREFIX: &str = "DrumKit";

/// How a selected sample is materialized inside a kit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    Copy,
    Symlink,
}

impl PlacementMode {
    /// Verb used in progress messages
    pub fn action(&self) -> &'static str {
        match self {
            PlacementMode::Copy => "Copying",
            PlacementMode::Symlink => "Creating symlinks to",
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementMode::Copy => write!(f, "copy"),
            PlacementMode::Symlink => write!(f, "symlink"),
        }
    }
}

impl FromStr for PlacementMode {
    type Err = String;

    /// Accepts the menu numbers as well as the mode names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "copy" => Ok(PlacementMode::Copy),
            "2" | "symlink" | "link" => Ok(PlacementMode::Symlink),
            other => Err(format!("unknown placement mode: {other:?}")),
        }
    }
}

/// Strategy for naming kit directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KitNaming {
    /// `DrumKit_YYYYMMDD_HHMMSS`; two kits in the same second share a name
    #[default]
    Timestamp,
    /// Timestamp followed by 8 random hex characters
    TimestampWithSuffix,
}

impl KitNaming {
    pub fn kit_name(&self, now: DateTime<Local>) -> String {
        let base = format!("{}_{}", KIT_NAME_PREFIX, now.format("%Y%m%d_%H%M%S"));
        match self {
            KitNaming::Timestamp => base,
            KitNaming::TimestampWithSuffix => {
                let suffix = Uuid::new_v4().simple().to_string();
                format!("{}_{}", base, &suffix[..8])
            }
        }
    }
}

/// One file placed into a kit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedEntry {
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// A fully assembled kit directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kit {
    pub name: String,
    pub directory: PathBuf,
    pub created_at: DateTime<Local>,
    pub mode: PlacementMode,
    pub entries: Vec<PlacedEntry>,
}

impl Kit {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
