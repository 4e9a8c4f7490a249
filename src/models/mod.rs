pub mod extension_set;
pub mod kit;
pub mod sample_file;

pub use extension_set::{ExtensionSet, DEFAULT_EXTENSIONS};
pub use kit::{Kit, KitNaming, PlacedEntry, PlacementMode, KIT_NAME_PREFIX};
pub use sample_file::SampleFile;
