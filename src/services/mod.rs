pub mod file_discovery;
pub mod kit_assembly;
pub mod kit_generation;

pub use file_discovery::{discover_samples, DiscoveryError, DiscoveryReport};
pub use kit_assembly::{assemble_kit, place_selection, KitError, KitFailure, KitRequest};
pub use kit_generation::{generate_kits, KitGenerationConfig, KitGenerationReport, KitSummary};
