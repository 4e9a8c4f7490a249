pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use std::time::Duration;

// Re-export commonly used types
pub use config::{ConfigOverrides, NonInteractive, PromptError, Prompter, SessionSettings, SettingsSource};
pub use models::{ExtensionSet, Kit, KitNaming, PlacedEntry, PlacementMode, SampleFile};
pub use services::{
    assemble_kit, discover_samples, generate_kits, DiscoveryError, DiscoveryReport, KitError,
    KitFailure, KitGenerationConfig, KitGenerationReport, KitRequest, KitSummary,
};

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub overrides: ConfigOverrides,
    pub naming: KitNaming,
    pub kit_delay: Duration,
    pub seed: Option<u64>,
    pub verify_copies: bool,
    pub non_interactive: bool,
    pub json_report: bool,
    pub log_level: String,
}

impl AppConfig {
    /// Combine the run-wide options with the gathered session settings
    pub fn generation_config(&self, session: &SessionSettings, kit_count: usize) -> KitGenerationConfig {
        KitGenerationConfig {
            output_dir: session.output_dir.clone(),
            files_per_kit: session.files_per_kit,
            kit_count,
            mode: session.mode,
            naming: self.naming,
            kit_delay: self.kit_delay,
            seed: self.seed,
            verify_copies: self.verify_copies,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            overrides: ConfigOverrides::default(),
            naming: KitNaming::default(),
            kit_delay: Duration::from_secs(1),
            seed: None,
            verify_copies: false,
            non_interactive: false,
            json_report: false,
            log_level: "info".to_string(),
        }
    }
}
