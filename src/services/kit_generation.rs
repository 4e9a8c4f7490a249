use crate::models::{KitNaming, PlacementMode, SampleFile};
use crate::services::kit_assembly::{assemble_kit, KitRequest};
use crate::utils::create_rng;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Configuration for a kit generation run
#[derive(Debug, Clone)]
pub struct KitGenerationConfig {
    pub output_dir: PathBuf,
    pub files_per_kit: usize,
    pub kit_count: usize,
    pub mode: PlacementMode,
    pub naming: KitNaming,
    pub kit_delay: Duration,
    pub seed: Option<u64>,
    pub verify_copies: bool,
}

impl Default for KitGenerationConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            files_per_kit: 10,
            kit_count: 1,
            mode: PlacementMode::Copy,
            naming: KitNaming::Timestamp,
            kit_delay: Duration::from_secs(1),
            seed: None,
            verify_copies: false,
        }
    }
}

impl KitGenerationConfig {
    fn kit_request(&self) -> KitRequest {
        KitRequest {
            output_root: self.output_dir.clone(),
            max_files: self.files_per_kit,
            mode: self.mode,
            naming: self.naming,
            verify_copies: self.verify_copies,
        }
    }
}

/// Outcome of a single kit attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum KitSummary {
    Complete {
        name: String,
        directory: PathBuf,
        files_placed: usize,
    },
    Failed {
        name: Option<String>,
        directory: Option<PathBuf>,
        files_placed: usize,
        error: String,
    },
}

impl KitSummary {
    pub fn is_complete(&self) -> bool {
        matches!(self, KitSummary::Complete { .. })
    }
}

/// Report structure for a generation run
#[derive(Debug, Clone, Serialize)]
pub struct KitGenerationReport {
    pub requested: usize,
    pub kits: Vec<KitSummary>,
}

impl KitGenerationReport {
    pub fn empty(requested: usize) -> Self {
        Self {
            requested,
            kits: Vec::new(),
        }
    }

    pub fn successful(&self) -> usize {
        self.kits.iter().filter(|kit| kit.is_complete()).count()
    }

    pub fn failed(&self) -> usize {
        self.kits.len() - self.successful()
    }

    pub fn success_rate(&self) -> f64 {
        if self.requested == 0 {
            0.0
        } else {
            self.successful() as f64 / self.requested as f64
        }
    }

    /// `<successful>/<requested>`
    pub fn summary_line(&self) -> String {
        format!("{}/{}", self.successful(), self.requested)
    }
}

/// Generate `config.kit_count` kits one after another.
///
/// Each kit runs on the blocking pool and is awaited before the next one
/// starts, with `config.kit_delay` between kits. A failed kit does not stop
/// later attempts.
pub async fn generate_kits(
    files: Arc<Vec<SampleFile>>,
    config: KitGenerationConfig,
) -> Result<KitGenerationReport> {
    info!(
        "Generating {} kit(s) of up to {} files from {} samples",
        config.kit_count,
        config.files_per_kit,
        files.len()
    );

    if files.is_empty() {
        warn!("No audio files found, nothing to generate");
    }

    let request = config.kit_request();
    let mut rng = create_rng(config.seed);
    let mut report = KitGenerationReport::empty(config.kit_count);

    for kit_number in 1..=config.kit_count {
        let files = Arc::clone(&files);
        let request = request.clone();

        let (returned_rng, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = assemble_kit(&files, &request, &mut rng);
            (rng, outcome)
        })
        .await
        .context("Kit assembly task failed")?;
        rng = returned_rng;

        let summary = match outcome {
            Ok(kit) => KitSummary::Complete {
                files_placed: kit.len(),
                name: kit.name,
                directory: kit.directory,
            },
            Err(failure) => {
                error!("Kit {} of {} failed: {}", kit_number, config.kit_count, failure);
                KitSummary::Failed {
                    files_placed: failure.placed.len(),
                    name: failure.kit_name,
                    directory: failure.kit_dir,
                    error: failure.error.to_string(),
                }
            }
        };
        report.kits.push(summary);

        // Kit names only have second resolution
        if kit_number < config.kit_count && !config.kit_delay.is_zero() {
            tokio::time::sleep(config.kit_delay).await;
        }
    }

    info!(
        "Kit generation completed. Success: {}, Failed: {}",
        report.successful(),
        report.failed()
    );

    Ok(report)
}
