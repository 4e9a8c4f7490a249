use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use drumkit_generator::config::{gather_session_settings, parse_positive_count, resolve_kit_count};
use drumkit_generator::utils::ensure_directory;
use drumkit_generator::{
    discover_samples, generate_kits, AppConfig, ConfigOverrides, DiscoveryReport, ExtensionSet,
    KitGenerationReport, KitNaming, KitSummary, NonInteractive, PlacementMode, Prompter,
    SettingsSource,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env first so env-backed arguments can see it
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Parse command line arguments
    let matches = Command::new("Drum Kit Generator")
        .version("0.1.0")
        .about("Builds randomized drum kits from a sample library")
        .arg(
            Arg::new("source")
                .long("source")
                .value_name("DIR")
                .env("DRUMKIT_SOURCE")
                .help("Sample library folder to search"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("DIR")
                .env("DRUMKIT_OUTPUT")
                .help("Folder where drum kits are created"),
        )
        .arg(
            Arg::new("files-per-kit")
                .long("files-per-kit")
                .value_name("COUNT")
                .env("DRUMKIT_FILES_PER_KIT")
                .help("Maximum number of files per kit"),
        )
        .arg(
            Arg::new("extensions")
                .long("extensions")
                .value_name("LIST")
                .env("DRUMKIT_EXTENSIONS")
                .help("Extensions to include, e.g. \"wav aif mp3\""),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .value_name("MODE")
                .env("DRUMKIT_MODE")
                .help("Placement mode: copy or symlink"),
        )
        .arg(
            Arg::new("kits")
                .long("kits")
                .value_name("COUNT")
                .env("DRUMKIT_KITS")
                .help("Number of kits to generate"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .env("DRUMKIT_SEED")
                .help("Seed for reproducible sampling"),
        )
        .arg(
            Arg::new("kit-delay-ms")
                .long("kit-delay-ms")
                .value_name("MS")
                .help("Pause between kits in milliseconds")
                .default_value("1000"),
        )
        .arg(
            Arg::new("unique-names")
                .long("unique-names")
                .help("Append a random suffix to kit folder names")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .help("Hash-check every copied file against its source")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("non-interactive")
                .long("non-interactive")
                .help("Fail instead of prompting for missing values")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the run report as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .get_matches();

    // Initialize configuration from command line arguments
    let config = create_app_config(&matches)?;

    // Initialize logging
    initialize_logging(&config.log_level)?;

    if !dotenv_loaded {
        info!("No .env file found, using system environment variables");
    }

    // Run the application
    run_application(config).await
}

/// Build application configuration from CLI arguments
fn create_app_config(matches: &ArgMatches) -> Result<AppConfig> {
    let string_arg = |name: &str| matches.get_one::<String>(name).cloned();

    let count_arg = |name: &str| -> Result<Option<usize>> {
        string_arg(name)
            .map(|value| {
                parse_positive_count(&value, None)
                    .map_err(|e| anyhow::anyhow!("Invalid {} value {:?}: {}", name, value, e))
            })
            .transpose()
    };

    let mode = string_arg("mode")
        .map(|value| value.parse::<PlacementMode>().map_err(anyhow::Error::msg))
        .transpose()?;

    let seed = string_arg("seed")
        .map(|value| value.trim().parse::<u64>())
        .transpose()
        .map_err(|_| anyhow::anyhow!("Invalid seed value"))?;

    let kit_delay_ms: u64 = string_arg("kit-delay-ms")
        .unwrap_or_else(|| "1000".to_string())
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid kit-delay-ms value"))?;

    let overrides = ConfigOverrides {
        source_dir: string_arg("source").map(PathBuf::from),
        output_dir: string_arg("output").map(PathBuf::from),
        files_per_kit: count_arg("files-per-kit")?,
        extensions: string_arg("extensions").map(|list| ExtensionSet::parse(&list)),
        mode,
        kit_count: count_arg("kits")?,
    };

    let naming = if matches.get_flag("unique-names") {
        KitNaming::TimestampWithSuffix
    } else {
        KitNaming::Timestamp
    };

    Ok(AppConfig {
        overrides,
        naming,
        kit_delay: Duration::from_millis(kit_delay_ms),
        seed,
        verify_copies: matches.get_flag("verify"),
        non_interactive: matches.get_flag("non-interactive"),
        json_report: matches.get_flag("json"),
        log_level: string_arg("log-level").unwrap_or_else(|| "info".to_string()),
    })
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout carries only the console session and report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// Main application logic
async fn run_application(config: AppConfig) -> Result<()> {
    info!("Starting drum kit generator");

    let mut settings_source: Box<dyn SettingsSource> = if config.non_interactive {
        Box::new(NonInteractive)
    } else {
        print_banner();
        Box::new(Prompter::stdio())
    };

    let session = gather_session_settings(&config.overrides, settings_source.as_mut())?;

    if !session.output_dir.exists() {
        info!("Creating output directory: {}", session.output_dir.display());
    }
    ensure_directory(&session.output_dir)?;

    info!("Looking for files with extensions: {}", session.extensions);

    let discovery = {
        let root = session.source_dir.clone();
        let extensions = session.extensions.clone();
        tokio::task::spawn_blocking(move || discover_samples(&root, &extensions))
            .await
            .context("Discovery task failed")??
    };

    if discovery.is_empty() {
        warn!("No audio files found!");
        warn!("Searched for: {}", session.extensions);
        warn!("Make sure your sample library contains files with these extensions.");
        return Ok(());
    }
    print_discovery_report(&discovery);

    let kit_count = resolve_kit_count(
        &config.overrides,
        settings_source.as_mut(),
        discovery.files_discovered(),
    )?;

    let generation_config = config.generation_config(&session, kit_count);
    let report = generate_kits(Arc::new(discovery.files), generation_config).await?;
    print_generation_report(&report);

    if config.json_report {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!(
            "Generated {} drum kits successfully!",
            report.summary_line()
        );
    }

    info!("Done");
    Ok(())
}

fn print_banner() {
    println!("{}", "=".repeat(60));
    println!("          Randomized Drum Kit Generator");
    println!("{}", "=".repeat(60));
    println!();
}

/// Print sample discovery report
fn print_discovery_report(report: &DiscoveryReport) {
    info!("=== DISCOVERY REPORT ===");
    info!("Files discovered: {}", report.files_discovered());
    for (extension, count) in &report.by_extension {
        info!("  .{}: {}", extension, count);
    }
    if report.skipped_entries > 0 {
        warn!("Unreadable entries skipped: {}", report.skipped_entries);
    }
}

/// Print kit generation report
fn print_generation_report(report: &KitGenerationReport) {
    info!("=== KIT GENERATION REPORT ===");
    info!("Kits requested: {}", report.requested);
    info!("Kits created: {}", report.successful());
    info!("Success rate: {:.2}%", report.success_rate() * 100.0);

    for kit in &report.kits {
        match kit {
            KitSummary::Complete {
                name,
                files_placed,
                ..
            } => info!("  {} ({} files)", name, files_placed),
            KitSummary::Failed {
                name,
                files_placed,
                error: reason,
                ..
            } => error!(
                "  {} failed after {} files: {}",
                name.as_deref().unwrap_or("<not created>"),
                files_placed,
                reason
            ),
        }
    }
}
