//! Command implementation for the radiology extractor CLI
//!
//! This module contains the main run logic, progress reporting and the
//! final run summary.

use crate::app::services::aggregator::Aggregator;
use crate::app::services::input_loader::{InputLoader, ParsedInputs};
use crate::app::services::output_writer::write_output;
use crate::cli::args::{Args, ReportFormat};
use crate::cli::input::InputPaths;
use crate::config::ExtractorConfig;
use crate::{Error, Result};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Run statistics for reporting
#[derive(Debug, Clone, Default)]
pub struct ExtractionStats {
    /// Distinct accession numbers in the imaging feed
    pub imaging_keys: usize,
    /// Imaging studies parsed
    pub imaging_studies: usize,
    /// Distinct patients in the opinion feed
    pub opinion_keys: usize,
    /// Opinion reports parsed
    pub opinion_reports: usize,
    /// Distinct patients in the pathology feed
    pub pathology_keys: usize,
    /// Pathology messages committed
    pub pathology_reports: usize,
    /// Records written to the output file
    pub records_written: usize,
    /// Size of the output file in bytes
    pub output_bytes: u64,
    pub output_path: PathBuf,
    /// Total processing time
    pub processing_time: Duration,
}

impl ExtractionStats {
    fn record_inputs(&mut self, inputs: &ParsedInputs) {
        self.imaging_keys = inputs.imaging_studies.key_count();
        self.imaging_studies = inputs.imaging_studies.record_count();
        self.opinion_keys = inputs.radiologist_reports.key_count();
        self.opinion_reports = inputs.radiologist_reports.record_count();
        self.pathology_keys = inputs.pathology_reports.key_count();
        self.pathology_reports = inputs.pathology_reports.record_count();
    }
}

/// Main command runner
///
/// This function orchestrates the whole run:
/// 1. Set up logging and configuration
/// 2. Validate the input paths
/// 3. Parse the three feeds
/// 4. Aggregate and write the output file
/// 5. Print the run summary
pub async fn run(args: Args) -> Result<ExtractionStats> {
    let start_time = Instant::now();

    setup_logging(&args);

    info!("Start processing input files");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let paths = args.input_paths();
    paths.validate()?;

    let progress = create_spinner(&args);
    let mut stats = ExtractionStats {
        output_path: config.output_path.clone(),
        ..Default::default()
    };

    let outcome = extract(&paths, &config, progress.as_ref(), &mut stats).await;
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    outcome?;

    stats.processing_time = start_time.elapsed();
    info!("Finished processing input files");

    generate_final_report(&args, &stats)?;
    Ok(stats)
}

/// Parse, aggregate and write, recording counts in `stats`
async fn extract(
    paths: &InputPaths,
    config: &ExtractorConfig,
    progress: Option<&ProgressBar>,
    stats: &mut ExtractionStats,
) -> Result<()> {
    set_phase(progress, "Parsing inputs...");
    let inputs = InputLoader::load(paths, config).await?;
    stats.record_inputs(&inputs);

    set_phase(progress, "Aggregating records...");
    let records = Aggregator::from_config(config).aggregate(
        &inputs.radiologist_reports,
        &inputs.imaging_studies,
        &inputs.pathology_reports,
    )?;
    stats.records_written = records.len();

    set_phase(progress, "Writing output...");
    stats.output_bytes = write_output(&records, &config.output_path, config.pretty_output)?;
    Ok(())
}

/// Set up structured logging based on CLI arguments
///
/// A subscriber installed earlier in the process is kept.
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("radiology_extractor={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    match result {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing log subscriber: {}", e),
    }
}

/// Defaults, then environment, then command-line flags
fn load_configuration(args: &Args) -> Result<ExtractorConfig> {
    let config = args.apply_to(ExtractorConfig::from_env()?);
    config.validate()?;
    Ok(config)
}

fn create_spinner(args: &Args) -> Option<ProgressBar> {
    if !args.show_progress() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn set_phase(progress: Option<&ProgressBar>, message: &'static str) {
    if let Some(pb) = progress {
        pb.set_message(message);
    }
}

/// Generate final report
fn generate_final_report(args: &Args, stats: &ExtractionStats) -> Result<()> {
    if args.quiet {
        return Ok(());
    }

    match args.report_format {
        ReportFormat::Human => {
            generate_human_report(stats);
            Ok(())
        }
        ReportFormat::Json => generate_json_report(stats),
    }
}

/// Generate human-readable report
fn generate_human_report(stats: &ExtractionStats) {
    println!("\n{}", "Extraction Summary".bright_green().bold());
    println!(
        "  {} {} studies under {} accession numbers",
        "PACS:".bright_cyan(),
        stats.imaging_studies.to_string().bright_white(),
        stats.imaging_keys
    );
    println!(
        "  {} {} reports for {} patients",
        "RIS:".bright_cyan(),
        stats.opinion_reports.to_string().bright_white(),
        stats.opinion_keys
    );
    println!(
        "  {} {} reports for {} patients",
        "LIMS:".bright_cyan(),
        stats.pathology_reports.to_string().bright_white(),
        stats.pathology_keys
    );
    println!(
        "  {} {} ({} bytes)",
        "Output:".bright_cyan(),
        stats.output_path.display(),
        stats.output_bytes
    );
    println!(
        "  {} {}",
        "Records written:".bright_cyan(),
        stats.records_written.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(stats.processing_time)
    );
    println!();
}

/// Generate JSON report for machine consumption
fn generate_json_report(stats: &ExtractionStats) -> Result<()> {
    let json_stats = serde_json::json!({
        "imaging": {
            "keys": stats.imaging_keys,
            "records": stats.imaging_studies,
        },
        "opinion": {
            "keys": stats.opinion_keys,
            "records": stats.opinion_reports,
        },
        "pathology": {
            "keys": stats.pathology_keys,
            "records": stats.pathology_reports,
        },
        "records_written": stats.records_written,
        "output_path": stats.output_path.display().to_string(),
        "output_bytes": stats.output_bytes,
        "processing_time_ms": stats.processing_time.as_millis(),
    });

    let rendered = serde_json::to_string_pretty(&json_stats)
        .map_err(|e| Error::serialization("Failed to render run summary", e))?;
    println!("{}", rendered);
    Ok(())
}
