//! Command-line argument definitions for the radiology extractor
//!
//! This module defines the CLI interface using the clap derive API. Input
//! paths are only checked for shape here; existence checks live in
//! [`crate::cli::input`].

use crate::cli::input::InputPaths;
use crate::config::ExtractorConfig;
use crate::{Error, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the radiology extractor
///
/// Joins PACS, RIS and LIMS exports into one de-identified JSON dataset.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "radiology-extractor",
    version,
    about = "Process PACS, RIS and LIMS files into one de-identified, patient-keyed JSON dataset",
    long_about = "Process PACS, RIS and LIMS export files. Each input type must be given \
                  through its own flag; input files are not classified automatically. The \
                  RIS opinion feed drives the join: one output record is produced per RIS \
                  patient, with matching PACS studies and LIMS pathology reports attached."
)]
pub struct Args {
    /// Picture Archiving and Communication System export (one DICOM-JSON object per line)
    #[arg(short = 'p', long = "pacs", value_name = "FILE")]
    pub pacs: Option<PathBuf>,

    /// Radiology Information System export (comma-separated, one header line)
    #[arg(short = 'r', long = "ris", value_name = "FILE")]
    pub ris: Option<PathBuf>,

    /// Laboratory Information Management System export (HL7-style segments)
    #[arg(short = 'l', long = "lims", value_name = "FILE")]
    pub lims: Option<PathBuf>,

    /// Output JSON file
    ///
    /// Defaults to output.ml.json in the working directory, or the value of
    /// RADIOLOGY_EXTRACTOR_OUTPUT when set.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Seed for de-identification and birth date perturbation
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Maximum birth date shift in days, applied in both directions
    #[arg(long = "jitter-days", value_name = "DAYS")]
    pub jitter_days: Option<i64>,

    /// Parse the inputs one after another instead of concurrently
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Keep the last LIMS message even when no message header follows it
    #[arg(long = "flush-trailing-message")]
    pub flush_trailing_message: bool,

    /// Indent the output JSON
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Format of the run summary printed on stdout
    #[arg(long = "report-format", value_enum, default_value = "human")]
    pub report_format: ReportFormat,
}

/// Output format options for the run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Input paths as given on the command line
    pub fn input_paths(&self) -> InputPaths {
        InputPaths::new(self.pacs.clone(), self.ris.clone(), self.lims.clone())
    }

    /// Check flag values that do not depend on the filesystem
    pub fn validate(&self) -> Result<()> {
        if let Some(days) = self.jitter_days {
            if days <= 0 {
                return Err(Error::configuration(
                    "--jitter-days must be greater than 0",
                ));
            }
        }

        if let Some(output) = &self.output {
            let inputs = self.input_paths();
            if inputs
                .entries()
                .iter()
                .any(|(_, path)| *path == Some(output.as_path()))
            {
                return Err(Error::configuration(format!(
                    "Output path {} would overwrite an input file",
                    output.display()
                )));
            }
        }

        Ok(())
    }

    /// Apply command-line overrides on top of `config`
    pub fn apply_to(&self, mut config: ExtractorConfig) -> ExtractorConfig {
        if let Some(output) = &self.output {
            config = config.with_output_path(output);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(days) = self.jitter_days {
            config = config.with_birth_date_jitter_days(days);
        }
        if self.sequential {
            config = config.with_sequential_parsing();
        }
        if self.flush_trailing_message {
            config = config.with_trailing_message_flush();
        }
        if self.pretty {
            config = config.with_pretty_output();
        }
        config
    }

    /// Get the log level string based on verbosity
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show the progress spinner (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
