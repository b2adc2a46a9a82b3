//! Configuration management and validation.
//!
//! Provides the extraction settings with defaults, an environment overlay
//! and builder-style overrides applied from the command line.

use crate::constants::{
    DEFAULT_BIRTH_DATE_JITTER_DAYS, DEFAULT_OUTPUT_FILE, ENV_OUTPUT_PATH, ENV_SEED,
    MAX_BIRTH_DATE_JITTER_DAYS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Destination of the JSON array
    pub output_path: PathBuf,

    /// Fixed RNG seed; `None` draws from OS entropy
    pub seed: Option<u64>,

    /// Birth dates are shifted by a uniform offset in `[-n, n]` days
    pub birth_date_jitter_days: i64,

    /// Run the three feed parsers as concurrent blocking tasks
    pub parallel_parsing: bool,

    /// Commit the last pathology message at end of input instead of discarding it
    pub flush_trailing_message: bool,

    /// Indent the output JSON
    pub pretty_output: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            seed: None,
            birth_date_jitter_days: DEFAULT_BIRTH_DATE_JITTER_DAYS,
            parallel_parsing: true,
            flush_trailing_message: false,
            pretty_output: false,
        }
    }
}

impl ExtractorConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(output) = lookup(ENV_OUTPUT_PATH).filter(|v| !v.trim().is_empty()) {
            debug!("Output path overridden by {}: {}", ENV_OUTPUT_PATH, output);
            self.output_path = PathBuf::from(output.trim());
        }

        if let Some(seed) = lookup(ENV_SEED).filter(|v| !v.trim().is_empty()) {
            let seed = seed.trim().parse::<u64>().map_err(|e| {
                Error::configuration(format!("Invalid {} value '{}': {}", ENV_SEED, seed, e))
            })?;
            debug!("RNG seed set by {}", ENV_SEED);
            self.seed = Some(seed);
        }

        Ok(self)
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_birth_date_jitter_days(mut self, days: i64) -> Self {
        self.birth_date_jitter_days = days;
        self
    }

    pub fn with_sequential_parsing(mut self) -> Self {
        self.parallel_parsing = false;
        self
    }

    pub fn with_trailing_message_flush(mut self) -> Self {
        self.flush_trailing_message = true;
        self
    }

    pub fn with_pretty_output(mut self) -> Self {
        self.pretty_output = true;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(Error::configuration("Output path cannot be empty"));
        }

        if self.output_path.is_dir() {
            return Err(Error::configuration(format!(
                "Output path is a directory: {}",
                self.output_path.display()
            )));
        }

        if self.birth_date_jitter_days <= 0 {
            return Err(Error::configuration(
                "Birth date jitter must be greater than 0 days",
            ));
        }

        if self.birth_date_jitter_days > MAX_BIRTH_DATE_JITTER_DAYS {
            return Err(Error::configuration(format!(
                "Birth date jitter cannot exceed {} days",
                MAX_BIRTH_DATE_JITTER_DAYS
            )));
        }

        Ok(())
    }
}
