//! Radiology Extractor Library
//!
//! Joins three independently keyed medical record exports into a single
//! de-identified, patient-keyed dataset for machine-learning consumption.
//!
//! This library provides tools for:
//! - Parsing PACS imaging exports (one DICOM-JSON object per line)
//! - Parsing RIS radiology opinion exports (comma-separated with header)
//! - Parsing LIMS pathology exports (HL7-style segment messages)
//! - Joining the three collections per patient with de-identification
//! - Writing the joined records as a single JSON array

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregator;
        pub mod imaging_parser;
        pub mod input_loader;
        pub mod opinion_parser;
        pub mod output_writer;
        pub mod pathology_parser;
        pub mod record_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
    pub mod input;
}

// Re-export commonly used types
pub use app::models::{
    AggregatedRecord, ImagingStudy, InputKind, KeyedRecords, OpinionReport, OpinionSummary,
    PathologyReport,
};
pub use config::ExtractorConfig;

/// Result type alias for the radiology extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for extraction, validation and aggregation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// No usable configuration (e.g. no input path at all)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input path does not exist or is not a regular file
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    /// Input path is a directory
    #[error("Directory inputs are not supported: {path}")]
    DirectoryInput { path: String },

    /// Malformed record in one of the input feeds
    #[error("Parse error in {kind} input at line {line}: {message}")]
    Parse {
        kind: InputKind,
        line: usize,
        message: String,
    },

    /// Opinion feed references an accession number with no imaging studies
    #[error(
        "No imaging studies found for accession number '{accession_number}' (patient '{patient_id}')"
    )]
    Lookup {
        patient_id: String,
        accession_number: String,
    },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// JSON serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A background parser task failed to complete
    #[error("Parser task failed: {message}")]
    ParserTask { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a directory input error
    pub fn directory_input(path: impl Into<String>) -> Self {
        Self::DirectoryInput { path: path.into() }
    }

    /// Create a parse error for the given feed and 1-based line number
    pub fn parse(kind: InputKind, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            line,
            message: message.into(),
        }
    }

    /// Create a lookup error
    pub fn lookup(patient_id: impl Into<String>, accession_number: impl Into<String>) -> Self {
        Self::Lookup {
            patient_id: patient_id.into(),
            accession_number: accession_number.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a parser task error
    pub fn parser_task(message: impl Into<String>) -> Self {
        Self::ParserTask {
            message: message.into(),
        }
    }

    /// Whether this error was raised by input validation, before any parsing
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::FileNotFound { .. } | Self::DirectoryInput { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
