//! Application constants for the radiology extractor
//!
//! Segment tags, fixed offset windows, JSON tags and field indices for the
//! three input feeds, plus output defaults.

use std::ops::Range;

// =============================================================================
// Output Defaults
// =============================================================================

/// Default output file name, written relative to the working directory
pub const DEFAULT_OUTPUT_FILE: &str = "output.ml.json";

/// Environment variable overriding the output path
pub const ENV_OUTPUT_PATH: &str = "RADIOLOGY_EXTRACTOR_OUTPUT";

/// Environment variable fixing the RNG seed
pub const ENV_SEED: &str = "RADIOLOGY_EXTRACTOR_SEED";

/// Number of output records echoed at debug level after aggregation
pub const DEBUG_PREVIEW_RECORDS: usize = 2;

// =============================================================================
// Date Handling
// =============================================================================

/// Birth date format in the opinion feed
pub const BIRTH_DATE_INPUT_FORMAT: &str = "%Y%m%d";

/// Birth date format in the output dataset
pub const BIRTH_DATE_OUTPUT_FORMAT: &str = "%Y.%m.%d";

/// Default maximum birth date perturbation in days (inclusive, both directions)
pub const DEFAULT_BIRTH_DATE_JITTER_DAYS: i64 = 365;

/// Upper bound accepted for the jitter setting
pub const MAX_BIRTH_DATE_JITTER_DAYS: i64 = 3650;

// =============================================================================
// Imaging Feed (DICOM JSON)
// =============================================================================

pub mod imaging {
    /// Patient ID (0010,0020)
    pub const PATIENT_ID_TAG: &str = "00100020";

    /// Accession Number (0008,0050)
    pub const ACCESSION_NUMBER_TAG: &str = "00080050";

    /// Study Date (0008,0020)
    pub const STUDY_DATE_TAG: &str = "00080020";

    /// Key holding the value array of each attribute
    pub const VALUE_KEY: &str = "Value";
}

// =============================================================================
// Opinion Feed (delimited text)
// =============================================================================

pub mod opinion {
    /// Field separator
    pub const DELIMITER: char = ',';

    /// Number of header lines skipped before data rows
    pub const HEADER_LINES: usize = 1;

    pub const PATIENT_ID_FIELD: usize = 0;
    pub const SEX_FIELD: usize = 1;
    pub const BIRTH_DATE_FIELD: usize = 2;
    pub const JOIN_ID_FIELD: usize = 3;

    /// Offsets counted back from the last field
    pub const FIRST_OPINION_FROM_END: usize = 3;
    pub const SECOND_OPINION_FROM_END: usize = 2;
    pub const DATE_FROM_END: usize = 1;

    /// Minimum field count for a data row
    pub const MIN_FIELDS: usize = 7;
}

// =============================================================================
// Pathology Feed (HL7-style segments)
// =============================================================================

pub mod pathology {
    use super::Range;

    /// Length of the segment tag at the start of every line
    pub const SEGMENT_TAG_LEN: usize = 3;

    /// File/batch header and trailer tags, ignored in every state
    pub const ENVELOPE_TAGS: &[&str] = &["FHS", "BHS", "FTS", "BTS"];

    /// Message header
    pub const MESSAGE_HEADER_TAG: &str = "MSH";

    /// Patient identification
    pub const PATIENT_ID_TAG: &str = "PID";

    /// Observation request
    pub const OBSERVATION_REQUEST_TAG: &str = "OBR";

    /// Observation result
    pub const OBSERVATION_RESULT_TAG: &str = "OBX";

    /// Patient id window within a PID line
    pub const PID_PATIENT_ID: Range<usize> = 9..45;

    /// Accession number window within an OBR line
    pub const OBR_ACCESSION_NUMBER: Range<usize> = 6..42;

    /// Observation date window within an OBR line
    pub const OBR_DATE: Range<usize> = 46..54;

    /// Diagnosis text follows this marker and runs up to the last component separator
    pub const DIAGNOSIS_PATTERN: &str = r"RESDIAG\^Result diagnosis:\|\|(.*)\^";
}
