//! Segment classification and fixed-window field extraction

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::app::models::InputKind;
use crate::constants::pathology::{
    DIAGNOSIS_PATTERN, ENVELOPE_TAGS, MESSAGE_HEADER_TAG, OBSERVATION_REQUEST_TAG,
    OBSERVATION_RESULT_TAG, PATIENT_ID_TAG, SEGMENT_TAG_LEN,
};
use crate::{Error, Result};

/// Diagnosis marker pattern, compiled once.
static DIAGNOSIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(DIAGNOSIS_PATTERN).unwrap());

/// A trimmed line of the pathology feed, classified by its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Empty line
    Blank,
    /// File/batch header or trailer (FHS, BHS, FTS, BTS)
    Envelope,
    /// MSH
    MessageHeader,
    /// PID
    PatientIdentification(&'a str),
    /// OBR
    ObservationRequest(&'a str),
    /// OBX
    ObservationResult(&'a str),
    /// Any segment the extractor does not read
    Other(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a line; surrounding whitespace is removed first
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Segment::Blank;
        }

        match line.get(..SEGMENT_TAG_LEN) {
            Some(tag) if ENVELOPE_TAGS.contains(&tag) => Segment::Envelope,
            Some(MESSAGE_HEADER_TAG) => Segment::MessageHeader,
            Some(PATIENT_ID_TAG) => Segment::PatientIdentification(line),
            Some(OBSERVATION_REQUEST_TAG) => Segment::ObservationRequest(line),
            Some(OBSERVATION_RESULT_TAG) => Segment::ObservationResult(line),
            _ => Segment::Other(line),
        }
    }

    /// Segment tag, when the line has one
    pub fn tag(&self) -> Option<&'a str> {
        match self {
            Segment::PatientIdentification(line)
            | Segment::ObservationRequest(line)
            | Segment::ObservationResult(line)
            | Segment::Other(line) => line.get(..SEGMENT_TAG_LEN),
            _ => None,
        }
    }
}

/// Text inside a fixed character window of `line`
///
/// Offsets count characters, not bytes. A window running past the end of the
/// line is a fatal parse error.
pub fn fixed_window<'a>(
    line: &'a str,
    window: Range<usize>,
    field: &str,
    line_number: usize,
) -> Result<&'a str> {
    char_window(line, &window).ok_or_else(|| {
        Error::parse(
            InputKind::Pathology,
            line_number,
            format!(
                "{} window {}..{} is outside a segment of {} characters",
                field,
                window.start,
                window.end,
                line.chars().count()
            ),
        )
    })
}

fn char_window<'a>(line: &'a str, window: &Range<usize>) -> Option<&'a str> {
    if window.start > window.end {
        return None;
    }
    let start = byte_offset(line, window.start)?;
    let end = byte_offset(line, window.end)?;
    line.get(start..end)
}

/// Byte position of the `n`th character, or the line length for `n == chars`
fn byte_offset(line: &str, n: usize) -> Option<usize> {
    line.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(line.len()))
        .nth(n)
}

/// Diagnosis text of an OBX segment, or an empty string when the marker is absent
pub fn extract_diagnosis(line: &str) -> String {
    DIAGNOSIS_RE
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
