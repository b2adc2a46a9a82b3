//! PACS imaging feed parser
//!
//! Every line is a self-contained DICOM-JSON object. Only three attributes
//! are read, each through the first element of its `Value` array; any other
//! attributes are ignored.

use serde::Deserialize;
use std::io::BufRead;
use tracing::trace;

use super::record_parser::{RecordParser, read_line};
use crate::app::models::{ImagingStudy, InputKind, KeyedRecords};
use crate::constants::imaging;
use crate::{Error, Result};

/// A DICOM-JSON attribute: `{"vr": ..., "Value": [...]}`
#[derive(Debug, Deserialize)]
struct DicomAttribute {
    #[serde(rename = "Value")]
    value: Vec<serde_json::Value>,
}

/// The subset of a study object the extractor needs
#[derive(Debug, Deserialize)]
struct StudyLine {
    #[serde(rename = "00100020")]
    patient_id: DicomAttribute,
    #[serde(rename = "00080050")]
    accession_number: DicomAttribute,
    #[serde(rename = "00080020")]
    study_date: DicomAttribute,
}

/// Parser for the imaging feed, keyed by accession number
#[derive(Debug, Default, Clone, Copy)]
pub struct ImagingParser;

impl ImagingParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single JSON line into a study
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<ImagingStudy> {
        let study: StudyLine = serde_json::from_str(line).map_err(|e| {
            Error::parse(InputKind::Imaging, line_number, format!("invalid study object: {}", e))
        })?;

        Ok(ImagingStudy {
            patient_id: first_value(&study.patient_id, imaging::PATIENT_ID_TAG, line_number)?,
            accession_number: first_value(
                &study.accession_number,
                imaging::ACCESSION_NUMBER_TAG,
                line_number,
            )?,
            study_date: first_value(&study.study_date, imaging::STUDY_DATE_TAG, line_number)?,
        })
    }
}

impl RecordParser for ImagingParser {
    type Record = ImagingStudy;
    const KIND: InputKind = InputKind::Imaging;

    fn parse_reader<R: BufRead>(&self, reader: R) -> Result<KeyedRecords<ImagingStudy>> {
        let mut studies = KeyedRecords::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = read_line(Self::KIND, line_number, line)?;
            if line.trim().is_empty() {
                trace!("Skipping blank imaging line {}", line_number);
                continue;
            }

            let study = self.parse_line(&line, line_number)?;
            studies.push(study.accession_number.clone(), study);
        }

        Ok(studies)
    }
}

/// First element of an attribute's value array, as text
fn first_value(attribute: &DicomAttribute, tag: &str, line_number: usize) -> Result<String> {
    let value = attribute.value.first().ok_or_else(|| {
        Error::parse(
            InputKind::Imaging,
            line_number,
            format!("attribute {} has an empty {} array", tag, imaging::VALUE_KEY),
        )
    })?;

    match value {
        serde_json::Value::String(text) => Ok(text.clone()),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(Error::parse(
            InputKind::Imaging,
            line_number,
            format!("attribute {} has a non-scalar first value: {}", tag, other),
        )),
    }
}
