//! Test fixtures for the pathology feed parser
//!
//! Segment builders place identifiers exactly inside the fixed windows the
//! parser reads, so tests can focus on message boundaries.

use std::io::Cursor;

use crate::app::models::{KeyedRecords, PathologyReport};
use crate::app::services::pathology_parser::PathologyParser;
use crate::app::services::record_parser::RecordParser;

mod segment_tests;

pub const PATIENT_A: &str = "3f2504e0-4f89-11d3-9a0c-0305e82c3301";
pub const PATIENT_B: &str = "9b2c6d10-1a2b-4c3d-8e9f-0a1b2c3d4e5f";
pub const ACCESSION_A: &str = "a1b2c3d4-0000-4000-8000-000000000001";
pub const ACCESSION_B: &str = "a1b2c3d4-0000-4000-8000-000000000002";

pub fn file_header() -> String {
    "FHS|^~\\&|LIMS|LAB|EXTRACT|HOSP|20200101000000".to_string()
}

pub fn batch_header() -> String {
    "BHS|^~\\&|LIMS|LAB|EXTRACT|HOSP|20200101000000".to_string()
}

pub fn message_header() -> String {
    "MSH|^~\\&|LIMS|LAB|EXTRACT|HOSP|20200101000000||ORU^R01|MSG0001|P|2.3".to_string()
}

/// PID with the patient id at characters 9..45
pub fn pid_segment(patient_id: &str) -> String {
    assert_eq!(patient_id.chars().count(), 36);
    format!("PID|1||||{}|DOE^JANE||19800101|F", patient_id)
}

/// OBR with the accession number at characters 6..42 and the date at 46..54
pub fn obr_segment(accession_number: &str, date: &str) -> String {
    assert_eq!(accession_number.chars().count(), 36);
    assert_eq!(date.len(), 8);
    format!("OBR|1|{}||||{}|HISTO^Histology", accession_number, date)
}

/// OBX carrying a diagnosis behind the RESDIAG marker
pub fn obx_diagnosis(diagnosis: &str) -> String {
    format!("OBX|1|TX|RESDIAG^Result diagnosis:||{}^L||||||F", diagnosis)
}

/// OBX without the diagnosis marker
pub fn obx_plain() -> String {
    "OBX|1|TX|MACRO^Macroscopy:||Two cores received||||||F".to_string()
}

pub fn parse(lines: &[String]) -> KeyedRecords<PathologyReport> {
    PathologyParser::new()
        .parse_reader(Cursor::new(lines.join("\n")))
        .unwrap()
}

pub fn parse_with_flush(lines: &[String]) -> KeyedRecords<PathologyReport> {
    PathologyParser::new()
        .with_trailing_flush(true)
        .parse_reader(Cursor::new(lines.join("\n")))
        .unwrap()
}
