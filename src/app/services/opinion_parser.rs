//! RIS radiology opinion feed parser
//!
//! The export is plain comma-separated text with one header line. Fields are
//! split on every comma; quoting is not interpreted.

use std::io::BufRead;
use tracing::trace;

use super::record_parser::{RecordParser, read_line};
use crate::app::models::{InputKind, KeyedRecords, OpinionReport};
use crate::constants::opinion;
use crate::{Error, Result};

/// Parser for the opinion feed, keyed by patient id
#[derive(Debug, Default, Clone, Copy)]
pub struct OpinionParser;

impl OpinionParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one data row
    pub fn parse_row(&self, row: &str, line_number: usize) -> Result<OpinionReport> {
        let fields: Vec<&str> = row.trim().split(opinion::DELIMITER).collect();
        if fields.len() < opinion::MIN_FIELDS {
            return Err(Error::parse(
                InputKind::Opinion,
                line_number,
                format!(
                    "expected at least {} fields, found {}",
                    opinion::MIN_FIELDS,
                    fields.len()
                ),
            ));
        }

        let from_end = |offset: usize| fields[fields.len() - offset].to_string();

        Ok(OpinionReport {
            patient_id: fields[opinion::PATIENT_ID_FIELD].to_string(),
            join_id: fields[opinion::JOIN_ID_FIELD].to_string(),
            sex: fields[opinion::SEX_FIELD].to_string(),
            birth_date: fields[opinion::BIRTH_DATE_FIELD].to_string(),
            side: None,
            opinion_pair: [
                from_end(opinion::FIRST_OPINION_FROM_END),
                from_end(opinion::SECOND_OPINION_FROM_END),
            ],
            date: from_end(opinion::DATE_FROM_END),
        })
    }
}

impl RecordParser for OpinionParser {
    type Record = OpinionReport;
    const KIND: InputKind = InputKind::Opinion;

    fn parse_reader<R: BufRead>(&self, reader: R) -> Result<KeyedRecords<OpinionReport>> {
        let mut reports = KeyedRecords::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = read_line(Self::KIND, line_number, line)?;

            if index < opinion::HEADER_LINES {
                trace!("Skipping opinion header: {}", line);
                continue;
            }
            if line.trim().is_empty() {
                trace!("Skipping blank opinion line {}", line_number);
                continue;
            }

            let report = self.parse_row(&line, line_number)?;
            reports.push(report.patient_id.clone(), report);
        }

        Ok(reports)
    }
}
