//! Message state machine for the pathology feed

use std::io::BufRead;
use tracing::{error, trace, warn};

use super::segment::{Segment, extract_diagnosis, fixed_window};
use crate::Result;
use crate::app::models::{InputKind, KeyedRecords, PathologyReport};
use crate::app::services::record_parser::{RecordParser, read_line};
use crate::constants::pathology::{OBR_ACCESSION_NUMBER, OBR_DATE, PID_PATIENT_ID};

/// Position of the parser relative to message boundaries
#[derive(Debug)]
enum MessageState {
    /// No MSH seen yet and no data collected
    BetweenMessages,
    /// Collecting segments of the message opened by the last MSH
    InsideMessage(PathologyReport),
}

/// Parser for the pathology feed, keyed by patient id
#[derive(Debug, Default, Clone, Copy)]
pub struct PathologyParser {
    flush_trailing_message: bool,
}

impl PathologyParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also commit the message still open at end of input
    pub fn with_trailing_flush(mut self, flush: bool) -> Self {
        self.flush_trailing_message = flush;
        self
    }
}

impl RecordParser for PathologyParser {
    type Record = PathologyReport;
    const KIND: InputKind = InputKind::Pathology;

    fn parse_reader<R: BufRead>(&self, reader: R) -> Result<KeyedRecords<PathologyReport>> {
        let mut reports = KeyedRecords::new();
        let mut state = MessageState::BetweenMessages;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = read_line(Self::KIND, line_number, line)?;

            state = match (Segment::classify(&line), state) {
                (Segment::Envelope, state) => state,

                (Segment::MessageHeader, previous) => {
                    if let MessageState::InsideMessage(report) = previous {
                        commit(&mut reports, report);
                    }
                    MessageState::InsideMessage(PathologyReport::default())
                }

                (Segment::Blank, MessageState::InsideMessage(report)) if !report.is_empty() => {
                    MessageState::InsideMessage(report)
                }

                (Segment::Blank, state) => {
                    error!("Segment received before message header [line {}]", line_number);
                    state
                }

                (other @ Segment::Other(_), state) => {
                    trace!(
                        "Ignoring {} segment at line {}",
                        other.tag().unwrap_or_default(),
                        line_number
                    );
                    state
                }

                (segment, MessageState::BetweenMessages) => {
                    warn!(
                        "Segment received before message header [{}] at line {}, opening message",
                        segment.tag().unwrap_or_default(),
                        line_number
                    );
                    let report = fill(PathologyReport::default(), segment, line_number)?;
                    MessageState::InsideMessage(report)
                }

                (segment, MessageState::InsideMessage(report)) => {
                    MessageState::InsideMessage(fill(report, segment, line_number)?)
                }
            };
        }

        if let MessageState::InsideMessage(report) = state {
            if !report.is_empty() {
                if self.flush_trailing_message {
                    commit(&mut reports, report);
                } else {
                    warn!(
                        "Discarding trailing pathology message for patient '{}': no closing message header",
                        report.patient_id
                    );
                }
            }
        }

        Ok(reports)
    }
}

/// Copy the fields a data segment carries into `report`
fn fill(
    mut report: PathologyReport,
    segment: Segment<'_>,
    line_number: usize,
) -> Result<PathologyReport> {
    match segment {
        Segment::PatientIdentification(line) => {
            report.patient_id =
                fixed_window(line, PID_PATIENT_ID, "PID patient id", line_number)?.to_string();
        }
        Segment::ObservationRequest(line) => {
            report.accession_number =
                fixed_window(line, OBR_ACCESSION_NUMBER, "OBR accession number", line_number)?
                    .to_string();
            report.date = Some(fixed_window(line, OBR_DATE, "OBR date", line_number)?.to_string());
        }
        Segment::ObservationResult(line) => {
            report.opinion = extract_diagnosis(line);
            if report.opinion.is_empty() {
                trace!("No diagnosis marker in OBX at line {}", line_number);
            }
        }
        Segment::Blank | Segment::Envelope | Segment::MessageHeader | Segment::Other(_) => {}
    }
    Ok(report)
}

/// File a finished message under its patient id, dropping empty ones
fn commit(reports: &mut KeyedRecords<PathologyReport>, report: PathologyReport) {
    if report.is_empty() {
        trace!("Dropping empty pathology message");
        return;
    }
    reports.push(report.patient_id.clone(), report);
}
