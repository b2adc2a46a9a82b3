//! Tests for segment classification and field extraction

use super::*;
use crate::app::services::pathology_parser::segment::{
    Segment, extract_diagnosis, fixed_window,
};

#[test]
fn test_classify_tags() {
    assert_eq!(Segment::classify(""), Segment::Blank);
    assert_eq!(Segment::classify("  \t"), Segment::Blank);
    assert_eq!(Segment::classify(&file_header()), Segment::Envelope);
    assert_eq!(Segment::classify("BTS|3"), Segment::Envelope);
    assert_eq!(Segment::classify(&message_header()), Segment::MessageHeader);

    let pid = pid_segment(PATIENT_A);
    assert_eq!(
        Segment::classify(&pid),
        Segment::PatientIdentification(pid.as_str())
    );
    assert!(matches!(
        Segment::classify(&obr_segment(ACCESSION_A, "20200101")),
        Segment::ObservationRequest(_)
    ));
    assert!(matches!(
        Segment::classify(&obx_plain()),
        Segment::ObservationResult(_)
    ));
    assert_eq!(Segment::classify("NT"), Segment::Other("NT"));
}

#[test]
fn test_segment_tag() {
    assert_eq!(Segment::classify("ORC|NW").tag(), Some("ORC"));
    assert_eq!(Segment::classify("MSH|^~").tag(), None);
    assert_eq!(Segment::classify("").tag(), None);
}

#[test]
fn test_fixed_window_extraction() {
    let pid = pid_segment(PATIENT_A);
    assert_eq!(fixed_window(&pid, 9..45, "patient id", 1).unwrap(), PATIENT_A);

    let obr = obr_segment(ACCESSION_A, "20211231");
    assert_eq!(fixed_window(&obr, 6..42, "accession", 1).unwrap(), ACCESSION_A);
    assert_eq!(fixed_window(&obr, 46..54, "date", 1).unwrap(), "20211231");
}

#[test]
fn test_fixed_window_past_end() {
    assert!(fixed_window("PID|1", 9..45, "patient id", 4).is_err());
    // 8 characters but 10 bytes
    assert!(fixed_window("ÄÖ345678", 2..9, "date", 1).is_err());
}

#[test]
fn test_fixed_window_counts_characters() {
    assert_eq!(fixed_window("ÄÖabcdef", 2..5, "field", 1).unwrap(), "abc");
    assert_eq!(fixed_window("abÄÖcdef", 2..4, "field", 1).unwrap(), "ÄÖ");
    assert_eq!(fixed_window("abcÄ", 3..4, "field", 1).unwrap(), "Ä");
    assert_eq!(fixed_window("abc", 3..3, "field", 1).unwrap(), "");
}

#[test]
fn test_extract_diagnosis() {
    assert_eq!(
        extract_diagnosis(&obx_diagnosis("Invasive ductal carcinoma")),
        "Invasive ductal carcinoma"
    );
    assert_eq!(extract_diagnosis(&obx_plain()), "");
    assert_eq!(
        extract_diagnosis("OBX|1|TX|RESDIAG^Result diagnosis:||no terminator"),
        ""
    );
}

#[test]
fn test_extract_diagnosis_runs_to_last_separator() {
    let line = "OBX|1|TX|RESDIAG^Result diagnosis:||Benign^see note^L|F";
    assert_eq!(extract_diagnosis(line), "Benign^see note");
}
