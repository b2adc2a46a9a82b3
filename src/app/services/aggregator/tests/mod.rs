//! Test fixtures for the aggregator

use crate::app::models::{ImagingStudy, KeyedRecords, OpinionReport, PathologyReport};

mod join_tests;

pub fn opinion(patient_id: &str, join_id: &str, birth_date: &str, date: &str) -> OpinionReport {
    OpinionReport {
        patient_id: patient_id.to_string(),
        join_id: join_id.to_string(),
        sex: "F".to_string(),
        birth_date: birth_date.to_string(),
        side: None,
        opinion_pair: [format!("{}-left", date), format!("{}-right", date)],
        date: date.to_string(),
    }
}

pub fn study(patient_id: &str, accession_number: &str, study_date: &str) -> ImagingStudy {
    ImagingStudy {
        patient_id: patient_id.to_string(),
        accession_number: accession_number.to_string(),
        study_date: study_date.to_string(),
    }
}

pub fn pathology(patient_id: &str, opinion: &str) -> PathologyReport {
    PathologyReport {
        date: Some("20200301".to_string()),
        opinion: opinion.to_string(),
        accession_number: "ACC-PATH".to_string(),
        patient_id: patient_id.to_string(),
    }
}

pub fn opinions(reports: Vec<OpinionReport>) -> KeyedRecords<OpinionReport> {
    reports
        .into_iter()
        .map(|r| (r.patient_id.clone(), r))
        .collect()
}

pub fn studies(items: Vec<ImagingStudy>) -> KeyedRecords<ImagingStudy> {
    items
        .into_iter()
        .map(|s| (s.accession_number.clone(), s))
        .collect()
}

pub fn pathologies(items: Vec<PathologyReport>) -> KeyedRecords<PathologyReport> {
    items
        .into_iter()
        .map(|p| (p.patient_id.clone(), p))
        .collect()
}
