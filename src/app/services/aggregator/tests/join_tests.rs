//! Tests for the cross-feed join

use super::*;
use crate::Error;
use crate::app::services::aggregator::Aggregator;
use crate::config::ExtractorConfig;
use chrono::NaiveDate;

fn sorted_chars(s: &str) -> Vec<char> {
    let mut chars: Vec<char> = s.chars().collect();
    chars.sort_unstable();
    chars
}

#[test]
fn test_one_record_per_opinion_key() {
    let radiology = opinions(vec![
        opinion("P1", "ACC1", "19900101", "20200101"),
        opinion("P2", "ACC2", "19850615", "20200102"),
        opinion("P1", "ACC3", "19900101", "20200103"),
    ]);
    let imaging = studies(vec![
        study("P1", "ACC1", "20200101"),
        study("P2", "ACC2", "20200102"),
    ]);

    let records = Aggregator::seeded(1)
        .aggregate(&radiology, &imaging, &KeyedRecords::new())
        .unwrap();

    assert_eq!(records.len(), radiology.key_count());
    assert_eq!(records[0].opinions.len(), 2);
    assert_eq!(records[1].opinions.len(), 1);
}

#[test]
fn test_opinions_keep_length_and_order() {
    let radiology = opinions(vec![
        opinion("P1", "ACC1", "19900101", "20200101"),
        opinion("P1", "ACC2", "19900101", "20200202"),
        opinion("P1", "ACC3", "19900101", "20200303"),
    ]);
    let imaging = studies(vec![study("P1", "ACC1", "20200101")]);

    let records = Aggregator::seeded(2)
        .aggregate(&radiology, &imaging, &KeyedRecords::new())
        .unwrap();

    let dates: Vec<&str> = records[0].opinions.iter().map(|o| o.date.as_str()).collect();
    assert_eq!(dates, vec!["20200101", "20200202", "20200303"]);
    assert!(records[0].opinions.iter().all(|o| o.side.is_none()));
}

#[test]
fn test_studies_looked_up_by_first_join_id() {
    let radiology = opinions(vec![
        opinion("P1", "ACC1", "19900101", "20200101"),
        opinion("P1", "ACC2", "19900101", "20200202"),
    ]);
    let imaging = studies(vec![
        study("P1", "ACC1", "20200101"),
        study("P1", "ACC1", "20200105"),
        study("P1", "ACC2", "20200202"),
    ]);

    let records = Aggregator::seeded(3)
        .aggregate(&radiology, &imaging, &KeyedRecords::new())
        .unwrap();

    let study_dates: Vec<&str> = records[0]
        .studies
        .iter()
        .map(|s| s.study_date.as_str())
        .collect();
    assert_eq!(study_dates, vec!["20200101", "20200105"]);
}

#[test]
fn test_missing_imaging_is_lookup_error() {
    let radiology = opinions(vec![opinion("P1", "ACC404", "19900101", "20200101")]);
    let imaging = studies(vec![study("P1", "ACC1", "20200101")]);

    let result = Aggregator::seeded(4).aggregate(&radiology, &imaging, &KeyedRecords::new());

    match result {
        Err(Error::Lookup {
            patient_id,
            accession_number,
        }) => {
            assert_eq!(patient_id, "P1");
            assert_eq!(accession_number, "ACC404");
        }
        other => panic!("Expected lookup error, got {:?}", other),
    }
}

#[test]
fn test_missing_pathology_is_none() {
    let radiology = opinions(vec![
        opinion("P1", "ACC1", "19900101", "20200101"),
        opinion("P2", "ACC2", "19900101", "20200101"),
    ]);
    let imaging = studies(vec![
        study("P1", "ACC1", "20200101"),
        study("P2", "ACC2", "20200101"),
    ]);
    let lab = pathologies(vec![pathology("P2", "benign"), pathology("P2", "follow-up")]);

    let records = Aggregator::seeded(5)
        .aggregate(&radiology, &imaging, &lab)
        .unwrap();

    assert_eq!(records[0].pathology, None);
    let lab_opinions: Vec<String> = records[1]
        .pathology
        .as_ref()
        .unwrap()
        .iter()
        .map(|p| p.opinion.clone())
        .collect();
    assert_eq!(lab_opinions, vec!["benign", "follow-up"]);
}

#[test]
fn test_empty_report_list_gives_blank_record() {
    let mut radiology = KeyedRecords::new();
    radiology.entry("P9");
    let lab = pathologies(vec![pathology("P9", "benign")]);

    let records = Aggregator::seeded(6)
        .aggregate(&radiology, &KeyedRecords::new(), &lab)
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(sorted_chars(&record.deidentified_patient_id), sorted_chars("P9"));
    assert_eq!(record.sex, "");
    assert_eq!(record.date_of_birth, "");
    assert!(record.studies.is_empty());
    assert!(record.opinions.is_empty());
    assert_eq!(record.pathology.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_record_fields_from_first_report() {
    let mut second = opinion("P1", "ACC2", "20000101", "20200202");
    second.sex = "M".to_string();
    let radiology = opinions(vec![opinion("P1", "ACC1", "19900101", "20200101"), second]);
    let imaging = studies(vec![study("P1", "ACC1", "20200101")]);

    let records = Aggregator::seeded(7)
        .aggregate(&radiology, &imaging, &KeyedRecords::new())
        .unwrap();

    let record = &records[0];
    assert_eq!(record.sex, "F");
    let dob = NaiveDate::parse_from_str(&record.date_of_birth, "%Y.%m.%d").unwrap();
    let original = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    assert!((dob - original).num_days().abs() <= 365);
}

#[test]
fn test_deidentified_id_is_permutation() {
    let patient_id = "PATIENT-0042-XYZ";
    let radiology = opinions(vec![opinion(patient_id, "ACC1", "19900101", "20200101")]);
    let imaging = studies(vec![study(patient_id, "ACC1", "20200101")]);

    let records = Aggregator::seeded(8)
        .aggregate(&radiology, &imaging, &KeyedRecords::new())
        .unwrap();

    assert_eq!(
        sorted_chars(&records[0].deidentified_patient_id),
        sorted_chars(patient_id)
    );
}

#[test]
fn test_seeded_aggregation_is_reproducible() {
    let radiology = opinions(vec![opinion("PATIENT-0001", "ACC1", "19900101", "20200101")]);
    let imaging = studies(vec![study("PATIENT-0001", "ACC1", "20200101")]);

    let first = Aggregator::seeded(99)
        .aggregate(&radiology, &imaging, &KeyedRecords::new())
        .unwrap();
    let second = Aggregator::seeded(99)
        .aggregate(&radiology, &imaging, &KeyedRecords::new())
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_invalid_birth_date_is_fatal() {
    let radiology = opinions(vec![opinion("P1", "ACC1", "1990-01-01", "20200101")]);
    let imaging = studies(vec![study("P1", "ACC1", "20200101")]);

    let result = Aggregator::seeded(10).aggregate(&radiology, &imaging, &KeyedRecords::new());

    assert!(matches!(result, Err(Error::DateTimeParsing { .. })));
}

#[test]
fn test_from_config_applies_jitter() {
    let config = ExtractorConfig::default()
        .with_seed(11)
        .with_birth_date_jitter_days(1);
    let radiology = opinions(vec![opinion("P1", "ACC1", "20000301", "20200101")]);
    let imaging = studies(vec![study("P1", "ACC1", "20200101")]);

    let records = Aggregator::from_config(&config)
        .aggregate(&radiology, &imaging, &KeyedRecords::new())
        .unwrap();

    assert!(
        ["2000.02.29", "2000.03.01", "2000.03.02"].contains(&records[0].date_of_birth.as_str())
    );
}
