//! Join driver iterating the opinion collection

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

use super::deidentify::{deidentify_id, perturb_birth_date};
use crate::app::models::{
    AggregatedRecord, ImagingStudy, KeyedRecords, OpinionReport, PathologyReport,
};
use crate::config::ExtractorConfig;
use crate::constants::DEFAULT_BIRTH_DATE_JITTER_DAYS;
use crate::{Error, Result};

/// Builds the output dataset from the three parsed feeds
#[derive(Debug)]
pub struct Aggregator {
    rng: StdRng,
    birth_date_jitter_days: i64,
}

impl Aggregator {
    /// Aggregator drawing randomness from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            birth_date_jitter_days: DEFAULT_BIRTH_DATE_JITTER_DAYS,
        }
    }

    /// Aggregator with reproducible de-identification and date jitter
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            birth_date_jitter_days: DEFAULT_BIRTH_DATE_JITTER_DAYS,
        }
    }

    /// Aggregator set up from the run configuration
    pub fn from_config(config: &ExtractorConfig) -> Self {
        let aggregator = match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        };
        aggregator.with_birth_date_jitter_days(config.birth_date_jitter_days)
    }

    pub fn with_birth_date_jitter_days(mut self, days: i64) -> Self {
        self.birth_date_jitter_days = days;
        self
    }

    /// Produce one record per key of `radiologist_reports`, in key order
    pub fn aggregate(
        &mut self,
        radiologist_reports: &KeyedRecords<OpinionReport>,
        imaging_studies: &KeyedRecords<ImagingStudy>,
        pathology_reports: &KeyedRecords<PathologyReport>,
    ) -> Result<Vec<AggregatedRecord>> {
        info!("Start input aggregation");
        debug!("Imaging study keys: {}", imaging_studies.key_count());
        debug!("Pathology report keys: {}", pathology_reports.key_count());

        let mut records = Vec::with_capacity(radiologist_reports.key_count());
        for (patient_id, reports) in radiologist_reports.iter() {
            let record =
                self.build_record(patient_id, reports, imaging_studies, pathology_reports)?;
            records.push(record);
        }

        info!("Finished input aggregation: {} records", records.len());
        Ok(records)
    }

    fn build_record(
        &mut self,
        patient_id: &str,
        reports: &[OpinionReport],
        imaging_studies: &KeyedRecords<ImagingStudy>,
        pathology_reports: &KeyedRecords<PathologyReport>,
    ) -> Result<AggregatedRecord> {
        let pathology = pathology_reports.get(patient_id).map(<[_]>::to_vec);
        let deidentified_patient_id = deidentify_id(patient_id, &mut self.rng);

        let Some(first) = reports.first() else {
            trace!("Patient key without opinion reports");
            return Ok(AggregatedRecord {
                deidentified_patient_id,
                sex: String::new(),
                date_of_birth: String::new(),
                studies: Vec::new(),
                opinions: Vec::new(),
                pathology,
            });
        };

        let studies = imaging_studies
            .get(&first.join_id)
            .ok_or_else(|| Error::lookup(patient_id, &first.join_id))?
            .to_vec();

        let date_of_birth =
            perturb_birth_date(&first.birth_date, self.birth_date_jitter_days, &mut self.rng)?;

        Ok(AggregatedRecord {
            deidentified_patient_id,
            sex: first.sex.clone(),
            date_of_birth,
            studies,
            opinions: reports.iter().map(OpinionReport::summary).collect(),
            pathology,
        })
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
