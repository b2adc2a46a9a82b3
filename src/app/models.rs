//! Data models for radiology extraction
//!
//! This module contains the typed records produced by the three feed parsers,
//! the insertion-ordered keyed collection they are grouped into, and the
//! joined output record handed to the writer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Input Feed Kinds
// =============================================================================

/// The three supported input feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// PACS export, one DICOM-JSON object per line
    Imaging,
    /// RIS export, comma-separated rows after one header line
    Opinion,
    /// LIMS export, HL7-style segment messages
    Pathology,
}

impl InputKind {
    /// Source system abbreviation
    pub fn system_name(&self) -> &'static str {
        match self {
            InputKind::Imaging => "PACS",
            InputKind::Opinion => "RIS",
            InputKind::Pathology => "LIMS",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputKind::Imaging => "imaging",
            InputKind::Opinion => "opinion",
            InputKind::Pathology => "pathology",
        };
        write!(f, "{} ({})", name, self.system_name())
    }
}

// =============================================================================
// Keyed Collection
// =============================================================================

/// Insertion-ordered multimap from a join key to the records filed under it
///
/// Keys iterate in the order they were first seen and records keep their
/// insertion order within a key. Nothing is ever deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecords<T> {
    index: HashMap<String, usize>,
    entries: Vec<(String, Vec<T>)>,
}

impl<T> Default for KeyedRecords<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> KeyedRecords<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record list for `key`, creating an empty one if absent
    pub fn entry(&mut self, key: impl Into<String>) -> &mut Vec<T> {
        let key = key.into();
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(key.clone(), position);
                self.entries.push((key, Vec::new()));
                position
            }
        };
        &mut self.entries[position].1
    }

    /// Append a record under `key`
    pub fn push(&mut self, key: impl Into<String>, record: T) {
        self.entry(key).push(record);
    }

    /// Records filed under `key`, if the key was ever seen
    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterate keys and their records in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of records across all keys
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for KeyedRecords<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (key, record) in iter {
            collection.push(key, record);
        }
        collection
    }
}

// =============================================================================
// Feed Records
// =============================================================================

/// One study from the imaging feed, grouped by accession number
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImagingStudy {
    pub patient_id: String,
    pub accession_number: String,
    #[serde(rename = "date_of_study")]
    pub study_date: String,
}

/// One row of the radiology opinion feed, grouped by patient id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpinionReport {
    /// Local patient id, the join key towards the pathology feed
    pub patient_id: String,
    /// Links to an imaging study's accession number
    pub join_id: String,
    pub sex: String,
    /// Birth date as given, `YYYYMMDD`
    pub birth_date: String,
    /// Never populated from the RIS export
    pub side: Option<String>,
    pub opinion_pair: [String; 2],
    pub date: String,
}

impl OpinionReport {
    /// The subset of the report carried into the output dataset
    pub fn summary(&self) -> OpinionSummary {
        OpinionSummary {
            side: self.side.clone(),
            date: self.date.clone(),
            opinion: self.opinion_pair.clone(),
        }
    }
}

/// Reduced projection of an [`OpinionReport`] used in the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpinionSummary {
    pub side: Option<String>,
    pub date: String,
    pub opinion: [String; 2],
}

/// One message from the pathology feed, grouped by patient id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathologyReport {
    pub date: Option<String>,
    pub opinion: String,
    pub accession_number: String,
    pub patient_id: String,
}

impl PathologyReport {
    /// True when no field has been populated yet
    pub fn is_empty(&self) -> bool {
        self.date.as_deref().is_none_or(str::is_empty)
            && self.opinion.is_empty()
            && self.accession_number.is_empty()
            && self.patient_id.is_empty()
    }
}

// =============================================================================
// Output Record
// =============================================================================

/// One joined, de-identified record per patient of the opinion feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    #[serde(rename = "patient_uid")]
    pub deidentified_patient_id: String,
    pub sex: String,
    /// Perturbed birth date, `YYYY.MM.DD`
    pub date_of_birth: String,
    pub studies: Vec<ImagingStudy>,
    #[serde(rename = "rad")]
    pub opinions: Vec<OpinionSummary>,
    /// `None` when the pathology feed has no entry for the patient
    #[serde(rename = "patho")]
    pub pathology: Option<Vec<PathologyReport>>,
}
