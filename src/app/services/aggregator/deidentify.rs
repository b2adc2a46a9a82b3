//! De-identification helpers
//!
//! The patient id is replaced by a random permutation of its own characters.
//! This hides the id from casual reading but is neither irreversible nor
//! collision-free: two ids that are anagrams of each other can map to the
//! same output.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::{Error, Result};
use crate::constants::{BIRTH_DATE_INPUT_FORMAT, BIRTH_DATE_OUTPUT_FORMAT};

/// Shuffle the characters of `id`
pub fn deidentify_id(id: &str, rng: &mut impl Rng) -> String {
    let mut chars: Vec<char> = id.chars().collect();
    chars.shuffle(rng);
    chars.into_iter().collect()
}

/// Shift a `YYYYMMDD` birth date by a uniform offset in `[-max_days, max_days]`
/// and render it as `YYYY.MM.DD`
pub fn perturb_birth_date(birth_date: &str, max_days: i64, rng: &mut impl Rng) -> Result<String> {
    let parsed = NaiveDate::parse_from_str(birth_date, BIRTH_DATE_INPUT_FORMAT).map_err(|e| {
        Error::datetime_parsing(format!("Invalid birth date '{}'", birth_date), e)
    })?;

    let offset = rng.gen_range(-max_days..=max_days);
    let shifted = Duration::try_days(offset)
        .and_then(|delta| parsed.checked_add_signed(delta))
        .ok_or_else(|| {
            Error::configuration(format!(
                "Birth date '{}' shifted by {} days is outside the supported date range",
                birth_date, offset
            ))
        })?;

    Ok(shifted.format(BIRTH_DATE_OUTPUT_FORMAT).to_string())
}
