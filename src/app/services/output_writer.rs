//! Writes the aggregated dataset as a single JSON array

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::app::models::AggregatedRecord;
use crate::constants::DEBUG_PREVIEW_RECORDS;
use crate::{Error, Result};

/// Serialize `records` to `path`, returning the number of bytes written
pub fn write_output(records: &[AggregatedRecord], path: &Path, pretty: bool) -> Result<u64> {
    info!("Start flushing output JSON file: {}", path.display());

    for record in records.iter().take(DEBUG_PREVIEW_RECORDS) {
        debug!("Output record: {:?}", record);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::io(format!("Failed to create output directory {}", parent.display()), e)
        })?;
    }

    let file = File::create(path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
    let mut writer = BufWriter::new(file);

    let serialized = if pretty {
        serde_json::to_writer_pretty(&mut writer, records)
    } else {
        serde_json::to_writer(&mut writer, records)
    };
    serialized.map_err(|e| Error::serialization("Failed to serialize output records", e))?;

    writer
        .flush()
        .map_err(|e| Error::io(format!("Failed to flush {}", path.display()), e))?;

    let bytes = fs::metadata(path)
        .map_err(|e| Error::io(format!("Failed to stat {}", path.display()), e))?
        .len();

    info!("Finished flushing output JSON file ({} records, {} bytes)", records.len(), bytes);
    Ok(bytes)
}
