//! Runs the feed parsers and collects their keyed outputs
//!
//! The parsers share nothing, so with parallel parsing enabled each one runs
//! on its own blocking task and the results are joined before aggregation.

use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info};

use super::imaging_parser::ImagingParser;
use super::opinion_parser::OpinionParser;
use super::pathology_parser::PathologyParser;
use super::record_parser::RecordParser;
use crate::app::models::{ImagingStudy, KeyedRecords, OpinionReport, PathologyReport};
use crate::cli::input::InputPaths;
use crate::config::ExtractorConfig;
use crate::{Error, Result};

/// The three parsed collections, complete and immutable from here on
#[derive(Debug, Default)]
pub struct ParsedInputs {
    pub imaging_studies: KeyedRecords<ImagingStudy>,
    pub radiologist_reports: KeyedRecords<OpinionReport>,
    pub pathology_reports: KeyedRecords<PathologyReport>,
}

pub struct InputLoader;

impl InputLoader {
    /// Parse every supplied input; absent inputs give empty collections
    pub async fn load(paths: &InputPaths, config: &ExtractorConfig) -> Result<ParsedInputs> {
        info!("Start processing the given inputs");

        let pathology_parser =
            PathologyParser::new().with_trailing_flush(config.flush_trailing_message);

        let inputs = if config.parallel_parsing {
            debug!("Parsing inputs concurrently");
            let (imaging_studies, radiologist_reports, pathology_reports) = tokio::try_join!(
                spawn_parser(ImagingParser::new(), paths.imaging.clone()),
                spawn_parser(OpinionParser::new(), paths.opinion.clone()),
                spawn_parser(pathology_parser, paths.pathology.clone()),
            )?;
            ParsedInputs {
                imaging_studies,
                radiologist_reports,
                pathology_reports,
            }
        } else {
            debug!("Parsing inputs sequentially");
            ParsedInputs {
                radiologist_reports: parse_optional(
                    &OpinionParser::new(),
                    paths.opinion.as_deref(),
                )?,
                imaging_studies: parse_optional(&ImagingParser::new(), paths.imaging.as_deref())?,
                pathology_reports: parse_optional(
                    &pathology_parser,
                    paths.pathology.as_deref(),
                )?,
            }
        };

        info!("Finished processing the given inputs");
        Ok(inputs)
    }
}

fn parse_optional<P: RecordParser>(
    parser: &P,
    path: Option<&Path>,
) -> Result<KeyedRecords<P::Record>> {
    match path {
        Some(path) => parser.parse_file(path),
        None => Ok(KeyedRecords::new()),
    }
}

async fn spawn_parser<P>(parser: P, path: Option<PathBuf>) -> Result<KeyedRecords<P::Record>>
where
    P: RecordParser + Send + 'static,
    P::Record: Send + 'static,
{
    task::spawn_blocking(move || parse_optional(&parser, path.as_deref()))
        .await
        .map_err(|e| Error::parser_task(format!("{} parser did not complete: {}", P::KIND, e)))?
}
