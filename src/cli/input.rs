//! Input path handling for the command line
//!
//! The three feed paths are each optional, but at least one must be given
//! and every given path must name an existing regular file.

use crate::app::models::InputKind;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths of the three input feeds as supplied by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputPaths {
    pub imaging: Option<PathBuf>,
    pub opinion: Option<PathBuf>,
    pub pathology: Option<PathBuf>,
}

impl InputPaths {
    pub fn new(
        imaging: Option<PathBuf>,
        opinion: Option<PathBuf>,
        pathology: Option<PathBuf>,
    ) -> Self {
        Self {
            imaging,
            opinion,
            pathology,
        }
    }

    /// Every feed with its path, in a fixed order
    pub fn entries(&self) -> [(InputKind, Option<&Path>); 3] {
        [
            (InputKind::Imaging, self.imaging.as_deref()),
            (InputKind::Opinion, self.opinion.as_deref()),
            (InputKind::Pathology, self.pathology.as_deref()),
        ]
    }

    /// Feeds for which no path was given
    pub fn missing(&self) -> Vec<InputKind> {
        self.entries()
            .into_iter()
            .filter(|(_, path)| path.is_none())
            .map(|(kind, _)| kind)
            .collect()
    }

    /// Check the supplied paths before any parsing starts
    ///
    /// Failures are reported in this order: no path at all, a directory,
    /// a path that is not an existing file.
    pub fn validate(&self) -> Result<()> {
        let given: Vec<(InputKind, &Path)> = self
            .entries()
            .into_iter()
            .filter_map(|(kind, path)| path.map(|p| (kind, p)))
            .collect();

        if given.is_empty() {
            return Err(Error::configuration(
                "No input path was given; supply at least one of --pacs, --ris or --lims",
            ));
        }

        if let Some((_, path)) = given.iter().find(|(_, path)| path.is_dir()) {
            return Err(Error::directory_input(path.display().to_string()));
        }

        if let Some((_, path)) = given.iter().find(|(_, path)| !path.is_file()) {
            return Err(Error::file_not_found(path.display().to_string()));
        }

        for kind in self.missing() {
            debug!("No {} input given; its collection will be empty", kind);
        }

        Ok(())
    }
}
