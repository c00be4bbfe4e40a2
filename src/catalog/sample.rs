use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::disease::Disease;
use crate::error::{DiagnoseError, Result};

/// Number of reference images in the catalog.
pub const SAMPLE_COUNT: usize = 10;

/// A validated catalog position in `0..SAMPLE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SampleIndex(u8);

impl SampleIndex {
    pub fn new(index: usize) -> Result<SampleIndex> {
        if index < SAMPLE_COUNT {
            Ok(SampleIndex(index as u8))
        } else {
            Err(DiagnoseError::InvalidSample(index))
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// The disease this reference image illustrates.
    pub fn disease(self) -> Disease {
        Disease::ALL[self.get()]
    }

    pub fn all() -> impl Iterator<Item = SampleIndex> {
        (0..SAMPLE_COUNT as u8).map(SampleIndex)
    }
}

impl TryFrom<usize> for SampleIndex {
    type Error = DiagnoseError;

    fn try_from(value: usize) -> Result<Self> {
        SampleIndex::new(value)
    }
}

impl From<SampleIndex> for usize {
    fn from(value: SampleIndex) -> usize {
        value.get()
    }
}

impl fmt::Display for SampleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed, ordered set of ten labelled reference images.
///
/// Images live on disk as `{dir}/{index}.jpg` and are served to browsers as
/// `/sample-paddies/{index}.jpg`.
#[derive(Debug, Clone)]
pub struct SampleCatalog {
    dir: PathBuf,
}

impl SampleCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SampleCatalog { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// On-disk location of sample `index`.
    pub fn path(&self, index: SampleIndex) -> PathBuf {
        self.dir.join(format!("{}.jpg", index))
    }

    /// Browser-facing URL of sample `index`.
    pub fn url(index: SampleIndex) -> String {
        format!("/sample-paddies/{}.jpg", index)
    }

    /// Reads the raw bytes of sample `index`.
    pub fn load(&self, index: SampleIndex) -> Result<Vec<u8>> {
        let path = self.path(index);
        std::fs::read(&path).map_err(|source| DiagnoseError::SampleUnavailable { path, source })
    }

    /// `(index, disease)` pairs in catalog order, for building pickers.
    pub fn entries(&self) -> impl Iterator<Item = (SampleIndex, Disease)> {
        SampleIndex::all().map(|i| (i, i.disease()))
    }
}
