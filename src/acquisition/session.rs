use serde::Serialize;
use tracing::{debug, info};

use crate::acquisition::asset::{AssetSource, ImageAsset};
use crate::catalog::{SampleCatalog, SampleIndex};
use crate::error::Result;

/// URL the presentation layer serves the active upload from.
pub const ACTIVE_IMAGE_URL: &str = "/diagnose/image";

/// Snapshot of the session handed to pages that only need to know whether an
/// image is active and where to load it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub uploaded: bool,
    #[serde(rename = "userImage")]
    pub user_image: Option<String>,
}

/// The single active-image slot for one user, plus the values other pages read
/// from it.
///
/// Selecting a sample replaces an upload and vice versa; nothing is merged.
#[derive(Debug, Default)]
pub struct DiagnosisSession {
    active: Option<ImageAsset>,
    user_image: Option<String>,
    /// Bumped on every selection so browsers re-fetch the preview.
    generation: u64,
}

impl DiagnosisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes catalog image `index` the active asset.
    pub fn select_sample(&mut self, catalog: &SampleCatalog, index: usize) -> Result<&ImageAsset> {
        let index = SampleIndex::new(index)?;
        let bytes = catalog.load(index)?;
        info!(sample = %index, disease = index.disease().label(), bytes = bytes.len(), "sample selected");
        self.generation += 1;
        self.user_image = Some(SampleCatalog::url(index));
        Ok(self.active.insert(ImageAsset::sample(index, bytes)))
    }

    /// Makes a user-supplied file the active asset.
    ///
    /// `None` or an empty file is a no-op and leaves the session untouched.
    pub fn select_upload(&mut self, file: Option<Vec<u8>>) -> Option<&ImageAsset> {
        let bytes = match file {
            Some(b) if !b.is_empty() => b,
            _ => {
                debug!("upload selection without a file ignored");
                return None;
            }
        };
        info!(bytes = bytes.len(), "upload selected");
        self.generation += 1;
        self.user_image = Some(format!("{}?v={}", ACTIVE_IMAGE_URL, self.generation));
        Some(self.active.insert(ImageAsset::upload(bytes)))
    }

    pub fn active(&self) -> Option<&ImageAsset> {
        self.active.as_ref()
    }

    pub fn active_source(&self) -> Option<AssetSource> {
        self.active.as_ref().map(|a| a.source)
    }

    /// `true` once any image has been selected and not yet released.
    pub fn uploaded(&self) -> bool {
        self.active.is_some()
    }

    pub fn user_image(&self) -> Option<&str> {
        self.user_image.as_deref()
    }

    pub fn view(&self) -> SessionView {
        SessionView { uploaded: self.uploaded(), user_image: self.user_image.clone() }
    }

    /// Drops the active asset, returning the session to its initial state.
    pub fn clear(&mut self) -> Option<ImageAsset> {
        self.user_image = None;
        self.active.take()
    }
}
