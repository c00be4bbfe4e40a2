use serde::Serialize;

use crate::catalog::SampleIndex;

/// Where the active image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum AssetSource {
    Sample(SampleIndex),
    Upload,
}

/// Raw, still-encoded image bytes selected for diagnosis.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub source: AssetSource,
}

impl ImageAsset {
    pub fn sample(index: SampleIndex, bytes: Vec<u8>) -> Self {
        ImageAsset { bytes, source: AssetSource::Sample(index) }
    }

    pub fn upload(bytes: Vec<u8>) -> Self {
        ImageAsset { bytes, source: AssetSource::Upload }
    }

    pub fn sample_index(&self) -> Option<SampleIndex> {
        match self.source {
            AssetSource::Sample(i) => Some(i),
            AssetSource::Upload    => None,
        }
    }

    /// Best-effort MIME type sniffed from the leading bytes, for serving the
    /// asset back to a browser preview.
    pub fn content_type(&self) -> &'static str {
        match image::guess_format(&self.bytes) {
            Ok(image::ImageFormat::Png)  => "image/png",
            Ok(image::ImageFormat::Jpeg) => "image/jpeg",
            Ok(image::ImageFormat::Gif)  => "image/gif",
            Ok(image::ImageFormat::Bmp)  => "image/bmp",
            _                            => "application/octet-stream",
        }
    }
}

// Keep multi-megabyte payloads out of debug logs.
impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("source", &self.source)
            .field("len", &self.bytes.len())
            .finish()
    }
}
