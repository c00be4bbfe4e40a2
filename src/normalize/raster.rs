use image::RgbaImage;

use crate::error::{DiagnoseError, Result};

/// Side length of the canonical raster fed to the model.
pub const CANONICAL_SIZE: u32 = 256;

/// A 256×256 RGBA8 raster: the pipeline's fixed working resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRaster {
    image: RgbaImage,
}

impl CanonicalRaster {
    /// Wraps an already-resampled image, rejecting any other size.
    pub fn from_rgba(image: RgbaImage) -> Result<Self> {
        if image.dimensions() != (CANONICAL_SIZE, CANONICAL_SIZE) {
            let (w, h) = image.dimensions();
            return Err(DiagnoseError::DecodeError(format!(
                "raster is {}x{}, expected {}x{}",
                w, h, CANONICAL_SIZE, CANONICAL_SIZE
            )));
        }
        Ok(CanonicalRaster { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}
