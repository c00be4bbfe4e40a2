use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;
use image::ImageFormat;
use tracing::debug;

use crate::acquisition::ImageAsset;
use crate::error::{DiagnoseError, Result};
use crate::normalize::raster::{CanonicalRaster, CANONICAL_SIZE};

/// Interpolation used when stretching the decoded image to 256×256.
///
/// - `Nearest`    — copies the closest source pixel; sharpest, aliases on downscale.
/// - `Triangle`   — bilinear; close to what a browser canvas does. Default.
/// - `CatmullRom` — bicubic.
/// - `Gaussian`   — soft, suppresses JPEG noise.
/// - `Lanczos3`   — highest quality, slowest.
///
/// All of them are deterministic: identical bytes give identical rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest    => FilterType::Nearest,
            ResampleFilter::Triangle   => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian   => FilterType::Gaussian,
            ResampleFilter::Lanczos3   => FilterType::Lanczos3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResampleFilter::Nearest    => "nearest",
            ResampleFilter::Triangle   => "triangle",
            ResampleFilter::CatmullRom => "catmull-rom",
            ResampleFilter::Gaussian   => "gaussian",
            ResampleFilter::Lanczos3   => "lanczos3",
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResampleFilter {
    type Err = DiagnoseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest"                             => Ok(ResampleFilter::Nearest),
            "triangle" | "bilinear"               => Ok(ResampleFilter::Triangle),
            "catmull-rom" | "catmullrom" | "bicubic" => Ok(ResampleFilter::CatmullRom),
            "gaussian"                            => Ok(ResampleFilter::Gaussian),
            "lanczos3" | "lanczos"                => Ok(ResampleFilter::Lanczos3),
            other => Err(DiagnoseError::Config(format!("unknown resample filter '{}'", other))),
        }
    }
}

/// Formats the decoder accepts; anything else is a decode error.
const SUPPORTED_FORMATS: [ImageFormat; 4] =
    [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp, ImageFormat::Gif];

/// Decodes image bytes and stretches them to the canonical 256×256 raster.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    filter: ResampleFilter,
}

impl Normalizer {
    pub fn new(filter: ResampleFilter) -> Self {
        Normalizer { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    pub fn normalize(&self, asset: &ImageAsset) -> Result<CanonicalRaster> {
        self.normalize_bytes(&asset.bytes)
    }

    /// Decodes `bytes` at native resolution and resamples to 256×256 without
    /// preserving aspect ratio.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Result<CanonicalRaster> {
        let format = image::guess_format(bytes)
            .map_err(|e| DiagnoseError::DecodeError(e.to_string()))?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(DiagnoseError::DecodeError(format!("unsupported image format {:?}", format)));
        }

        let img = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| DiagnoseError::DecodeError(e.to_string()))?;
        debug!(?format, width = img.width(), height = img.height(), filter = %self.filter, "decoded image");

        let resized = img.resize_exact(CANONICAL_SIZE, CANONICAL_SIZE, self.filter.filter_type());
        CanonicalRaster::from_rgba(resized.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(img: RgbImage, format: ImageOutputFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
        })
    }

    #[test]
    fn any_size_becomes_canonical() {
        let normalizer = Normalizer::default();
        for &(w, h) in &[(1, 1), (17, 300), (512, 384), (256, 256), (1000, 20)] {
            let bytes = encode(gradient(w, h), ImageOutputFormat::Png);
            let raster = normalizer.normalize_bytes(&bytes).unwrap();
            assert_eq!((raster.width(), raster.height()), (256, 256), "source {}x{}", w, h);
        }
    }

    #[test]
    fn jpeg_is_accepted() {
        let bytes = encode(gradient(64, 48), ImageOutputFormat::Jpeg(90));
        let raster = Normalizer::default().normalize_bytes(&bytes).unwrap();
        assert_eq!(raster.width(), 256);
    }

    #[test]
    fn deterministic_for_every_filter() {
        let bytes = encode(gradient(300, 200), ImageOutputFormat::Png);
        for filter in [
            ResampleFilter::Nearest,
            ResampleFilter::Triangle,
            ResampleFilter::CatmullRom,
            ResampleFilter::Gaussian,
            ResampleFilter::Lanczos3,
        ] {
            let n = Normalizer::new(filter);
            assert_eq!(n.normalize_bytes(&bytes).unwrap(), n.normalize_bytes(&bytes).unwrap());
        }
    }

    #[test]
    fn stretches_instead_of_cropping() {
        // Four solid quadrants; a crop or letterbox would lose or shift one.
        let src = RgbImage::from_fn(512, 384, |x, y| match (x < 256, y < 192) {
            (true, true)   => Rgb([255, 0, 0]),
            (false, true)  => Rgb([0, 255, 0]),
            (true, false)  => Rgb([0, 0, 255]),
            (false, false) => Rgb([255, 255, 0]),
        });
        let bytes = encode(src, ImageOutputFormat::Png);
        let raster = Normalizer::new(ResampleFilter::Nearest).normalize_bytes(&bytes).unwrap();

        assert_eq!(raster.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(raster.pixel(255, 0), [0, 255, 0, 255]);
        assert_eq!(raster.pixel(0, 255), [0, 0, 255, 255]);
        assert_eq!(raster.pixel(255, 255), [255, 255, 0, 255]);
        assert_eq!(raster.pixel(64, 64), [255, 0, 0, 255]);
        assert_eq!(raster.pixel(192, 64), [0, 255, 0, 255]);
        assert_eq!(raster.pixel(64, 192), [0, 0, 255, 255]);
        assert_eq!(raster.pixel(192, 192), [255, 255, 0, 255]);
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = Normalizer::default().normalize_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DiagnoseError::DecodeError(_)));
    }

    #[test]
    fn truncated_png_is_decode_error() {
        let bytes = encode(gradient(64, 64), ImageOutputFormat::Png);
        let err = Normalizer::default().normalize_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, DiagnoseError::DecodeError(_)));
    }

    #[test]
    fn filter_names_parse() {
        assert_eq!("bilinear".parse::<ResampleFilter>().unwrap(), ResampleFilter::Triangle);
        assert_eq!("Lanczos3".parse::<ResampleFilter>().unwrap(), ResampleFilter::Lanczos3);
        assert!(matches!("cubicle".parse::<ResampleFilter>(), Err(DiagnoseError::Config(_))));
        for f in ["nearest", "triangle", "catmull-rom", "gaussian", "lanczos3"] {
            assert_eq!(f.parse::<ResampleFilter>().unwrap().name(), f);
        }
    }
}
