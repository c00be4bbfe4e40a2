pub mod normalizer;
pub mod raster;

pub use normalizer::{Normalizer, ResampleFilter};
pub use raster::{CanonicalRaster, CANONICAL_SIZE};
