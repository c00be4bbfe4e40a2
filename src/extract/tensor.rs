use serde::{Deserialize, Serialize};

use crate::normalize::CanonicalRaster;

/// One pixel on the wire: `[r, g, b]`.
pub type Rgb = [u8; 3];

/// Row-major pixel tensor: `rows[y][x] = [r, g, b]`.
///
/// Serializes transparently to the nested JSON array the prediction service
/// expects (`[[[r,g,b], ...], ...]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixelTensor {
    rows: Vec<Vec<Rgb>>,
}

impl PixelTensor {
    /// Number of rows (image height).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of triples per row (image width).
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// `(rows, columns, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height(), self.width(), 3)
    }

    pub fn get(&self, y: usize, x: usize) -> Option<Rgb> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn rows(&self) -> &[Vec<Rgb>] {
        &self.rows
    }
}

/// Converts the canonical raster into a row-major tensor, dropping alpha.
///
/// Outer index is `y` (top to bottom), inner index is `x` (left to right);
/// swapping them would feed the model a transposed image.
pub fn extract(raster: &CanonicalRaster) -> PixelTensor {
    let img = raster.as_image();
    let rows = img
        .rows()
        .map(|row| row.map(|p| [p.0[0], p.0[1], p.0[2]]).collect::<Vec<Rgb>>())
        .collect();
    PixelTensor { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::CANONICAL_SIZE;
    use image::{Rgba, RgbaImage};

    fn patterned_raster() -> CanonicalRaster {
        let img = RgbaImage::from_fn(CANONICAL_SIZE, CANONICAL_SIZE, |x, y| {
            Rgba([x as u8, y as u8, (x ^ y) as u8, 7])
        });
        CanonicalRaster::from_rgba(img).unwrap()
    }

    #[test]
    fn shape_is_256_by_256_by_3() {
        let tensor = extract(&patterned_raster());
        assert_eq!(tensor.shape(), (256, 256, 3));
        assert!(tensor.rows().iter().all(|row| row.len() == 256));
    }

    #[test]
    fn tensor_y_x_matches_raster_x_y() {
        let raster = patterned_raster();
        let tensor = extract(&raster);
        for y in 0..CANONICAL_SIZE {
            for x in 0..CANONICAL_SIZE {
                let [r, g, b, _] = raster.pixel(x, y);
                assert_eq!(tensor.get(y as usize, x as usize), Some([r, g, b]));
            }
        }
    }

    #[test]
    fn asymmetric_pixel_is_not_transposed() {
        let mut img = RgbaImage::new(CANONICAL_SIZE, CANONICAL_SIZE);
        img.put_pixel(200, 3, Rgba([9, 8, 7, 255]));
        let tensor = extract(&CanonicalRaster::from_rgba(img).unwrap());
        assert_eq!(tensor.get(3, 200), Some([9, 8, 7]));
        assert_eq!(tensor.get(200, 3), Some([0, 0, 0]));
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let tensor = extract(&patterned_raster());
        let json = serde_json::to_value(&tensor).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 256);
        assert_eq!(rows[5].as_array().unwrap().len(), 256);
        assert_eq!(rows[5][9], serde_json::json!([9, 5, 12]));
    }
}
