pub mod tensor;

pub use tensor::{extract, PixelTensor, Rgb};
