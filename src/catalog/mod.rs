pub mod disease;
pub mod sample;

pub use disease::Disease;
pub use sample::{SampleCatalog, SampleIndex, SAMPLE_COUNT};
