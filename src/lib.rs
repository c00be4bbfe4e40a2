pub mod error;
pub mod config;
pub mod logging;
pub mod catalog;
pub mod acquisition;
pub mod normalize;
pub mod extract;
pub mod inference;
pub mod router;
pub mod workflow;

// Convenience re-exports
pub use error::{DiagnoseError, Result};
pub use config::DiagnoseConfig;
pub use catalog::{Disease, SampleCatalog, SampleIndex};
pub use acquisition::{AssetSource, DiagnosisSession, ImageAsset};
pub use normalize::{CanonicalRaster, Normalizer, ResampleFilter};
pub use extract::{extract, PixelTensor};
pub use inference::{InferenceClient, PredictionResponse, Predictor};
pub use router::{route, NavigationTarget};
pub use workflow::{Diagnosis, DiagnosisWorkflow, PendingRequest, SubmitJob, WorkflowState};
