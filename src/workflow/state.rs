use crate::acquisition::{AssetSource, ImageAsset};
use crate::error::Result;
use crate::extract::{extract, PixelTensor};
use crate::inference::PredictionResponse;
use crate::normalize::Normalizer;
use crate::router::NavigationTarget;

/// Where a diagnosis attempt currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    /// No active image.
    Idle,
    /// An image is active and can be submitted.
    AssetSelected,
    /// Decoding and resampling the active image for attempt `attempt`.
    Normalizing { attempt: u64 },
    /// The pixel tensor is built and about to be sent.
    TensorReady,
    /// Waiting on the prediction service for attempt `attempt`.
    RequestInFlight { attempt: u64 },
    /// The service answered and a route was derived.
    Completed { target: NavigationTarget },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle                  => "idle",
            WorkflowState::AssetSelected         => "asset_selected",
            WorkflowState::Normalizing { .. }    => "normalizing",
            WorkflowState::TensorReady           => "tensor_ready",
            WorkflowState::RequestInFlight { .. } => "request_in_flight",
            WorkflowState::Completed { .. }      => "completed",
        }
    }

    /// An attempt owns the workflow: it is being normalized or is waiting on
    /// the prediction service.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, WorkflowState::Normalizing { .. } | WorkflowState::RequestInFlight { .. })
    }
}

/// A copy of the active image handed out by `begin_submit`.
///
/// It owns everything needed to build the tensor, so the decode can run
/// without borrowing the workflow. The result goes back through
/// `tensor_ready`.
#[derive(Debug)]
pub struct SubmitJob {
    pub(crate) attempt: u64,
    pub(crate) asset: ImageAsset,
    pub(crate) normalizer: Normalizer,
}

impl SubmitJob {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn source(&self) -> AssetSource {
        self.asset.source
    }

    /// Decodes, stretches and extracts the copied image.
    pub fn build_tensor(&self) -> Result<PixelTensor> {
        let raster = self.normalizer.normalize(&self.asset)?;
        Ok(extract(&raster))
    }
}

/// A tensor handed out by `tensor_ready`, to be sent and then passed back to
/// `finish_submit` together with the service's answer.
#[derive(Debug)]
pub struct PendingRequest {
    pub(crate) attempt: u64,
    pub(crate) tensor: PixelTensor,
}

impl PendingRequest {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn tensor(&self) -> &PixelTensor {
        &self.tensor
    }
}

/// Outcome of a completed attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub target: NavigationTarget,
    pub response: PredictionResponse,
    pub source: AssetSource,
}
