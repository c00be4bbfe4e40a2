use tracing::{debug, info, warn};

use crate::acquisition::DiagnosisSession;
use crate::catalog::SampleCatalog;
use crate::error::{DiagnoseError, Result};
use crate::extract::PixelTensor;
use crate::inference::{PredictionResponse, Predictor};
use crate::normalize::Normalizer;
use crate::router::route;
use crate::workflow::state::{Diagnosis, PendingRequest, SubmitJob, WorkflowState};

/// Drives one user's diagnosis attempts:
/// `Idle → AssetSelected → Normalizing → TensorReady → RequestInFlight → Completed`.
///
/// Every stage returns a `Result`; a failure sends the workflow back to `Idle`,
/// releases the active image and leaves a one-shot message for the page.
/// While a request is in flight, new selections and submissions are rejected
/// with `DiagnoseError::Busy`.
#[derive(Debug)]
pub struct DiagnosisWorkflow {
    catalog: SampleCatalog,
    normalizer: Normalizer,
    session: DiagnosisSession,
    state: WorkflowState,
    attempts: u64,
    /// One-shot user message for the next page render.
    message: Option<String>,
    last_diagnosis: Option<Diagnosis>,
}

impl DiagnosisWorkflow {
    pub fn new(catalog: SampleCatalog, normalizer: Normalizer) -> Self {
        DiagnosisWorkflow {
            catalog,
            normalizer,
            session: DiagnosisSession::new(),
            state: WorkflowState::Idle,
            attempts: 0,
            message: None,
            last_diagnosis: None,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn session(&self) -> &DiagnosisSession {
        &self.session
    }

    pub fn catalog(&self) -> &SampleCatalog {
        &self.catalog
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.is_in_flight()
    }

    pub fn last_diagnosis(&self) -> Option<&Diagnosis> {
        self.last_diagnosis.as_ref()
    }

    /// Takes and returns the pending user message, clearing it.
    pub fn take_message(&mut self) -> Option<String> {
        self.message.take()
    }

    // -----------------------------------------------------------------------
    // Acquisition
    // -----------------------------------------------------------------------

    /// Makes catalog sample `index` the active image.
    ///
    /// A bad index or unreadable sample leaves the previous selection in place.
    pub fn select_sample(&mut self, index: usize) -> Result<()> {
        self.ensure_idle_slot()?;
        match self.session.select_sample(&self.catalog, index) {
            Ok(_) => {
                self.state = WorkflowState::AssetSelected;
                Ok(())
            }
            Err(err) => {
                warn!(index, error = %err, "sample selection failed");
                self.message = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Makes an uploaded file the active image. Returns `false` when no file
    /// was provided, in which case nothing changes.
    pub fn select_upload(&mut self, file: Option<Vec<u8>>) -> Result<bool> {
        self.ensure_idle_slot()?;
        let selected = self.session.select_upload(file).is_some();
        if selected {
            self.state = WorkflowState::AssetSelected;
        }
        Ok(selected)
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Claims the workflow for a new attempt and hands out a copy of the
    /// active image.
    ///
    /// Normalization runs in `SubmitJob::build_tensor`, so a caller sharing the
    /// workflow behind a lock can release it for the decode. The tensor comes
    /// back through `tensor_ready`, which parks the workflow in
    /// `RequestInFlight`.
    pub fn begin_submit(&mut self) -> Result<SubmitJob> {
        if self.is_in_flight() {
            return Err(self.reject_busy());
        }
        let asset = match self.session.active() {
            Some(asset) => asset.clone(),
            None => return Err(self.fail(DiagnoseError::NoImageSelected)),
        };

        self.attempts += 1;
        let attempt = self.attempts;
        self.state = WorkflowState::Normalizing { attempt };
        Ok(SubmitJob { attempt, asset, normalizer: self.normalizer })
    }

    /// Accepts the tensor built for attempt `attempt`.
    pub fn tensor_ready(&mut self, attempt: u64, tensor: Result<PixelTensor>) -> Result<PendingRequest> {
        match self.state {
            WorkflowState::Normalizing { attempt: current } if current == attempt => {}
            _ => return Err(self.discard_stale(attempt)),
        }

        let tensor = match tensor {
            Ok(t) => t,
            Err(err) => return Err(self.fail(err)),
        };
        self.state = WorkflowState::TensorReady;
        debug!(shape = ?tensor.shape(), attempt, "tensor ready");

        self.state = WorkflowState::RequestInFlight { attempt };
        Ok(PendingRequest { attempt, tensor })
    }

    /// Completes attempt `attempt` with the service's answer.
    pub fn finish_submit(
        &mut self,
        attempt: u64,
        outcome: Result<PredictionResponse>,
    ) -> Result<Diagnosis> {
        match self.state {
            WorkflowState::RequestInFlight { attempt: current } if current == attempt => {}
            _ => return Err(self.discard_stale(attempt)),
        }

        let response = match outcome {
            Ok(r) => r,
            Err(err) => return Err(self.fail(err)),
        };
        let source = match self.session.active_source() {
            Some(s) => s,
            None => return Err(self.fail(DiagnoseError::NoImageSelected)),
        };

        let target = route(&response);
        info!(%target, attempt, "diagnosis complete");
        let diagnosis = Diagnosis { target: target.clone(), response, source };
        self.state = WorkflowState::Completed { target };
        self.last_diagnosis = Some(diagnosis.clone());
        Ok(diagnosis)
    }

    /// Runs a whole attempt against `predictor`.
    pub fn submit(&mut self, predictor: &dyn Predictor) -> Result<Diagnosis> {
        let job = self.begin_submit()?;
        let pending = self.tensor_ready(job.attempt(), job.build_tensor())?;
        let outcome = predictor.predict(pending.tensor());
        self.finish_submit(pending.attempt(), outcome)
    }

    // -----------------------------------------------------------------------
    // Recovery
    // -----------------------------------------------------------------------

    fn ensure_idle_slot(&mut self) -> Result<()> {
        if self.is_in_flight() {
            Err(self.reject_busy())
        } else {
            Ok(())
        }
    }

    fn discard_stale(&self, attempt: u64) -> DiagnoseError {
        warn!(attempt, state = self.state.name(), "stale attempt discarded");
        DiagnoseError::Busy
    }

    /// Rejects a request without touching the outstanding attempt.
    fn reject_busy(&mut self) -> DiagnoseError {
        let err = DiagnoseError::Busy;
        self.message = Some(err.user_message());
        err
    }

    fn fail(&mut self, err: DiagnoseError) -> DiagnoseError {
        warn!(state = self.state.name(), error = %err, "diagnosis attempt failed");
        self.session.clear();
        self.state = WorkflowState::Idle;
        self.message = Some(err.user_message());
        err
    }
}
