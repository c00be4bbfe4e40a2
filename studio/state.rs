use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use paddy_diagnose::{DiagnosisWorkflow, Predictor};

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum FlashKind { Success, Error }

#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Mutable state
// ---------------------------------------------------------------------------

pub struct StudioState {
    /// Active image slot and attempt lifecycle.
    pub workflow: DiagnosisWorkflow,
    /// One-shot success message for the next page render.
    pub flash: Option<FlashMessage>,
}

impl StudioState {
    pub fn new(workflow: DiagnosisWorkflow) -> Self {
        StudioState { workflow, flash: None }
    }

    /// Takes the pending message, clearing it. Workflow errors win over
    /// success notices.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        match self.workflow.take_message() {
            Some(text) => {
                self.flash = None;
                Some(FlashMessage::error(text))
            }
            None => self.flash.take(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

/// Everything a handler needs. The predictor lives outside the mutex so a
/// slow prediction never blocks page loads.
pub struct Studio {
    pub state: Mutex<StudioState>,
    pub predictor: Box<dyn Predictor>,
    pub max_upload_bytes: usize,
}

impl Studio {
    /// Locks the mutable state, recovering it if a handler thread panicked.
    pub fn lock(&self) -> MutexGuard<'_, StudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared state type — an `Arc<Studio>` passed to every handler.
pub type SharedState = Arc<Studio>;
