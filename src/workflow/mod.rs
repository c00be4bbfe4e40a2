pub mod diagnosis;
pub mod state;

pub use diagnosis::DiagnosisWorkflow;
pub use state::{Diagnosis, PendingRequest, SubmitJob, WorkflowState};
