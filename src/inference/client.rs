use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{DiagnoseError, Result};
use crate::extract::PixelTensor;
use crate::inference::response::PredictionResponse;

/// Public prediction endpoint of the paddy disease model.
pub const DEFAULT_ENDPOINT: &str = "https://api.art3m1s.me/paddy/predict";

/// Default upper bound on a single prediction request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can turn a pixel tensor into a prediction.
///
/// The workflow only depends on this trait; `InferenceClient` is the HTTP
/// implementation.
pub trait Predictor: Send + Sync {
    fn predict(&self, tensor: &PixelTensor) -> Result<PredictionResponse>;
}

/// Blocking HTTP client for the prediction service.
///
/// Each call issues exactly one `POST` with the tensor as a JSON body; there
/// are no retries.
pub struct InferenceClient {
    agent: ureq::Agent,
    endpoint: String,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        InferenceClient { agent, endpoint: endpoint.into(), timeout }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for InferenceClient {
    fn default() -> Self {
        InferenceClient::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }
}

impl Predictor for InferenceClient {
    fn predict(&self, tensor: &PixelTensor) -> Result<PredictionResponse> {
        let (rows, cols, _) = tensor.shape();
        debug!(endpoint = %self.endpoint, rows, cols, "posting tensor");
        let started = Instant::now();

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(tensor)
            .map_err(|err| match err {
                ureq::Error::Status(code, resp) => DiagnoseError::http_status(code, resp.status_text()),
                ureq::Error::Transport(transport) => DiagnoseError::network(transport.to_string()),
            })?;

        let body = response
            .into_string()
            .map_err(|e| DiagnoseError::network(format!("reading response body: {}", e)))?;
        let prediction = PredictionResponse::from_slice(body.as_bytes())?;

        info!(
            top = %prediction.top_id(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prediction received"
        );
        Ok(prediction)
    }
}
