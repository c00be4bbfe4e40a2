pub mod client;
pub mod response;

pub use client::{InferenceClient, Predictor, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use response::PredictionResponse;
