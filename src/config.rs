use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DiagnoseError, Result};
use crate::inference::{InferenceClient, DEFAULT_ENDPOINT};
use crate::normalize::{Normalizer, ResampleFilter};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SAMPLES_DIR: &str = "public/sample-paddies";
const DEFAULT_ADDR: &str = "127.0.0.1:7878";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Runtime settings shared by the CLI and the studio.
///
/// Environment variables:
/// - `PADDY_ENDPOINT`         — prediction service URL
/// - `PADDY_TIMEOUT_SECS`     — request timeout, clamped to 1..=300
/// - `PADDY_SAMPLES_DIR`      — directory holding `0.jpg` .. `9.jpg`
/// - `PADDY_RESAMPLE`         — `nearest`, `triangle`, `catmull-rom`, `gaussian`, `lanczos3`
/// - `PADDY_ADDR`             — studio bind address
/// - `PADDY_MAX_UPLOAD_BYTES` — studio request body cap
#[derive(Debug, Clone)]
pub struct DiagnoseConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub samples_dir: PathBuf,
    pub resample: ResampleFilter,
    pub addr: String,
    pub max_upload_bytes: usize,
}

impl Default for DiagnoseConfig {
    fn default() -> Self {
        DiagnoseConfig {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            samples_dir: PathBuf::from(DEFAULT_SAMPLES_DIR),
            resample: ResampleFilter::default(),
            addr: DEFAULT_ADDR.to_owned(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl DiagnoseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DiagnoseConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let endpoint = get("PADDY_ENDPOINT").unwrap_or(defaults.endpoint);

        let timeout = get("PADDY_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(clamp_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let samples_dir = get("PADDY_SAMPLES_DIR").map(PathBuf::from).unwrap_or(defaults.samples_dir);

        let resample = match get("PADDY_RESAMPLE") {
            Some(name) => name.parse::<ResampleFilter>()?,
            None => defaults.resample,
        };

        let addr = get("PADDY_ADDR").unwrap_or(defaults.addr);

        let max_upload_bytes = get("PADDY_MAX_UPLOAD_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_upload_bytes);

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(DiagnoseError::Config(format!("endpoint '{}' is not an http(s) URL", endpoint)));
        }

        Ok(DiagnoseConfig { endpoint, timeout, samples_dir, resample, addr, max_upload_bytes })
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.resample)
    }

    pub fn inference_client(&self) -> InferenceClient {
        InferenceClient::new(self.endpoint.clone(), self.timeout)
    }
}

fn clamp_timeout_secs(secs: u64) -> u64 {
    secs.clamp(1, 300)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<DiagnoseConfig> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        DiagnoseConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.endpoint, "https://api.art3m1s.me/paddy/predict");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.samples_dir, PathBuf::from("public/sample-paddies"));
        assert_eq!(cfg.resample, ResampleFilter::Triangle);
        assert_eq!(cfg.addr, "127.0.0.1:7878");
    }

    #[test]
    fn overrides_and_clamping() {
        let cfg = config_from(&[
            ("PADDY_ENDPOINT", "http://localhost:9000/predict"),
            ("PADDY_TIMEOUT_SECS", "9999"),
            ("PADDY_RESAMPLE", "nearest"),
            ("PADDY_MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:9000/predict");
        assert_eq!(cfg.timeout, Duration::from_secs(300));
        assert_eq!(cfg.resample, ResampleFilter::Nearest);
        assert_eq!(cfg.max_upload_bytes, 1024);
    }

    #[test]
    fn blank_and_unparsable_values_fall_back() {
        let cfg = config_from(&[("PADDY_TIMEOUT_SECS", "soon"), ("PADDY_SAMPLES_DIR", "  ")]).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.samples_dir, PathBuf::from("public/sample-paddies"));
    }

    #[test]
    fn bad_filter_and_endpoint_are_errors() {
        assert!(matches!(config_from(&[("PADDY_RESAMPLE", "blurry")]), Err(DiagnoseError::Config(_))));
        assert!(matches!(config_from(&[("PADDY_ENDPOINT", "ftp://x")]), Err(DiagnoseError::Config(_))));
    }
}
