use std::path::PathBuf;

use thiserror::Error;

/// Every way a diagnosis attempt can fail.
///
/// The workflow recovers each of these at its boundary: the attempt returns to
/// `Idle` and `user_message()` is what the presentation layer shows.
#[derive(Debug, Error)]
pub enum DiagnoseError {
    /// Submit was pressed with no active image.
    #[error("no image selected")]
    NoImageSelected,

    /// The active image bytes could not be decoded.
    #[error("image decode error: {0}")]
    DecodeError(String),

    /// Transport failure, timeout, or a non-2xx status from the prediction service.
    #[error("network error: {reason}")]
    NetworkError {
        reason: String,
        status: Option<u16>,
    },

    /// The prediction service answered with something other than a usable array.
    #[error("invalid prediction response: {0}")]
    InvalidResponse(String),

    /// Sample index outside the catalog.
    #[error("sample index {0} is out of range (expected 0-9)")]
    InvalidSample(usize),

    /// A catalog image could not be read from disk.
    #[error("sample image '{}' unavailable: {source}", path.display())]
    SampleUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A user-supplied image file could not be opened.
    #[error("cannot read '{}': {source}", path.display())]
    ImageUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A request for this session is already outstanding.
    #[error("a diagnosis request is already in flight")]
    Busy,

    #[error("configuration error: {0}")]
    Config(String),
}

impl DiagnoseError {
    pub fn network(reason: impl Into<String>) -> Self {
        DiagnoseError::NetworkError { reason: reason.into(), status: None }
    }

    pub fn http_status(status: u16, status_text: &str) -> Self {
        DiagnoseError::NetworkError {
            reason: format!("prediction service returned {} {}", status, status_text),
            status: Some(status),
        }
    }

    /// Short text suitable for an alert or flash box.
    pub fn user_message(&self) -> String {
        match self {
            DiagnoseError::NoImageSelected => "Please submit a valid image.".to_owned(),
            DiagnoseError::DecodeError(_) => {
                "The selected file could not be read as an image. Try a JPEG or PNG photo.".to_owned()
            }
            DiagnoseError::NetworkError { status: Some(code), .. } => {
                format!("The diagnosis service returned an error (HTTP {}). Please try again.", code)
            }
            DiagnoseError::NetworkError { status: None, .. } => {
                "Could not reach the diagnosis service. Check your connection and try again.".to_owned()
            }
            DiagnoseError::InvalidResponse(_) => {
                "The diagnosis service sent an unexpected answer. Please try again.".to_owned()
            }
            DiagnoseError::InvalidSample(i) => format!("Sample {} does not exist.", i),
            DiagnoseError::SampleUnavailable { .. } => "That sample image is unavailable.".to_owned(),
            DiagnoseError::ImageUnreadable { path, .. } => format!("Could not open {}.", path.display()),
            DiagnoseError::Busy => "A diagnosis is already running. Please wait for it to finish.".to_owned(),
            DiagnoseError::Config(reason) => format!("Configuration error: {}", reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiagnoseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_image_message_matches_form_alert() {
        assert_eq!(DiagnoseError::NoImageSelected.user_message(), "Please submit a valid image.");
    }

    #[test]
    fn http_status_carries_code() {
        let err = DiagnoseError::http_status(503, "Service Unavailable");
        match &err {
            DiagnoseError::NetworkError { status, .. } => assert_eq!(*status, Some(503)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(err.user_message().contains("503"));
        assert!(err.to_string().contains("503 Service Unavailable"));
    }

    #[test]
    fn unreadable_file_is_not_reported_as_decode_failure() {
        let err = DiagnoseError::ImageUnreadable {
            path: PathBuf::from("missing/leaf.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.user_message(), "Could not open missing/leaf.jpg.");
        assert!(!err.user_message().contains("as an image"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
