//! Error types for the rep counter
//!
//! Only acquisition failures are user-visible. Per-frame detector misses
//! are not errors at all and never reach this module.

use thiserror::Error;

/// Failures while bringing up the camera or the pose model.
///
/// `Clone` so the last failure can be kept in the session status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// User or browser policy refused camera access
    #[error("camera permission denied")]
    PermissionDenied,

    /// No camera matching the constraints
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// Camera exists but another application holds it
    #[error("camera busy: {0}")]
    DeviceBusy(String),

    /// Pose model failed to load or initialize
    #[error("pose model initialization failed: {0}")]
    ModelInit(String),

    /// Pose estimation call rejected mid-session
    #[error("pose estimation failed: {0}")]
    Estimation(String),
}

impl AcquisitionError {
    /// Classify a `getUserMedia` rejection by its `DOMException` name
    pub fn from_dom_exception(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" => AcquisitionError::PermissionDenied,
            "NotFoundError" | "OverconstrainedError" => {
                AcquisitionError::DeviceUnavailable(message.to_string())
            }
            "NotReadableError" | "AbortError" => AcquisitionError::DeviceBusy(message.to_string()),
            _ => AcquisitionError::DeviceUnavailable(format!("{name}: {message}")),
        }
    }
}

/// Invalid session configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Progress sink rejected a record
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("progress sink rejected record: {0}")]
    Rejected(String),

    #[error("progress record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Crate-level error
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Exercise identifier outside the supported set
    #[error("unknown exercise: {0}")]
    UnknownExercise(String),

    /// Browser API missing or misbehaving (window, canvas, GPU)
    #[error("browser environment: {0}")]
    Environment(String),
}

/// Convenience alias for results using the crate error
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for wasm_bindgen::JsValue {
    fn from(err: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquisition_error_wraps_transparently() {
        let err: Error = AcquisitionError::DeviceBusy("held by another tab".into()).into();
        assert_eq!(err.to_string(), "camera busy: held by another tab");
    }

    #[test]
    fn test_dom_exception_names() {
        assert_eq!(
            AcquisitionError::from_dom_exception("NotAllowedError", "denied"),
            AcquisitionError::PermissionDenied
        );
        assert_eq!(
            AcquisitionError::from_dom_exception("NotReadableError", "in use"),
            AcquisitionError::DeviceBusy("in use".into())
        );
        assert_eq!(
            AcquisitionError::from_dom_exception("OverconstrainedError", "width"),
            AcquisitionError::DeviceUnavailable("width".into())
        );
        assert_eq!(
            AcquisitionError::from_dom_exception("TypeError", "bad"),
            AcquisitionError::DeviceUnavailable("TypeError: bad".into())
        );
    }

    #[test]
    fn test_config_invalid_message_names_field() {
        let err = ConfigError::Invalid {
            field: "targetFps",
            reason: "must be positive".into(),
        };
        assert_eq!(err.to_string(), "invalid value for targetFps: must be positive");
    }
}
