//! Error types for sensor acquisition.
//!
//! All errors implement the `std::error::Error` trait and carry structured
//! context for debugging.
//!
//! ## Error Categories
//!
//! - **Device Errors**: the native sensor could not be opened
//! - **Native Errors**: a native call failed mid-session
//! - **Platform Errors**: the requested feature is unavailable on this OS
//!
//! This layer performs no recovery: a failed open aborts the acquisition
//! attempt before any frame is produced, and mid-session failures propagate
//! to the immediate caller. A modality that has produced no data yet is *not*
//! an error; it is represented as absence in the frame snapshot.
//!
//! ```rust
//! use kinect2::SensorError;
//!
//! let error = SensorError::device_unavailable("no kinect sensor found");
//! assert!(error.is_retryable());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use thiserror::Error;

/// Result type alias for sensor operations.
pub type Result<T, E = SensorError> = std::result::Result<T, E>;

/// Main error type for sensor acquisition.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SensorError {
    /// The native driver could not initialize a session. Fatal: there is no
    /// reconnect semantic at this layer.
    #[error("Failed to open sensor: {reason}")]
    DeviceUnavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A native call failed after the session was opened.
    #[error("Native sensor call failed: {operation}")]
    Native { operation: String },

    #[error("{feature} is only available on {required_platform}")]
    UnsupportedPlatform { feature: String, required_platform: String },
}

impl SensorError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// The acquisition layer itself never retries; this classification is for
    /// callers deciding whether opening a fresh session is worth attempting.
    pub fn is_retryable(&self) -> bool {
        match self {
            SensorError::DeviceUnavailable { .. } => true,
            SensorError::Native { .. } => false,
            SensorError::UnsupportedPlatform { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            SensorError::DeviceUnavailable { .. } => vec![
                "Check the sensor is plugged into a USB 3.0 port",
                "Verify the Kinect for Windows runtime is installed",
                "Ensure no other process holds the sensor open",
            ],
            SensorError::Native { .. } => vec![
                "Release the session and open a new one",
                "Check the sensor connection and power supply",
            ],
            SensorError::UnsupportedPlatform { .. } => vec![
                "Live acquisition requires Windows and the Kinect v2 runtime",
                "Use a scripted device for cross-platform development",
            ],
        }
    }

    /// Helper constructor for open failures.
    pub fn device_unavailable(reason: impl Into<String>) -> Self {
        SensorError::DeviceUnavailable { reason: reason.into(), source: None }
    }

    /// Helper constructor for open failures with an underlying source.
    pub fn device_unavailable_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        SensorError::DeviceUnavailable { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for mid-session native failures.
    pub fn native(operation: impl Into<String>) -> Self {
        SensorError::Native { operation: operation.into() }
    }

    /// Helper constructor for unsupported platform errors.
    pub fn unsupported_platform(
        feature: impl Into<String>,
        required_platform: impl Into<String>,
    ) -> Self {
        SensorError::UnsupportedPlatform {
            feature: feature.into(),
            required_platform: required_platform.into(),
        }
    }
}
