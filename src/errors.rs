//! Error types for capture session operations.
//!
//! Every failure in this crate is recoverable: it is surfaced to the caller as
//! a single user-visible message and the user re-triggers the operation.
//! Nothing here is fatal to the process, and camera and location failures are
//! independent of each other.

/// Errors that can occur during device enumeration, stream management,
/// frame capture, or location fetch.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Camera access was denied by the user or platform policy
    #[error("camera permission denied. Grant camera access in your system's privacy settings and try again")]
    PermissionDenied,

    /// The requested camera does not exist in the current device set
    #[error("camera not found: {requested}. Re-enumerate devices to see what is currently available")]
    DeviceNotFound {
        /// What the caller asked for (device id or facing description)
        requested: String,
    },

    /// The camera is held by another consumer, or a stream is already open
    #[error("camera device is busy: {reason}")]
    DeviceBusy { reason: String },

    /// Capture was requested without a live, frame-producing stream
    #[error("no active camera stream. Open a camera and wait for it to produce frames before capturing")]
    NoActiveStream,

    /// The platform could not produce a location fix
    #[error("location unavailable: {reason}")]
    PositionUnavailable { reason: String },

    /// The platform offers no such capability at all
    #[error("{capability} is not supported on this platform")]
    Unsupported { capability: String },

    /// Listing input devices failed
    #[error("failed to enumerate camera devices: {reason}")]
    DeviceEnumerationError { reason: String },

    /// The session was torn down; no further camera operations are accepted
    #[error("capture session is closed")]
    SessionClosed,
}

impl SessionError {
    /// Shorthand for an [`SessionError::Unsupported`] error.
    pub fn unsupported(capability: impl Into<String>) -> Self {
        SessionError::Unsupported {
            capability: capability.into(),
        }
    }

    /// Shorthand for a [`SessionError::PositionUnavailable`] error.
    pub fn position_unavailable(reason: impl Into<String>) -> Self {
        SessionError::PositionUnavailable {
            reason: reason.into(),
        }
    }
}
