//! Platform collaborator traits.
//!
//! The session core never talks to camera or location hardware directly. It
//! consumes three platform capabilities through these traits: input device
//! enumeration, media stream acquisition, and one-shot geolocation. Tests
//! implement them with in-memory mocks; a production embedding wires them to
//! whatever the host platform provides.

use crate::errors::SessionError;
use crate::types::{CameraDevice, Coordinates, Facing, RawFrame};

/// Constraints passed to the platform when acquiring a stream.
///
/// `Facing` asks the platform to pick a matching device itself (the preferred
/// path, when the platform understands facing modes); `ExactDevice` pins a
/// specific id from a previous enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamConstraint {
    /// Open exactly this device id
    ExactDevice(String),
    /// Let the platform pick any device with this facing
    Facing(Facing),
}

/// Lists the camera input devices currently available.
pub trait DeviceEnumerator {
    /// Return the current device set.
    ///
    /// Must be callable repeatedly; results are never cached by the core.
    /// Labels may be empty strings until camera permission has been granted
    /// at least once.
    ///
    /// # Errors
    /// * `SessionError::PermissionDenied` - enumeration itself was denied
    /// * `SessionError::DeviceEnumerationError` - the platform query failed
    async fn enumerate(&self) -> Result<Vec<CameraDevice>, SessionError>;
}

/// An active camera stream resource.
///
/// At most one handle is live at any time; the stream manager owns it
/// exclusively and stops its tracks before acquiring a replacement.
pub trait StreamHandle {
    /// Id of the device this stream was opened on.
    fn device_id(&self) -> &str;

    /// Intrinsic frame size of the live video, `(0, 0)` until the stream
    /// actually produces frames.
    fn frame_size(&self) -> (u32, u32);

    /// The most recent frame, if the stream is producing any.
    fn current_frame(&self) -> Option<RawFrame>;

    /// Stop every media track, releasing the underlying device.
    ///
    /// Synchronous and idempotent: when this returns, the device lock is
    /// released and a subsequent acquire may proceed.
    fn stop_tracks(&mut self);
}

/// Acquires live camera streams from the platform.
pub trait StreamSource {
    /// The stream resource this source produces.
    type Handle: StreamHandle;

    /// Request a live stream matching the constraint.
    ///
    /// # Errors
    /// * `SessionError::PermissionDenied` - camera access denied
    /// * `SessionError::DeviceNotFound` - no device matches the constraint
    /// * `SessionError::DeviceBusy` - the device is held elsewhere
    /// * `SessionError::Unsupported` - the platform cannot honor a facing
    ///   constraint at all
    async fn acquire(&self, constraint: &StreamConstraint)
        -> Result<Self::Handle, SessionError>;
}

/// Produces one-shot device locations.
pub trait Locator {
    /// Fetch the current position once (not a continuous watch).
    ///
    /// # Errors
    /// * `SessionError::Unsupported` - the platform has no location capability
    /// * `SessionError::PermissionDenied` - location access denied
    /// * `SessionError::PositionUnavailable` - the fix could not be obtained
    async fn current_position(&self) -> Result<Coordinates, SessionError>;
}
