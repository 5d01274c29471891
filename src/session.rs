//! The capture session facade.
//!
//! [`CaptureSession`] wires the three platform collaborators together and is
//! the only state holder: current stream, last capture, last location fix.
//! The presentation layer drives it through awaitable operations and reads
//! the display model back through accessors. All camera state lives here in
//! explicit transition functions rather than in ambient variables captured by
//! callbacks.

use futures_util::future;

use crate::capture::capture_frame;
use crate::config::{LocationConfig, SessionConfig};
use crate::errors::SessionError;
use crate::location::fetch_one_shot;
use crate::platform::{DeviceEnumerator, Locator, StreamConstraint, StreamSource};
use crate::stream::{resolve_selector, StreamManager, StreamState};
use crate::types::{CameraDevice, CameraSelector, CaptureResult, LocationFix};

/// A single capture-and-preview session over one camera and one location fix.
///
/// Owns the active stream exclusively; no other component holds or mutates
/// it. Dropping the session stops any open stream's tracks, whichever exit
/// path got here.
pub struct CaptureSession<E, S, L>
where
    E: DeviceEnumerator,
    S: StreamSource,
    L: Locator,
{
    enumerator: E,
    streams: StreamManager<S>,
    locator: L,
    config: SessionConfig,
    last_capture: Option<CaptureResult>,
    last_fix: Option<LocationFix>,
}

impl<E, S, L> CaptureSession<E, S, L>
where
    E: DeviceEnumerator,
    S: StreamSource,
    L: Locator,
{
    /// Create a session over the given platform collaborators.
    pub fn new(enumerator: E, source: S, locator: L, config: SessionConfig) -> Self {
        Self {
            enumerator,
            streams: StreamManager::new(source),
            locator,
            config,
            last_capture: None,
            last_fix: None,
        }
    }

    /// List the camera devices currently available.
    ///
    /// Enumerates fresh on every call and normalizes facing hints from labels
    /// where the platform reported none.
    ///
    /// # Errors
    /// * `SessionError::PermissionDenied` / `SessionError::DeviceEnumerationError`
    pub async fn list_devices(&self) -> Result<Vec<CameraDevice>, SessionError> {
        list_normalized(&self.enumerator).await
    }

    /// Open the configured camera and fetch a location fix, in parallel.
    ///
    /// This is the session's mount flow: both platform requests run
    /// concurrently and are merged when both complete. A location failure is
    /// logged and recorded as "no fix" but never fails the call; a camera
    /// failure is returned.
    ///
    /// # Errors
    /// Camera-access errors from opening the configured camera.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        let selector = self.config.camera.selector();
        let camera = open_resolved(&mut self.streams, &self.enumerator, &selector);
        let location = maybe_locate(&self.locator, &self.config.location);

        let (camera_result, location_result) = future::join(camera, location).await;

        match location_result {
            Some(Ok(fix)) => self.last_fix = Some(fix),
            Some(Err(e)) => log::warn!("starting without location fix: {}", e),
            None => log::debug!("location fetch disabled by config"),
        }

        camera_result
    }

    /// Open a camera for the given selector. Valid only while no stream is
    /// open.
    ///
    /// A facing selector is first requested from the platform as an explicit
    /// capability; if the platform cannot honor it, the device list is
    /// consulted and labels/positions decide instead.
    ///
    /// # Errors
    /// * `SessionError::DeviceBusy` - a stream is already open
    /// * `SessionError::DeviceNotFound` - nothing matches the selector
    /// * other camera-access errors from the platform
    pub async fn open(&mut self, selector: CameraSelector) -> Result<(), SessionError> {
        open_resolved(&mut self.streams, &self.enumerator, &selector).await
    }

    /// Switch the open stream to the camera the selector resolves to.
    ///
    /// The old handle's tracks are stopped before the new stream is
    /// requested. When the selector resolves to the already-active device, or
    /// no alternate device exists, this is a no-op and the current stream
    /// stays open.
    ///
    /// # Errors
    /// * `SessionError::NoActiveStream` - no stream is open to switch from
    /// * camera-access errors from opening the new device
    pub async fn switch_camera(&mut self, selector: CameraSelector) -> Result<(), SessionError> {
        let Some(active) = self.streams.active_device_id().map(str::to_string) else {
            return Err(SessionError::NoActiveStream);
        };

        let devices = list_normalized(&self.enumerator).await?;
        match resolve_selector(&devices, &selector, Some(&active)) {
            None => {
                log::info!("no alternate camera for {}; keeping '{}'", selector, active);
                Ok(())
            }
            Some(device) if device.id == active => {
                log::debug!("{} resolves to the active device; nothing to do", selector);
                Ok(())
            }
            Some(device) => {
                let id = device.id.clone();
                self.streams
                    .switch_to(StreamConstraint::ExactDevice(id))
                    .await
            }
        }
    }

    /// Close the open stream. Idempotent.
    pub fn close(&mut self) {
        self.streams.close();
    }

    /// Snapshot the current video frame into a still image.
    ///
    /// The result supersedes the previous capture and is also returned.
    ///
    /// # Errors
    /// * `SessionError::NoActiveStream` - no open stream, or the stream is
    ///   not producing usable frames yet
    pub fn capture(&mut self) -> Result<CaptureResult, SessionError> {
        let handle = self.streams.handle().ok_or(SessionError::NoActiveStream)?;
        let result = capture_frame(handle)?;
        self.last_capture = Some(result.clone());
        Ok(result)
    }

    /// Fetch a one-shot location fix and record it.
    ///
    /// A later fetch overwrites the previous fix; a failed fetch leaves it
    /// untouched. Camera state is never affected.
    ///
    /// # Errors
    /// * `SessionError::Unsupported` - location disabled or unavailable
    /// * `SessionError::PermissionDenied` / `SessionError::PositionUnavailable`
    pub async fn fetch_location(&mut self) -> Result<LocationFix, SessionError> {
        if !self.config.location.enabled {
            return Err(SessionError::unsupported("geolocation"));
        }
        let fix = fetch_one_shot(&self.locator, self.config.location.timeout()).await?;
        self.last_fix = Some(fix);
        Ok(fix)
    }

    /// Current stream-manager state.
    pub fn state(&self) -> StreamState {
        self.streams.state()
    }

    /// Id of the device the open stream runs on, if any.
    pub fn active_device_id(&self) -> Option<&str> {
        self.streams.active_device_id()
    }

    /// The most recent capture, if any.
    pub fn last_capture(&self) -> Option<&CaptureResult> {
        self.last_capture.as_ref()
    }

    /// The most recent location fix, if any.
    pub fn last_location(&self) -> Option<&LocationFix> {
        self.last_fix.as_ref()
    }

    /// End the session: stop any open stream's tracks and refuse further
    /// camera operations. Display artifacts remain readable.
    pub fn shutdown(&mut self) {
        log::info!("capture session shutting down");
        self.streams.shutdown();
    }
}

/// Enumerate and normalize facing hints from labels.
async fn list_normalized<E: DeviceEnumerator>(
    enumerator: &E,
) -> Result<Vec<CameraDevice>, SessionError> {
    let devices = enumerator.enumerate().await?;
    Ok(devices
        .into_iter()
        .map(CameraDevice::with_inferred_facing)
        .collect())
}

/// Open a stream for a selector, facing-mode capability first.
///
/// An explicit device id goes straight to the platform. A facing preference
/// is requested as a facing-mode constraint; only when the platform reports
/// it cannot satisfy that (`DeviceNotFound` / `Unsupported`) does label and
/// positional selection against the enumeration take over.
async fn open_resolved<E, S>(
    streams: &mut StreamManager<S>,
    enumerator: &E,
    selector: &CameraSelector,
) -> Result<(), SessionError>
where
    E: DeviceEnumerator,
    S: StreamSource,
{
    match selector {
        CameraSelector::DeviceId(id) => {
            streams
                .open(StreamConstraint::ExactDevice(id.clone()))
                .await
        }
        CameraSelector::Facing(facing) => {
            match streams.open(StreamConstraint::Facing(*facing)).await {
                Err(SessionError::DeviceNotFound { .. }) | Err(SessionError::Unsupported { .. }) => {
                    log::debug!(
                        "platform could not satisfy facing '{}', resolving via device list",
                        facing
                    );
                    let devices = list_normalized(enumerator).await?;
                    let device = resolve_selector(&devices, selector, None).ok_or_else(|| {
                        SessionError::DeviceNotFound {
                            requested: selector.to_string(),
                        }
                    })?;
                    let id = device.id.clone();
                    streams.open(StreamConstraint::ExactDevice(id)).await
                }
                other => other,
            }
        }
    }
}

/// Run the one-shot location fetch unless disabled by config.
async fn maybe_locate<L: Locator>(
    locator: &L,
    config: &LocationConfig,
) -> Option<Result<LocationFix, SessionError>> {
    if !config.enabled {
        return None;
    }
    Some(fetch_one_shot(locator, config.timeout()).await)
}
