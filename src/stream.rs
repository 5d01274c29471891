//! Stream lifecycle management.
//!
//! The stream manager owns the single active [`StreamHandle`] and enforces the
//! one correctness property that matters here: a new stream is never requested
//! while the old handle is still live. Every switch goes
//! `Open -> Closing -> Idle -> Opening -> Open`, with all tracks of the old
//! handle stopped before the new acquire is issued. Holding two camera locks
//! at once makes the open request fail or silently reuse the stale stream on
//! many platforms.

use std::mem;

use crate::errors::SessionError;
use crate::platform::{StreamConstraint, StreamHandle, StreamSource};
use crate::types::{CameraDevice, CameraSelector};

/// Observable lifecycle state of the stream manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No stream open, ready to open one
    Idle,
    /// An acquire request is in flight
    Opening,
    /// A stream is live
    Open,
    /// The old handle's tracks are being stopped
    Closing,
}

/// Internal slot holding the handle while open.
enum Slot<H> {
    Idle,
    Opening,
    Open(H),
    Closing,
}

/// Owns the single active camera stream and sequences open/switch/close.
///
/// All transitions are strictly sequential: `close` completes (all tracks
/// stopped) before any subsequent `open` is issued. After [`shutdown`] the
/// manager refuses further opens and any handle that still arrives is stopped
/// immediately.
///
/// [`shutdown`]: StreamManager::shutdown
pub struct StreamManager<S: StreamSource> {
    source: S,
    slot: Slot<S::Handle>,
    shut_down: bool,
}

impl<S: StreamSource> StreamManager<S> {
    /// Create a manager in the `Idle` state.
    pub fn new(source: S) -> Self {
        Self {
            source,
            slot: Slot::Idle,
            shut_down: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        match self.slot {
            Slot::Idle => StreamState::Idle,
            Slot::Opening => StreamState::Opening,
            Slot::Open(_) => StreamState::Open,
            Slot::Closing => StreamState::Closing,
        }
    }

    /// The live handle, if a stream is open.
    pub fn handle(&self) -> Option<&S::Handle> {
        match &self.slot {
            Slot::Open(handle) => Some(handle),
            _ => None,
        }
    }

    /// Id of the device the open stream runs on, if any.
    pub fn active_device_id(&self) -> Option<&str> {
        self.handle().map(StreamHandle::device_id)
    }

    /// Open a stream matching the constraint. Valid only from `Idle`.
    ///
    /// # Errors
    /// * `SessionError::SessionClosed` - the manager was shut down
    /// * `SessionError::DeviceBusy` - a stream is already open or in flight
    /// * camera-access errors from the platform (permission denied, device
    ///   not found, device busy)
    pub async fn open(&mut self, constraint: StreamConstraint) -> Result<(), SessionError> {
        if self.shut_down {
            return Err(SessionError::SessionClosed);
        }
        match self.slot {
            Slot::Idle => {}
            Slot::Open(_) => {
                return Err(SessionError::DeviceBusy {
                    reason: "a stream is already open; close or switch instead".to_string(),
                });
            }
            Slot::Opening | Slot::Closing => {
                return Err(SessionError::DeviceBusy {
                    reason: "a stream transition is already in progress".to_string(),
                });
            }
        }

        self.slot = Slot::Opening;
        log::debug!("acquiring stream for {:?}", constraint);

        match self.source.acquire(&constraint).await {
            Ok(mut handle) => {
                if self.shut_down {
                    // Late arrival after teardown: release immediately
                    log::warn!("stream arrived after shutdown, stopping tracks");
                    handle.stop_tracks();
                    self.slot = Slot::Idle;
                    return Err(SessionError::SessionClosed);
                }
                log::info!("stream open on device '{}'", handle.device_id());
                self.slot = Slot::Open(handle);
                Ok(())
            }
            Err(e) => {
                log::warn!("stream acquire failed: {}", e);
                self.slot = Slot::Idle;
                Err(e)
            }
        }
    }

    /// Switch the open stream to a different device.
    ///
    /// Stops every track of the old handle before the new acquire is issued.
    /// If the new acquire fails the manager ends `Idle` with the error; it
    /// does not reopen the old device (the user re-triggers the switch).
    ///
    /// # Errors
    /// * `SessionError::NoActiveStream` - no stream is open to switch from
    /// * everything [`open`](StreamManager::open) can return
    pub async fn switch_to(&mut self, constraint: StreamConstraint) -> Result<(), SessionError> {
        if !matches!(self.slot, Slot::Open(_)) {
            return Err(SessionError::NoActiveStream);
        }

        let Slot::Open(mut old) = mem::replace(&mut self.slot, Slot::Closing) else {
            unreachable!("slot checked to be Open above");
        };
        log::info!(
            "switching away from device '{}', stopping tracks",
            old.device_id()
        );
        // stop_tracks is synchronous: the old device lock is released here,
        // before the new acquire below is issued
        old.stop_tracks();
        drop(old);
        self.slot = Slot::Idle;

        self.open(constraint).await
    }

    /// Close the open stream, stopping all tracks. Idempotent: a no-op when
    /// already `Idle`.
    pub fn close(&mut self) {
        if let Slot::Open(mut handle) = mem::replace(&mut self.slot, Slot::Closing) {
            log::info!("closing stream on device '{}'", handle.device_id());
            handle.stop_tracks();
        }
        self.slot = Slot::Idle;
    }

    /// Tear the manager down: close any open stream and refuse further opens.
    pub fn shutdown(&mut self) {
        self.close();
        self.shut_down = true;
    }
}

impl<S: StreamSource> Drop for StreamManager<S> {
    fn drop(&mut self) {
        // Guaranteed release regardless of which exit path drops the manager
        self.close();
    }
}

/// Pick the device a selector refers to from the current enumeration.
///
/// Resolution order:
/// 1. an explicit id matches exactly, a facing preference matches the first
///    device with that facing;
/// 2. otherwise the next device in enumeration order different from the
///    currently active one (wrapping), so uninformative labels still let the
///    user cycle cameras;
/// 3. `None` when no alternate device exists at all - the caller treats a
///    switch as a no-op then.
pub fn resolve_selector<'a>(
    devices: &'a [CameraDevice],
    selector: &CameraSelector,
    active_id: Option<&str>,
) -> Option<&'a CameraDevice> {
    let exact = match selector {
        CameraSelector::DeviceId(id) => devices.iter().find(|d| &d.id == id),
        CameraSelector::Facing(facing) => devices.iter().find(|d| d.facing == *facing),
    };
    if let Some(device) = exact {
        return Some(device);
    }

    // Positional fallback: next device after the active one, wrapping
    match active_id {
        None => devices.first(),
        Some(active) => {
            let start = devices
                .iter()
                .position(|d| d.id == active)
                .map_or(0, |i| i + 1);
            devices
                .iter()
                .cycle()
                .skip(start)
                .take(devices.len())
                .find(|d| d.id != active)
        }
    }
}
