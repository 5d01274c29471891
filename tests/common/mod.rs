//! Shared in-memory platform mocks for the integration tests.
//!
//! The mock stream source hands out handles that track whether their tracks
//! were stopped, and counts how many handles are live at once, so tests can
//! assert the close-before-open ordering the stream manager guarantees.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use geosnap::errors::SessionError;
use geosnap::platform::{DeviceEnumerator, Locator, StreamConstraint, StreamHandle, StreamSource};
use geosnap::types::{CameraDevice, Coordinates, Facing, RawFrame};

/// Build a device with the given id, label, and facing.
pub fn device(id: &str, label: &str, facing: Facing) -> CameraDevice {
    CameraDevice {
        id: id.to_string(),
        label: label.to_string(),
        facing,
    }
}

/// A solid RGB frame of the given size.
pub fn frame(width: u32, height: u32) -> RawFrame {
    RawFrame {
        data: vec![0x40; (width * height * 3) as usize],
        width,
        height,
    }
}

/// Observes stream acquisition across a whole test.
#[derive(Default)]
pub struct StreamProbe {
    live: AtomicUsize,
    max_live: AtomicUsize,
    acquires: AtomicUsize,
    /// Stopped flags of every handle handed out, in acquisition order
    stopped_flags: Mutex<Vec<Arc<AtomicBool>>>,
}

impl StreamProbe {
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously live handles ever observed.
    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    /// Whether the nth handle handed out has had its tracks stopped.
    pub fn stopped(&self, n: usize) -> bool {
        self.stopped_flags.lock().unwrap()[n].load(Ordering::SeqCst)
    }

    fn on_acquire(&self, stopped: Arc<AtomicBool>) {
        self.acquires.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
        self.stopped_flags.lock().unwrap().push(stopped);
    }

    fn on_release(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct MockHandle {
    device_id: String,
    frame: Option<RawFrame>,
    stopped: Arc<AtomicBool>,
    probe: Arc<StreamProbe>,
}

impl StreamHandle for MockHandle {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame.as_ref().map_or((0, 0), |f| (f.width, f.height))
    }

    fn current_frame(&self) -> Option<RawFrame> {
        self.frame.clone()
    }

    fn stop_tracks(&mut self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.probe.on_release();
        }
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

/// In-memory stream source over a fixed device set.
pub struct MockStreamSource {
    devices: Vec<CameraDevice>,
    frames: HashMap<String, RawFrame>,
    probe: Arc<StreamProbe>,
    /// Whether the platform understands facing-mode constraints
    facing_supported: bool,
    deny: bool,
}

impl MockStreamSource {
    pub fn new(devices: Vec<CameraDevice>) -> Self {
        Self {
            devices,
            frames: HashMap::new(),
            probe: Arc::new(StreamProbe::default()),
            facing_supported: true,
            deny: false,
        }
    }

    /// The frame every stream on `device_id` will yield.
    pub fn with_frame(mut self, device_id: &str, frame: RawFrame) -> Self {
        self.frames.insert(device_id.to_string(), frame);
        self
    }

    /// Make facing-mode constraints fail with `Unsupported`.
    pub fn without_facing_support(mut self) -> Self {
        self.facing_supported = false;
        self
    }

    /// Deny every acquire with `PermissionDenied`.
    pub fn denied(mut self) -> Self {
        self.deny = true;
        self
    }

    pub fn probe(&self) -> Arc<StreamProbe> {
        Arc::clone(&self.probe)
    }
}

impl StreamSource for MockStreamSource {
    type Handle = MockHandle;

    async fn acquire(&self, constraint: &StreamConstraint) -> Result<MockHandle, SessionError> {
        if self.deny {
            return Err(SessionError::PermissionDenied);
        }

        let device = match constraint {
            StreamConstraint::ExactDevice(id) => {
                self.devices.iter().find(|d| &d.id == id).ok_or_else(|| {
                    SessionError::DeviceNotFound {
                        requested: id.clone(),
                    }
                })?
            }
            StreamConstraint::Facing(facing) => {
                if !self.facing_supported {
                    return Err(SessionError::unsupported("facing-mode constraints"));
                }
                self.devices
                    .iter()
                    .find(|d| d.facing == *facing)
                    .ok_or_else(|| SessionError::DeviceNotFound {
                        requested: format!("{} camera", facing),
                    })?
            }
        };

        let stopped = Arc::new(AtomicBool::new(false));
        self.probe.on_acquire(Arc::clone(&stopped));

        Ok(MockHandle {
            device_id: device.id.clone(),
            frame: self.frames.get(&device.id).cloned(),
            stopped,
            probe: Arc::clone(&self.probe),
        })
    }
}

/// Enumerator over a fixed device list.
pub struct MockEnumerator {
    devices: Vec<CameraDevice>,
    fail: bool,
}

impl MockEnumerator {
    pub fn new(devices: Vec<CameraDevice>) -> Self {
        Self {
            devices,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            devices: Vec::new(),
            fail: true,
        }
    }
}

impl DeviceEnumerator for MockEnumerator {
    async fn enumerate(&self) -> Result<Vec<CameraDevice>, SessionError> {
        if self.fail {
            return Err(SessionError::DeviceEnumerationError {
                reason: "mock enumeration failure".to_string(),
            });
        }
        Ok(self.devices.clone())
    }
}

/// Locator with a fixed outcome.
pub enum MockLocator {
    Fix(Coordinates),
    Denied,
    Unavailable,
    Unsupported,
}

impl MockLocator {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        MockLocator::Fix(Coordinates {
            latitude,
            longitude,
        })
    }
}

impl Locator for MockLocator {
    async fn current_position(&self) -> Result<Coordinates, SessionError> {
        match self {
            MockLocator::Fix(coords) => Ok(*coords),
            MockLocator::Denied => Err(SessionError::PermissionDenied),
            MockLocator::Unavailable => {
                Err(SessionError::position_unavailable("mock position failure"))
            }
            MockLocator::Unsupported => Err(SessionError::unsupported("geolocation")),
        }
    }
}
