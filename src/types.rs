//! Core data model for capture sessions.
//!
//! These types are shared between the platform traits and the session logic:
//! discovered devices, selectors, raw frames, and the two display artifacts
//! (captured stills and location fixes).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Which way a camera points, relative to the user.
///
/// Platforms that report facing directly should set it on the device they
/// return; otherwise [`Facing::infer_from_label`] is applied to the label as a
/// fallback heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Points toward the user (selfie camera).
    Front,
    /// Points away from the user.
    Back,
    /// The platform gave no usable hint.
    Unknown,
}

impl Facing {
    /// Guess the facing from a human-readable device label.
    ///
    /// Labels may be empty until camera permission has been granted at least
    /// once, in which case this returns `Unknown` and callers fall back to
    /// positional selection.
    pub fn infer_from_label(label: &str) -> Facing {
        let label = label.to_lowercase();
        if ["front", "user", "selfie"].iter().any(|k| label.contains(k)) {
            Facing::Front
        } else if ["back", "rear", "environment"]
            .iter()
            .any(|k| label.contains(k))
        {
            Facing::Back
        } else {
            Facing::Unknown
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
            Facing::Unknown => write!(f, "unknown"),
        }
    }
}

/// Information about an available camera input device.
///
/// The id is opaque and stable for the lifetime of the session. The discovered
/// set may change between enumeration calls; nothing here is invalidated live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Opaque device identifier, stable per physical device for the session
    pub id: String,
    /// Human-readable device name (may be empty before permission is granted)
    pub label: String,
    /// Facing hint reported by the platform or inferred from the label
    pub facing: Facing,
}

impl CameraDevice {
    /// Fill in the facing hint from the label when the platform left it
    /// `Unknown`. A hint the platform reported explicitly is never overridden.
    pub fn with_inferred_facing(mut self) -> Self {
        if self.facing == Facing::Unknown {
            self.facing = Facing::infer_from_label(&self.label);
        }
        self
    }
}

impl fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.id, self.label, self.facing)
    }
}

/// How the caller names the camera it wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraSelector {
    /// An exact device id from a previous enumeration
    DeviceId(String),
    /// A facing preference, resolved against the current device set
    Facing(Facing),
}

impl fmt::Display for CameraSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraSelector::DeviceId(id) => write!(f, "device '{}'", id),
            CameraSelector::Facing(facing) => write!(f, "{} camera", facing),
        }
    }
}

/// A single raw video frame as produced by an open stream.
///
/// Pixel data is tightly packed RGB8, `width * height * 3` bytes.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Raw pixel data in RGB format
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl RawFrame {
    /// Number of bytes a well-formed frame of this size must carry.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// A still image snapshotted from the live stream.
///
/// Immutable once produced; the next capture supersedes it rather than
/// merging with it. The location fix is never embedded in the image.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// PNG-encoded image bytes
    pub image: Vec<u8>,
    /// Image width in pixels (the stream's native resolution)
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Wall-clock time of capture
    pub captured_at: DateTime<Utc>,
}

/// A raw coordinate pair as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A one-shot device location, paired with captures for display only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Wall-clock time the fix was obtained
    pub fixed_at: DateTime<Utc>,
}

impl LocationFix {
    /// Build a fix from platform coordinates, stamped with the current time.
    pub fn from_coordinates(coords: Coordinates) -> Self {
        Self {
            latitude: coords.latitude,
            longitude: coords.longitude,
            fixed_at: Utc::now(),
        }
    }
}

impl fmt::Display for LocationFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {:.6}, lng {:.6}", self.latitude, self.longitude)
    }
}
