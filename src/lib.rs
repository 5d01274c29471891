//! geosnap: camera capture and location tagging session core.
//!
//! A capture session wires three platform capabilities together: camera
//! device enumeration, stream acquisition, and one-shot geolocation. The
//! platform is abstracted behind the traits in [`platform`], so the session
//! logic (device selection, stream lifecycle, frame capture, location
//! tagging) runs and tests without hardware.
//!
//! The heart of the crate is [`stream::StreamManager`], which owns the single
//! active stream and guarantees close-before-open on every camera switch.
//! [`session::CaptureSession`] is the facade the presentation layer drives.

pub mod capture;
pub mod config;
pub mod errors;
pub mod location;
pub mod platform;
pub mod session;
pub mod stream;
pub mod types;

pub use config::SessionConfig;
pub use errors::SessionError;
pub use session::CaptureSession;
pub use stream::StreamState;
pub use types::{CameraDevice, CameraSelector, CaptureResult, Facing, LocationFix};
