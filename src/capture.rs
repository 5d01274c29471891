//! Still-image capture from a live stream.
//!
//! Snapshots the current video frame into an encoded PNG sized to the
//! stream's native resolution. No persistence, no upload: the artifact is
//! handed back to the caller and nothing else happens.

use std::io::Cursor;

use chrono::Utc;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::errors::SessionError;
use crate::platform::StreamHandle;
use crate::types::CaptureResult;

/// Snapshot the handle's current frame into a [`CaptureResult`].
///
/// The encode surface is sized to the frame's intrinsic resolution. A stream
/// that is not yet producing frames, or reports a zero-sized frame, fails
/// rather than producing a degenerate image.
///
/// # Errors
/// * `SessionError::NoActiveStream` - the handle yields no frame, the frame
///   has a zero dimension, or the frame data is malformed
pub fn capture_frame<H: StreamHandle>(handle: &H) -> Result<CaptureResult, SessionError> {
    let frame = handle.current_frame().ok_or(SessionError::NoActiveStream)?;

    if frame.width == 0 || frame.height == 0 {
        log::warn!(
            "capture refused: stream on '{}' has zero intrinsic size",
            handle.device_id()
        );
        return Err(SessionError::NoActiveStream);
    }
    if frame.data.len() != frame.expected_len() {
        log::warn!(
            "capture refused: frame carries {} bytes, expected {}",
            frame.data.len(),
            frame.expected_len()
        );
        return Err(SessionError::NoActiveStream);
    }

    let mut image = Vec::new();
    PngEncoder::new(Cursor::new(&mut image))
        .write_image(&frame.data, frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| {
            log::warn!("PNG encode failed: {}", e);
            SessionError::NoActiveStream
        })?;

    log::debug!(
        "captured {}x{} frame from device '{}' ({} bytes PNG)",
        frame.width,
        frame.height,
        handle.device_id(),
        image.len()
    );

    Ok(CaptureResult {
        image,
        width: frame.width,
        height: frame.height,
        captured_at: Utc::now(),
    })
}
