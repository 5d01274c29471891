//! One-shot location fetch.
//!
//! Runs independently of camera state: a failure here never blocks or fails
//! camera initialization, and vice versa. The fetch is bounded by a timeout so
//! a stalled platform request degrades into `PositionUnavailable` instead of
//! hanging the caller.

use std::time::Duration;

use crate::errors::SessionError;
use crate::platform::Locator;
use crate::types::LocationFix;

/// Fetch the current position once, bounded by `timeout`.
///
/// # Errors
/// * `SessionError::Unsupported` - the platform has no location capability
/// * `SessionError::PermissionDenied` - location access denied
/// * `SessionError::PositionUnavailable` - the platform failed, or the fetch
///   exceeded the timeout
pub async fn fetch_one_shot<L: Locator>(
    locator: &L,
    timeout: Duration,
) -> Result<LocationFix, SessionError> {
    match tokio::time::timeout(timeout, locator.current_position()).await {
        Ok(Ok(coords)) => {
            let fix = LocationFix::from_coordinates(coords);
            log::info!("location fix obtained: {}", fix);
            Ok(fix)
        }
        Ok(Err(e)) => {
            log::warn!("location fetch failed: {}", e);
            Err(e)
        }
        Err(_) => {
            log::warn!("location fetch timed out after {:?}", timeout);
            Err(SessionError::position_unavailable(format!(
                "no fix within {:?}",
                timeout
            )))
        }
    }
}
