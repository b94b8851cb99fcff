//! Capture-frame cache for future texture mapping

use crate::CameraImage;
use roomscan_core::Vector3f;
use std::time::{SystemTime, UNIX_EPOCH};

/// A saved camera frame, keyed by capture time, with the camera's position
/// relative to the capture volume origin. Inert until texture-to-surface
/// projection is implemented; the cache is append-only and never evicted.
#[derive(Debug, Clone)]
pub struct CaptureFrame {
    /// Timestamp string identifying the capture.
    pub key: String,
    /// Camera distance from the volume origin at capture time.
    pub distance: f32,
    /// Camera position relative to the volume origin.
    pub position: Vector3f,
    /// The raw planar frame, if the session delivered one.
    pub image: Option<CameraImage>,
}

/// Millisecond-resolution timestamp key for a capture record.
pub fn timestamp_key() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}:{:03}", now.as_secs(), now.subsec_millis())
}
