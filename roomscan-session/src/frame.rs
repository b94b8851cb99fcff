//! Per-frame data delivered by the AR session

use nalgebra::Matrix3;
use roomscan_core::{Matrix4, MeshAnchor, Point3f};

/// Camera tracking quality as reported by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingQuality {
    NotAvailable,
    Limited,
    Normal,
}

/// One plane of a planar video frame.
#[derive(Debug, Clone)]
pub struct ImagePlane {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// 1 for the luma plane, 2 for the interleaved chroma plane.
    pub bytes_per_pixel: u32,
}

/// The raw camera frame in its planar video format: a full-resolution luma
/// plane and a half-resolution interleaved CbCr plane.
#[derive(Debug, Clone)]
pub struct CameraImage {
    pub luma: ImagePlane,
    pub chroma: ImagePlane,
}

/// World pose of the camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraPose {
    pub transform: Matrix4<f32>,
}

impl CameraPose {
    pub fn position(&self) -> Point3f {
        Point3f::new(
            self.transform[(0, 3)],
            self.transform[(1, 3)],
            self.transform[(2, 3)],
        )
    }
}

/// Camera state for the frame. View and projection matrices are derived by
/// the session for the current viewport.
#[derive(Debug, Clone, Copy)]
pub struct ArCamera {
    pub pose: CameraPose,
    pub tracking: TrackingQuality,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

/// Everything the session hands over per rendered frame.
#[derive(Debug, Clone)]
pub struct ArFrame {
    pub timestamp: f64,
    pub camera: ArCamera,
    /// The full set of mesh anchors known this frame; replaces the previous
    /// frame's set entirely.
    pub anchors: Vec<MeshAnchor>,
    pub image: Option<CameraImage>,
    /// Affine display-to-camera transform for the passthrough quad's
    /// texture coordinates.
    pub display_transform: Matrix3<f32>,
}

impl ArFrame {
    /// A frame with identity camera and no content, useful as a baseline.
    pub fn empty(timestamp: f64) -> Self {
        Self {
            timestamp,
            camera: ArCamera {
                pose: CameraPose {
                    transform: Matrix4::identity(),
                },
                tracking: TrackingQuality::Normal,
                view: Matrix4::identity(),
                projection: Matrix4::identity(),
            },
            anchors: Vec::new(),
            image: None,
            display_transform: Matrix3::identity(),
        }
    }
}
