//! Mesh ingest and classification
//!
//! Each frame, the session's full anchor set is converted into classified
//! snapshots: every vertex is transformed to world space and tested against
//! the capture volume, producing a membership flag array parallel to the
//! vertex buffer. The previous frame's snapshots are discarded wholesale.

use crate::{ArFrame, CaptureFrame};
use roomscan_core::{transform, BoundingVolume, MeshAnchor, MeshSnapshot, Point3f};

/// Classify one frame's anchors against the capture volume.
pub fn classify_anchors(anchors: &[MeshAnchor], bounds: &BoundingVolume) -> Vec<MeshSnapshot> {
    anchors
        .iter()
        .map(|anchor| {
            let mut membership = Vec::with_capacity(anchor.vertices.count());
            for index in 0..anchor.vertices.count() {
                let local = anchor.vertices.vec3_at(index);
                let world = transform::world_point(&anchor.transform, local);
                membership.push(if bounds.contains(&world) { 1 } else { 0 });
            }
            MeshSnapshot {
                id: anchor.id,
                transform: anchor.transform,
                vertices: anchor.vertices.clone(),
                normals: anchor.normals.clone(),
                faces: anchor.faces.clone(),
                membership,
            }
        })
        .collect()
}

/// Scan-session state owned by the frame loop: the placed capture volume,
/// the current frame's classified snapshots and the capture-frame cache.
pub struct ScanState {
    bounds: BoundingVolume,
    origin: Point3f,
    snapshots: Vec<MeshSnapshot>,
    captures: Vec<CaptureFrame>,
}

impl ScanState {
    /// Create state for a volume placed at `origin`. The volume is
    /// immutable from here on.
    pub fn new(bounds: BoundingVolume, origin: Point3f) -> Self {
        Self {
            bounds,
            origin,
            snapshots: Vec::new(),
            captures: Vec::new(),
        }
    }

    pub fn bounds(&self) -> &BoundingVolume {
        &self.bounds
    }

    pub fn origin(&self) -> Point3f {
        self.origin
    }

    /// Replace the snapshot set with this frame's classified anchors.
    pub fn ingest_frame(&mut self, frame: &ArFrame) {
        self.snapshots = classify_anchors(&frame.anchors, &self.bounds);
    }

    pub fn snapshots(&self) -> &[MeshSnapshot] {
        &self.snapshots
    }

    /// Point-in-time copy of the snapshot set, handed to the exporter by
    /// value so a concurrent export never observes a frame in progress.
    pub fn export_snapshots(&self) -> Vec<MeshSnapshot> {
        self.snapshots.clone()
    }

    /// Append a capture record for the current frame. Without a frame this
    /// is a no-op.
    pub fn save_capture_frame(&mut self, frame: Option<&ArFrame>) -> Option<&CaptureFrame> {
        let Some(frame) = frame else {
            tracing::warn!("no current camera frame, skipping capture");
            return None;
        };

        let camera_position = frame.camera.pose.position();
        let relative = camera_position - self.origin;

        self.captures.push(CaptureFrame {
            key: crate::capture::timestamp_key(),
            distance: relative.norm(),
            position: relative,
            image: frame.image.clone(),
        });
        tracing::debug!(captures = self.captures.len(), "saved capture frame");
        self.captures.last()
    }

    pub fn captures(&self) -> &[CaptureFrame] {
        &self.captures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roomscan_core::{GeometryElement, GeometrySource, Matrix4, Vector3f};

    fn anchor_with_vertices(id: u64, transform: Matrix4<f32>, vertices: &[[f32; 3]]) -> MeshAnchor {
        MeshAnchor {
            id,
            transform,
            vertices: GeometrySource::from_vec3s(vertices),
            normals: GeometrySource::from_vec3s(&vec![[0.0, 1.0, 0.0]; vertices.len()]),
            faces: GeometryElement::from_triangles(&[[0, 1, 2]]),
        }
    }

    fn unit_state() -> ScanState {
        let bounds = BoundingVolume::from_center_half_extents(
            Point3f::new(0.0, 0.0, 0.5),
            Vector3f::new(0.5, 0.5, 0.5),
        )
        .unwrap();
        ScanState::new(bounds, Point3f::new(0.0, 0.0, 0.5))
    }

    #[test]
    fn classification_flags_follow_the_volume() {
        let state = unit_state();
        let anchor = anchor_with_vertices(
            7,
            Matrix4::identity(),
            &[[0.0, 0.0, 0.3], [0.1, 0.0, 0.3], [0.0, 0.1, 5.0]],
        );

        let snapshots = classify_anchors(&[anchor], state.bounds());
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].membership, vec![1, 1, 0]);
        assert_eq!(snapshots[0].id, 7);
    }

    #[test]
    fn classification_uses_the_anchor_transform() {
        let state = unit_state();
        // local origin, moved into the volume by the anchor transform
        let transform = Matrix4::new_translation(&Vector3f::new(0.0, 0.0, 0.5));
        let anchor = anchor_with_vertices(1, transform, &[[0.0, 0.0, 0.0], [0.0, 0.0, 2.0]]);

        let snapshots = classify_anchors(&[anchor], state.bounds());
        assert_eq!(snapshots[0].membership, vec![1, 0]);
    }

    #[test]
    fn ingest_replaces_snapshots_wholesale() {
        let mut state = unit_state();

        let mut frame = ArFrame::empty(0.0);
        frame.anchors = vec![
            anchor_with_vertices(1, Matrix4::identity(), &[[0.0, 0.0, 0.3]; 3]),
            anchor_with_vertices(2, Matrix4::identity(), &[[0.0, 0.0, 0.4]; 3]),
        ];
        state.ingest_frame(&frame);
        assert_eq!(state.snapshots().len(), 2);

        frame.anchors.truncate(1);
        state.ingest_frame(&frame);
        assert_eq!(state.snapshots().len(), 1);
        assert_eq!(state.snapshots()[0].id, 1);
    }

    #[test]
    fn capture_requires_a_frame() {
        let mut state = unit_state();
        assert!(state.save_capture_frame(None).is_none());
        assert!(state.captures().is_empty());
    }

    #[test]
    fn capture_records_relative_camera_position() {
        let mut state = unit_state();
        let mut frame = ArFrame::empty(0.0);
        frame.camera.pose.transform = Matrix4::new_translation(&Vector3f::new(1.0, 0.0, 0.5));

        let capture = state.save_capture_frame(Some(&frame)).unwrap();
        assert_relative_eq!(capture.position, Vector3f::new(1.0, 0.0, 0.0));
        assert_relative_eq!(capture.distance, 1.0);

        state.save_capture_frame(Some(&frame));
        assert_eq!(state.captures().len(), 2);
    }
}
