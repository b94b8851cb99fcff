//! Scan export
//!
//! Turns the frame's classified snapshots into a scan asset and writes it to
//! disk. A face survives only when every one of its vertices was classified
//! inside the capture volume; each kept face becomes a standalone
//! three-vertex mesh with world-space positions and normals. Faces are never
//! deduplicated or merged across anchors.

use crate::write_mesh;
use roomscan_core::{
    world_normal, world_point, MeshSnapshot, Point3f, Result, ScanAsset, TriangleMesh, Vector3f,
};
use std::path::{Path, PathBuf};

/// Build the exportable asset from classified snapshots.
pub fn build_scan_asset(snapshots: &[MeshSnapshot]) -> ScanAsset {
    let mut asset = ScanAsset::new();
    for snapshot in snapshots {
        for face in 0..snapshot.faces.face_count() {
            let indices = snapshot.faces.vertex_indices_of(face);
            let keep = indices
                .iter()
                .all(|&i| snapshot.membership.get(i as usize) == Some(&1));
            if !keep {
                continue;
            }

            let mut vertices = [Point3f::origin(); 3];
            let mut normals = [Vector3f::zeros(); 3];
            for (slot, &i) in indices.iter().take(3).enumerate() {
                vertices[slot] = world_point(&snapshot.transform, snapshot.vertices.vec3_at(i as usize));
                normals[slot] = world_normal(&snapshot.transform, snapshot.normals.vec3_at(i as usize));
            }
            asset.add_mesh(TriangleMesh::standalone_triangle(vertices, normals));
        }
    }
    asset
}

/// Export the snapshots to `<dir>/<name>.<extension>` and return the
/// written path. The format is chosen by the extension.
pub fn export_scan(
    snapshots: &[MeshSnapshot],
    dir: &Path,
    name: &str,
    extension: &str,
) -> Result<PathBuf> {
    let asset = build_scan_asset(snapshots);
    tracing::info!(
        anchors = snapshots.len(),
        faces = asset.total_face_count(),
        name,
        "exporting scan"
    );

    let path = dir.join(format!("{}.{}", name, extension));
    write_mesh(&asset.flatten(), &path)?;
    Ok(path)
}

/// Run the export on a background thread. The returned channel delivers
/// exactly one message: the written path, or the error that stopped the
/// export.
pub fn spawn_export(
    snapshots: Vec<MeshSnapshot>,
    dir: PathBuf,
    name: String,
    extension: String,
) -> flume::Receiver<Result<PathBuf>> {
    let (tx, rx) = flume::bounded(1);
    std::thread::spawn(move || {
        let result = export_scan(&snapshots, &dir, &name, &extension);
        if let Err(error) = &result {
            tracing::error!(%error, "scan export failed");
        }
        tx.send(result).ok();
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MeshReader, ObjReader};
    use approx::assert_relative_eq;
    use roomscan_core::{
        BoundingVolume, GeometryElement, GeometrySource, Matrix4, Vector3f,
    };
    use std::time::Duration;

    fn snapshot_with_membership(
        transform: Matrix4<f32>,
        vertices: &[[f32; 3]],
        faces: &[[u32; 3]],
        membership: Vec<i32>,
    ) -> MeshSnapshot {
        MeshSnapshot {
            id: 1,
            transform,
            vertices: GeometrySource::from_vec3s(vertices),
            normals: GeometrySource::from_vec3s(&vec![[0.0, 0.0, 1.0]; vertices.len()]),
            faces: GeometryElement::from_triangles(faces),
            membership,
        }
    }

    #[test]
    fn face_kept_only_when_all_vertices_are_inside() {
        // quad of two triangles; vertex 3 is flagged outside
        let snapshot = snapshot_with_membership(
            Matrix4::identity(),
            &[
                [0.0, 0.0, 0.0],
                [0.1, 0.0, 0.0],
                [0.0, 0.1, 0.0],
                [0.1, 0.1, 0.0],
            ],
            &[[0, 1, 2], [1, 3, 2]],
            vec![1, 1, 1, 0],
        );

        let asset = build_scan_asset(&[snapshot]);
        assert_eq!(asset.mesh_count(), 1);
        assert_eq!(asset.total_vertex_count(), 3);
        assert_eq!(asset.total_face_count(), 1);
    }

    #[test]
    fn export_scenario_keeps_the_contained_triangle() {
        // volume centered at (0, 0, 0.5) with half extents 0.5; one triangle
        // at z = 0.3 inside it, one at z = 2.0 outside
        let volume = BoundingVolume::from_center_half_extents(
            Point3f::new(0.0, 0.0, 0.5),
            Vector3f::new(0.5, 0.5, 0.5),
        )
        .unwrap();

        let vertices = [
            [0.0f32, 0.0, 0.3],
            [0.1, 0.0, 0.3],
            [0.0, 0.1, 0.3],
            [0.0, 0.0, 2.0],
            [0.1, 0.0, 2.0],
            [0.0, 0.1, 2.0],
        ];
        let transform = Matrix4::identity();
        let membership: Vec<i32> = vertices
            .iter()
            .map(|&v| volume.contains(&world_point(&transform, v)) as i32)
            .collect();
        assert_eq!(membership, vec![1, 1, 1, 0, 0, 0]);

        let snapshot = snapshot_with_membership(
            transform,
            &vertices,
            &[[0, 1, 2], [3, 4, 5]],
            membership,
        );

        let dir = std::env::temp_dir();
        let path = export_scan(&[snapshot], &dir, "roomscan_export_scenario", "obj").unwrap();

        let mesh = ObjReader::read_mesh(&path).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert_relative_eq!(mesh.vertices[0], Point3f::new(0.0, 0.0, 0.3), epsilon = 1e-5);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn exported_faces_never_share_vertices() {
        // two kept faces over a shared edge; the output still carries
        // three standalone vertices and normals per face
        let snapshot = snapshot_with_membership(
            Matrix4::identity(),
            &[
                [0.0, 0.0, 0.0],
                [0.1, 0.0, 0.0],
                [0.0, 0.1, 0.0],
                [0.1, 0.1, 0.0],
            ],
            &[[0, 1, 2], [1, 3, 2]],
            vec![1, 1, 1, 1],
        );

        let dir = std::env::temp_dir();
        let path = export_scan(&[snapshot], &dir, "roomscan_unshared_vertices", "obj").unwrap();
        let mesh = ObjReader::read_mesh(&path).unwrap();

        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 3 * mesh.face_count());
        assert_eq!(mesh.normals.as_ref().map(|n| n.len()), Some(6));
        let mut seen = std::collections::HashSet::new();
        for face in &mesh.faces {
            for &index in face {
                assert!(seen.insert(index));
            }
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn anchor_transform_is_applied_to_exported_vertices() {
        let transform = Matrix4::new_translation(&Vector3f::new(1.0, 0.0, 0.0));
        let snapshot = snapshot_with_membership(
            transform,
            &[[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]],
            &[[0, 1, 2]],
            vec![1, 1, 1],
        );

        let asset = build_scan_asset(&[snapshot]);
        assert_eq!(asset.mesh_count(), 1);
        assert_relative_eq!(
            asset.meshes[0].vertices[0],
            Point3f::new(1.0, 0.0, 0.0),
            epsilon = 1e-6
        );
        // normals are unaffected by the translation
        let normals = asset.meshes[0].normals.as_ref().unwrap();
        assert_relative_eq!(normals[0], Vector3f::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn background_export_reports_through_the_channel() {
        let snapshot = snapshot_with_membership(
            Matrix4::identity(),
            &[[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [0.0, 0.1, 0.0]],
            &[[0, 1, 2]],
            vec![1, 1, 1],
        );

        let rx = spawn_export(
            vec![snapshot],
            std::env::temp_dir(),
            "roomscan_background_export".to_string(),
            "obj".to_string(),
        );

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let path = result.unwrap();
        assert!(path.exists());
        // exactly one message, then the thread's sender drops
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn background_export_surfaces_format_errors() {
        let rx = spawn_export(
            Vec::new(),
            std::env::temp_dir(),
            "roomscan_bad_format".to_string(),
            "usdz".to_string(),
        );

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(
            result,
            Err(roomscan_core::Error::UnsupportedFormat(_))
        ));
    }
}
