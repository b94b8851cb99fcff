//! Triangle meshes and the exportable scan asset

use crate::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices, faces and optional per-vertex normals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    /// A standalone single-triangle mesh: three vertices, three normals,
    /// one face. This is the unit the exporter emits per kept face.
    pub fn standalone_triangle(vertices: [Point3f; 3], normals: [Vector3f; 3]) -> Self {
        Self {
            vertices: vertices.to_vec(),
            faces: vec![[0, 1, 2]],
            normals: Some(normals.to_vec()),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Set vertex normals; ignored unless the count matches the vertices
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// The accumulated result of an export pass: one standalone triangle mesh
/// per kept face, in emission order. Vertices are never shared or merged
/// across faces or anchors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanAsset {
    pub meshes: Vec<TriangleMesh>,
}

impl ScanAsset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: TriangleMesh) {
        self.meshes.push(mesh);
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total vertices across all accumulated meshes
    pub fn total_vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertex_count()).sum()
    }

    /// Total faces across all accumulated meshes
    pub fn total_face_count(&self) -> usize {
        self.meshes.iter().map(|m| m.face_count()).sum()
    }

    /// Flatten all meshes into a single triangle mesh, rebasing face
    /// indices. Used by writers that produce one vertex/face table.
    pub fn flatten(&self) -> TriangleMesh {
        let mut merged = TriangleMesh::new();
        let mut normals = Vec::new();
        for mesh in &self.meshes {
            let base = merged.vertices.len();
            merged.vertices.extend_from_slice(&mesh.vertices);
            for face in &mesh.faces {
                merged
                    .faces
                    .push([face[0] + base, face[1] + base, face[2] + base]);
            }
            match &mesh.normals {
                Some(n) => normals.extend_from_slice(n),
                None => normals.extend(
                    std::iter::repeat(Vector3f::new(0.0, 0.0, 1.0)).take(mesh.vertex_count()),
                ),
            }
        }
        merged.normals = Some(normals);
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standalone_triangle_shape() {
        let mesh = TriangleMesh::standalone_triangle(
            [
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            [Vector3f::new(0.0, 0.0, 1.0); 3],
        );
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.faces[0], [0, 1, 2]);
        assert!(mesh.normals.is_some());
    }

    #[test]
    fn flatten_rebases_indices() {
        let triangle = TriangleMesh::standalone_triangle(
            [
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            [Vector3f::new(0.0, 0.0, 1.0); 3],
        );
        let mut asset = ScanAsset::new();
        asset.add_mesh(triangle.clone());
        asset.add_mesh(triangle);

        let merged = asset.flatten();
        assert_eq!(merged.vertex_count(), 6);
        assert_eq!(merged.face_count(), 2);
        assert_eq!(merged.faces[0], [0, 1, 2]);
        assert_eq!(merged.faces[1], [3, 4, 5]);
        assert_eq!(merged.normals.as_ref().map(|n| n.len()), Some(6));
    }
}
