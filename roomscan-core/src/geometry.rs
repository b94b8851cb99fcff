//! Anchor mesh geometry as delivered by the AR session
//!
//! The session hands over each reconstructed mesh fragment as strided byte
//! buffers plus a world transform. The accessors here only assume stride,
//! offset and count; everything else about the layout is opaque.

use crate::Matrix4;
use serde::{Deserialize, Serialize};

/// Stable identifier of a mesh anchor across frames.
pub type AnchorId = u64;

/// A strided buffer of per-vertex attributes (positions or normals),
/// three `f32` components per entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometrySource {
    data: Vec<u8>,
    offset: usize,
    stride: usize,
    count: usize,
}

impl GeometrySource {
    pub fn new(data: Vec<u8>, offset: usize, stride: usize, count: usize) -> Self {
        debug_assert!(offset + stride * count <= data.len() + stride.saturating_sub(12));
        Self {
            data,
            offset,
            stride,
            count,
        }
    }

    /// Build a tightly packed source from a slice of xyz triples.
    pub fn from_vec3s(entries: &[[f32; 3]]) -> Self {
        Self {
            data: bytemuck::cast_slice(entries).to_vec(),
            offset: 0,
            stride: 12,
            count: entries.len(),
        }
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Read entry `index` as three floats. Expects three `f32` (twelve
    /// bytes) per entry at the stride offset.
    pub fn vec3_at(&self, index: usize) -> [f32; 3] {
        let start = self.offset + self.stride * index;
        bytemuck::pod_read_unaligned(&self.data[start..start + 12])
    }

    /// The raw bytes, for uploading to the GPU.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Face connectivity: a buffer of `u32` vertex indices with a fixed number
/// of indices per face (three for the triangle meshes the session emits).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryElement {
    indices: Vec<u32>,
    indices_per_face: usize,
}

impl GeometryElement {
    pub fn new(indices: Vec<u32>, indices_per_face: usize) -> Self {
        debug_assert!(indices_per_face > 0);
        debug_assert_eq!(indices.len() % indices_per_face, 0);
        Self {
            indices,
            indices_per_face,
        }
    }

    /// Build a triangle element from index triples.
    pub fn from_triangles(faces: &[[u32; 3]]) -> Self {
        Self {
            indices: faces.iter().flatten().copied().collect(),
            indices_per_face: 3,
        }
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.indices.len() / self.indices_per_face
    }

    pub fn indices_per_face(&self) -> usize {
        self.indices_per_face
    }

    /// Total number of indices across all faces.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Vertex indices of face `face_index`.
    pub fn vertex_indices_of(&self, face_index: usize) -> &[u32] {
        let start = face_index * self.indices_per_face;
        &self.indices[start..start + self.indices_per_face]
    }

    /// The flat index list, for uploading to the GPU.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

/// One reconstructed mesh fragment as reported by the AR session for the
/// current frame: a world transform plus strided vertex, normal and face
/// buffers.
#[derive(Debug, Clone)]
pub struct MeshAnchor {
    pub id: AnchorId,
    pub transform: Matrix4<f32>,
    pub vertices: GeometrySource,
    pub normals: GeometrySource,
    pub faces: GeometryElement,
}

/// A classified anchor: the frame's geometry plus per-vertex membership
/// flags against the capture volume (1 inside, 0 outside), parallel to the
/// vertex buffer.
///
/// The whole snapshot collection is replaced every frame; snapshots are
/// never merged or diffed across frames.
#[derive(Debug, Clone)]
pub struct MeshSnapshot {
    pub id: AnchorId,
    pub transform: Matrix4<f32>,
    pub vertices: GeometrySource,
    pub normals: GeometrySource,
    pub faces: GeometryElement,
    pub membership: Vec<i32>,
}
