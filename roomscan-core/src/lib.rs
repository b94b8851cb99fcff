//! Core data structures for roomscan
//!
//! This crate provides the shared data model for the scanning pipeline:
//! the capture bounding volume, strided anchor geometry with per-vertex
//! membership classification, triangle meshes and the exportable scan asset.

pub mod bounds;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod transform;

pub use bounds::*;
pub use error::*;
pub use geometry::*;
pub use mesh::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Common result type for roomscan operations
pub type Result<T> = std::result::Result<T, Error>;
