//! Mesh export and interchange formats
//!
//! This crate turns classified mesh snapshots into an exportable scan asset
//! and writes it to OBJ or PLY, with the format picked from the file
//! extension. Export runs on a background thread and reports completion
//! through a channel.

pub mod export;
pub mod obj;
pub mod ply;

pub use export::{build_scan_asset, export_scan, spawn_export};
pub use obj::{ObjReader, ObjWriter};
pub use ply::{PlyReader, PlyWriter};

use roomscan_core::{Result, TriangleMesh};

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<std::path::Path>>(path: P) -> Result<TriangleMesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<std::path::Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<std::path::Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") => obj::ObjReader::read_mesh(path),
        Some("ply") => ply::PlyReader::read_mesh(path),
        _ => Err(roomscan_core::Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<std::path::Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") => obj::ObjWriter::write_mesh(mesh, path),
        Some("ply") => ply::PlyWriter::write_mesh(mesh, path),
        _ => Err(roomscan_core::Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscan_core::Point3f;

    #[test]
    fn unknown_extension_is_an_unsupported_format() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let result = write_mesh(&mesh, std::env::temp_dir().join("scan.stl"));
        assert!(matches!(
            result,
            Err(roomscan_core::Error::UnsupportedFormat(_))
        ));

        let result = read_mesh(std::env::temp_dir().join("scan.glb"));
        assert!(matches!(
            result,
            Err(roomscan_core::Error::UnsupportedFormat(_))
        ));
    }
}
