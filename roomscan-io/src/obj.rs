//! OBJ format support
//!
//! The default interchange format for exported scans. The writer emits one
//! `o` group per mesh with `v`/`vn` records and `f a//a b//b c//c` faces;
//! indices are 1-based and file-global, matching how the flattened scan
//! asset lays its vertices out.

use crate::{MeshReader, MeshWriter};
use roomscan_core::{Error, Point3f, Result, TriangleMesh, Vector3f};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub struct ObjReader;
pub struct ObjWriter;

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "o scan")?;
        for vertex in &mesh.vertices {
            writeln!(writer, "v {} {} {}", vertex.x, vertex.y, vertex.z)?;
        }
        if let Some(normals) = &mesh.normals {
            for normal in normals {
                writeln!(writer, "vn {} {} {}", normal.x, normal.y, normal.z)?;
            }
        }

        let has_normals = mesh.normals.is_some();
        for face in &mesh.faces {
            if has_normals {
                writeln!(
                    writer,
                    "f {0}//{0} {1}//{1} {2}//{2}",
                    face[0] + 1,
                    face[1] + 1,
                    face[2] + 1
                )?;
            } else {
                writeln!(writer, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        let mut faces = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("v") => {
                    let [x, y, z] = parse_three_floats(&mut fields, "vertex")?;
                    vertices.push(Point3f::new(x, y, z));
                }
                Some("vn") => {
                    let [x, y, z] = parse_three_floats(&mut fields, "normal")?;
                    normals.push(Vector3f::new(x, y, z));
                }
                Some("f") => {
                    let mut indices = [0usize; 3];
                    for slot in &mut indices {
                        let field = fields.next().ok_or_else(|| {
                            Error::InvalidData("face with fewer than 3 vertices".to_string())
                        })?;
                        *slot = parse_face_index(field)?;
                    }
                    faces.push(indices);
                }
                // groups, materials and comments carry nothing we keep
                _ => {}
            }
        }

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        if !normals.is_empty() {
            mesh.set_normals(normals);
        }
        Ok(mesh)
    }
}

fn parse_three_floats(
    fields: &mut std::str::SplitWhitespace<'_>,
    what: &str,
) -> Result<[f32; 3]> {
    let mut out = [0.0f32; 3];
    for slot in &mut out {
        let field = fields
            .next()
            .ok_or_else(|| Error::InvalidData(format!("truncated {} record", what)))?;
        *slot = field
            .parse()
            .map_err(|_| Error::InvalidData(format!("malformed {} component: {}", what, field)))?;
    }
    Ok(out)
}

/// Parse the vertex index out of `v`, `v/vt`, `v//vn` or `v/vt/vn`,
/// converting to 0-based.
fn parse_face_index(field: &str) -> Result<usize> {
    let vertex = field.split('/').next().unwrap_or(field);
    let index: usize = vertex
        .parse()
        .map_err(|_| Error::InvalidData(format!("malformed face index: {}", field)))?;
    if index == 0 {
        return Err(Error::InvalidData("face index 0 in 1-based file".to_string()));
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn obj_mesh_roundtrip() {
        let path = temp_path("roomscan_obj_roundtrip.obj");

        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.3),
                Point3f::new(0.1, 0.0, 0.3),
                Point3f::new(0.0, 0.1, 0.3),
                Point3f::new(0.1, 0.1, 0.3),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        );
        mesh.set_normals(vec![Vector3f::new(0.0, 0.0, 1.0); 4]);

        ObjWriter::write_mesh(&mesh, &path).unwrap();
        let read_back = ObjReader::read_mesh(&path).unwrap();

        assert_eq!(read_back.vertex_count(), 4);
        assert_eq!(read_back.face_count(), 2);
        assert_eq!(read_back.faces, mesh.faces);
        for (a, b) in read_back.vertices.iter().zip(&mesh.vertices) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
        assert_eq!(read_back.normals.as_ref().map(|n| n.len()), Some(4));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn reader_accepts_slash_forms() {
        let path = temp_path("roomscan_obj_slash_forms.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1/1/1 2/2/2 3/3/3\n",
        )
        .unwrap();

        let mesh = ObjReader::read_mesh(&path).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.faces[0], [0, 1, 2]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn truncated_face_is_invalid_data() {
        let path = temp_path("roomscan_obj_truncated.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap();

        let result = ObjReader::read_mesh(&path);
        assert!(matches!(result, Err(Error::InvalidData(_))));

        std::fs::remove_file(&path).ok();
    }
}
