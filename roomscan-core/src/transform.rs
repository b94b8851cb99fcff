//! World-space transforms for anchor-local geometry

use crate::{Matrix4, Point3f, Vector3f};

/// Transform an anchor-local vertex position to world space.
///
/// Follows the source convention for anchor geometry: compose the anchor
/// transform with a translation built from the local position and extract
/// the translation column. For points this is exactly `transform * p`.
pub fn world_point(transform: &Matrix4<f32>, local: [f32; 3]) -> Point3f {
    let translation = Matrix4::new_translation(&Vector3f::new(local[0], local[1], local[2]));
    let world = transform * translation;
    Point3f::new(world[(0, 3)], world[(1, 3)], world[(2, 3)])
}

/// Transform an anchor-local normal to world space using the upper 3x3
/// linear part of the anchor transform. Normals carry no position, so the
/// translation column must not contribute.
pub fn world_normal(transform: &Matrix4<f32>, local: [f32; 3]) -> Vector3f {
    let linear = transform.fixed_view::<3, 3>(0, 0);
    linear * Vector3f::new(local[0], local[1], local[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn world_point_matches_direct_point_transform() {
        let transform = Matrix4::new_translation(&Vector3f::new(1.0, -2.0, 0.5))
            * Matrix4::from_euler_angles(0.1, 0.7, -0.3);
        let local = [0.3f32, -0.1, 0.9];

        let via_translation = world_point(&transform, local);
        let direct = transform.transform_point(&Point3f::new(local[0], local[1], local[2]));

        assert_relative_eq!(via_translation, direct, epsilon = 1e-5);
    }

    #[test]
    fn world_normal_ignores_translation() {
        let rotation = Matrix4::from_euler_angles(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let transform = Matrix4::new_translation(&Vector3f::new(10.0, 20.0, 30.0)) * rotation;

        let normal = world_normal(&transform, [0.0, 0.0, 1.0]);
        let expected = world_normal(&rotation, [0.0, 0.0, 1.0]);

        assert_relative_eq!(normal, expected, epsilon = 1e-5);
        assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn identity_transform_is_a_no_op() {
        let identity = Matrix4::identity();
        assert_relative_eq!(
            world_point(&identity, [0.1, 0.2, 0.3]),
            Point3f::new(0.1, 0.2, 0.3)
        );
        assert_relative_eq!(
            world_normal(&identity, [0.0, 1.0, 0.0]),
            Vector3f::new(0.0, 1.0, 0.0)
        );
    }
}
