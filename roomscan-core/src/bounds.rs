//! The active capture region

use crate::{Error, Point3f, Result, Vector3f};
use serde::{Deserialize, Serialize};

/// Axis-aligned box delimiting the region of the physical scene that gets
/// scanned. Placed once, immutable afterwards; shared read-only by the
/// ingest and export stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    min: Point3f,
    max: Point3f,
}

impl BoundingVolume {
    /// Create a volume from explicit corners. Fails unless `min < max` on
    /// every axis.
    pub fn new(min: Point3f, max: Point3f) -> Result<Self> {
        if min.x < max.x && min.y < max.y && min.z < max.z {
            Ok(Self { min, max })
        } else {
            Err(Error::InvalidData(format!(
                "degenerate bounding volume: min {:?}, max {:?}",
                min, max
            )))
        }
    }

    /// The default scanning-room volume around a placed center: one meter
    /// wide and tall, extending one meter back from the center along z.
    pub fn scan_region(center: Point3f) -> Self {
        Self {
            min: Point3f::new(center.x - 0.5, center.y - 0.5, center.z - 1.0),
            max: Point3f::new(center.x + 0.5, center.y + 0.5, center.z),
        }
    }

    /// A volume derived from a selection object's position and scale, used
    /// by the object-scan flow.
    pub fn around_object(position: Point3f, scale: Vector3f) -> Result<Self> {
        Self::new(position - scale, position + scale)
    }

    /// A volume centered on `center` with the given half extents.
    pub fn from_center_half_extents(center: Point3f, half_extents: Vector3f) -> Result<Self> {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Half-open membership test: a point on the min face is inside, a
    /// point on the max face is outside.
    pub fn contains(&self, point: &Point3f) -> bool {
        self.min.x <= point.x
            && self.min.y <= point.y
            && self.min.z <= point.z
            && self.max.x > point.x
            && self.max.y > point.y
            && self.max.z > point.z
    }

    pub fn min(&self) -> Point3f {
        self.min
    }

    pub fn max(&self) -> Point3f {
        self.max
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }
}
