use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Identifier of a brick within one session.
///
/// Ids are handed out from a monotonically increasing counter, so ordering
/// by id is ordering by spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrickId(pub u64);

impl std::fmt::Display for BrickId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "brick#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity rotation and scale at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Same transform rotated to `yaw` radians about +Y.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.rotation = Quat::from_rotation_y(yaw);
        self
    }

    /// Rotation about +Y in radians.
    pub fn yaw(&self) -> f32 {
        let (yaw, _, _) = self.rotation.to_euler(glam::EulerRot::YXZ);
        yaw
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` reaching `half_extents` along each axis.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// The empty box: the identity for [`Aabb::union`].
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// True when min <= max on every axis and all corners are finite.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Smallest box enclosing every box in `boxes`. Empty input gives [`Aabb::empty`].
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a Aabb>) -> Aabb {
        boxes
            .into_iter()
            .fold(Aabb::empty(), |acc, b| acc.union(b))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Grow the footprint by `margin` on X and Z. Height is untouched.
    pub fn inflated_xz(&self, margin: f32) -> Aabb {
        let grow = Vec3::new(margin, 0.0, margin);
        Aabb {
            min: self.min - grow,
            max: self.max + grow,
        }
    }

    /// Whether `point` lies inside the footprint (vertical ignored, edges inclusive).
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned box around this box after an affine transform.
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        self.corners()
            .into_iter()
            .map(|c| m.transform_point3(c))
            .fold(Aabb::empty(), |acc, p| Aabb {
                min: acc.min.min(p),
                max: acc.max.max(p),
            })
    }

    /// Apply `p * scale + translation` to both corners.
    pub fn scaled_translated(&self, scale: f32, translation: Vec3) -> Aabb {
        Aabb {
            min: self.min * scale + translation,
            max: self.max * scale + translation,
        }
    }
}
