use glam::{Vec2, Vec3};

/// Project a world position onto the ground plane as `(x, z)`.
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Distance between two points with the vertical component ignored.
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Unit forward vector for a yaw about +Y. Yaw 0 faces +Z, yaw π/2 faces +X.
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Whether an observer at `position` looking along `yaw` faces `target`.
///
/// Facing means the cosine between the forward vector and the direction to
/// the target, both on the ground plane, is at least `threshold_dot`. A target
/// at the observer's own planar position counts as faced.
pub fn is_facing(position: Vec3, yaw: f32, target: Vec3, threshold_dot: f32) -> bool {
    let to_target = planar(target) - planar(position);
    if to_target.length_squared() == 0.0 {
        return true;
    }
    let forward = planar(forward_from_yaw(yaw));
    forward.dot(to_target.normalize()) >= threshold_dot
}
