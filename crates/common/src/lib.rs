//! Shared value types for the brickyard workspace.
//!
//! Everything here is plain data or a pure function. Ground-plane helpers
//! ignore the vertical axis: the game measures reach and facing on XZ only.

pub mod plane;
pub mod types;

pub use plane::{forward_from_yaw, is_facing, planar, planar_distance};
pub use types::{Aabb, BrickId, Transform};
