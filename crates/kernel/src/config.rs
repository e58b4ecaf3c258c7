use brickyard_layout::{GridLayout, WallLayout};
use glam::{UVec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every tunable of a session. Missing YAML keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rules: RuleConfig,
    pub movement: MovementConfig,
    pub scene: SceneConfig,
}

/// Counters and gates of the pickup/deliver loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Bricks the wheelbarrow holds at once.
    pub capacity: u32,
    /// Deliveries needed to win.
    pub target: u32,
    /// Bricks per spawn wave.
    pub batch_size: u32,
    /// Reach for grabbing the wheelbarrow and for zone interactions.
    pub interaction_radius: f32,
    /// Minimum cosine between forward and direction-to-zone.
    pub facing_threshold: f32,
    /// Whether load/deliver require facing the zone.
    pub require_facing: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            target: 9,
            batch_size: 3,
            interaction_radius: 2.0,
            facing_threshold: 0.7,
            require_facing: true,
        }
    }
}

/// Ground-plane rectangle the player may stand in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Minimum `(x, z)`.
    pub min: Vec2,
    /// Maximum `(x, z)`.
    pub max: Vec2,
}

impl Default for WorldBounds {
    fn default() -> Self {
        // +X stops short of the wall at x = 8.
        Self {
            min: Vec2::new(-14.0, -9.0),
            max: Vec2::new(7.5, 9.0),
        }
    }
}

impl WorldBounds {
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.y && p.z <= self.max.y
    }
}

/// Speeds are per second; turn speed is radians per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_speed: f32,
    /// Speed while pushing the wheelbarrow.
    pub push_speed: f32,
    pub turn_speed: f32,
    /// Footprint half-width added to obstacle boxes.
    pub player_radius: f32,
    /// Closest approach to a wheelbarrow the player is not pushing.
    pub wheelbarrow_separation: f32,
    /// Distance in front of the player an attached wheelbarrow rides.
    pub carry_distance: f32,
    pub bounds: WorldBounds,
}

impl Default for MovementConfig {
    fn default() -> Self {
        // 0.08 / 0.05 / 0.04 per frame at 60 fps.
        Self {
            move_speed: 4.8,
            push_speed: 3.0,
            turn_speed: 2.4,
            player_radius: 0.5,
            wheelbarrow_separation: 1.2,
            carry_distance: 1.5,
            bounds: WorldBounds::default(),
        }
    }
}

/// Static, axis-aligned region on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub center: Vec3,
    pub half_extents: Vec3,
}

/// Where things start and how they are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub player_start: Vec3,
    pub player_start_yaw: f32,
    pub wheelbarrow_start: Vec3,
    pub pickup_zone: Zone,
    pub delivery_zone: Zone,
    /// Local offsets of loaded bricks relative to the wheelbarrow.
    pub carry_slots: Vec<Vec3>,
    /// Spacing of a spawn wave along X.
    pub spawn_spacing: f32,
    /// Resting height of a brick on the ground.
    pub brick_rest_y: f32,
    /// Full brick size (long side along X).
    pub brick_size: Vec3,
    pub wall: WallLayout,
    /// Decorative stack beside the pickup zone.
    pub decorative_pile: GridLayout,
    /// Decorative wall already built at the delivery end. Bricks are turned a quarter.
    pub decorative_wall: GridLayout,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let wall = WallLayout::default();
        Self {
            player_start: Vec3::new(0.0, 0.9, -4.0),
            player_start_yaw: 0.0,
            wheelbarrow_start: Vec3::new(-4.0, 0.3, -1.0),
            pickup_zone: Zone {
                center: Vec3::new(-8.0, 0.05, 0.0),
                half_extents: Vec3::new(2.0, 0.05, 1.5),
            },
            delivery_zone: Zone {
                center: Vec3::new(wall.base_x - 1.5, 0.05, wall.start_z + wall.col_step),
                half_extents: Vec3::new(2.0, 0.05, 1.5),
            },
            carry_slots: vec![
                Vec3::new(-0.4, 0.4, 0.0),
                Vec3::new(0.0, 0.4, 0.0),
                Vec3::new(0.4, 0.4, 0.0),
            ],
            spawn_spacing: 0.7,
            brick_rest_y: 0.15,
            brick_size: Vec3::new(0.6, 0.3, 0.3),
            wall,
            decorative_pile: GridLayout::new(
                Vec3::new(-8.7, 0.15, 0.5),
                UVec3::new(3, 2, 6),
                Vec3::new(0.7, 0.32, 0.35),
            ),
            decorative_wall: GridLayout::new(
                Vec3::new(8.0, 0.15, 0.2),
                UVec3::new(1, 3, 5),
                Vec3::new(0.0, 0.32, 0.65),
            ),
        }
    }
}

impl GameConfig {
    /// Parse a YAML document. Does not validate.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject configurations the rules cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.rules;
        let m = &self.movement;
        let s = &self.scene;
        if r.capacity == 0 {
            return invalid("capacity must be at least 1");
        }
        if r.batch_size == 0 {
            return invalid("batch_size must be at least 1");
        }
        if r.target == 0 {
            return invalid("target must be at least 1");
        }
        if r.capacity as usize > s.carry_slots.len() {
            return invalid(format!(
                "capacity {} exceeds the {} carry slots",
                r.capacity,
                s.carry_slots.len()
            ));
        }
        if !(r.interaction_radius.is_finite() && r.interaction_radius > 0.0) {
            return invalid("interaction_radius must be positive");
        }
        if !(-1.0..=1.0).contains(&r.facing_threshold) {
            return invalid("facing_threshold must lie in [-1, 1]");
        }
        for (name, v) in [
            ("move_speed", m.move_speed),
            ("push_speed", m.push_speed),
            ("turn_speed", m.turn_speed),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return invalid(format!("{name} must be positive"));
            }
        }
        if !(m.player_radius.is_finite() && m.player_radius >= 0.0) {
            return invalid("player_radius must not be negative");
        }
        if m.bounds.min.x >= m.bounds.max.x || m.bounds.min.y >= m.bounds.max.y {
            return invalid("world bounds are inverted");
        }
        if !(m.wheelbarrow_separation.is_finite() && m.wheelbarrow_separation >= 0.0) {
            return invalid("wheelbarrow_separation must not be negative");
        }
        if !(m.carry_distance.is_finite() && m.carry_distance >= 0.0) {
            return invalid("carry_distance must not be negative");
        }
        if !(s.spawn_spacing.is_finite() && s.spawn_spacing >= 0.0) {
            return invalid("spawn_spacing must not be negative");
        }
        if !s.brick_rest_y.is_finite() {
            return invalid("brick_rest_y must be finite");
        }
        if !(s.brick_size.is_finite() && s.brick_size.min_element() > 0.0) {
            return invalid("brick_size must be positive");
        }
        if s.wall.bricks_per_row == 0 {
            return invalid("wall.bricks_per_row must be at least 1");
        }
        for (name, grid) in [
            ("decorative_pile", &s.decorative_pile),
            ("decorative_wall", &s.decorative_wall),
        ] {
            match grid.cell_count() {
                Some(n) if n <= GridLayout::MAX_CELLS => {}
                _ => {
                    return invalid(format!(
                        "{name} has more than {} cells",
                        GridLayout::MAX_CELLS
                    ));
                }
            }
            if !(grid.origin.is_finite() && grid.step.is_finite()) {
                return invalid(format!("{name} origin and step must be finite"));
            }
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg.into()))
}
