use brickyard_common::{Aabb, BrickId, Transform, forward_from_yaw, is_facing, planar_distance};
use brickyard_layout::batch_offsets;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::config::{ConfigError, GameConfig, Zone};

/// An event record produced by every rule-driven mutation of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WheelbarrowAttached { position: Vec3 },
    WheelbarrowReleased { position: Vec3 },
    BrickLoaded { brick: BrickId, slot: usize },
    BrickDelivered { brick: BrickId, index: u32, position: Vec3 },
    WaveSpawned { bricks: Vec<BrickId> },
    GameWon { delivered: u32 },
    Reset,
}

/// The player avatar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    /// Radians about +Y; 0 faces +Z.
    pub yaw: f32,
}

impl Player {
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position(self.position).with_yaw(self.yaw)
    }
}

/// The single wheelbarrow.
///
/// While attached its pose is derived from the player every tick; while
/// detached it stays where it was released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wheelbarrow {
    pub position: Vec3,
    pub yaw: f32,
    pub attached: bool,
}

impl Wheelbarrow {
    /// Snap in front of `player`, keeping the wheelbarrow's own height.
    pub(crate) fn follow(&mut self, player: &Player, distance: f32) {
        let ahead = player.position + player.forward() * distance;
        self.position = Vec3::new(ahead.x, self.position.y, ahead.z);
        self.yaw = player.yaw;
    }

    pub fn transform(&self) -> Transform {
        Transform::from_position(self.position).with_yaw(self.yaw)
    }
}

/// Which collection holds a brick. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BrickPlacement {
    /// Waiting in the pickup pile at a world position.
    Pile { position: Vec3 },
    /// Riding the wheelbarrow in a carry slot (local offset, resolved on read).
    Wheelbarrow { slot: usize },
    /// Resting in the wall at a delivery index.
    Delivered { index: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: BrickId,
    pub placement: BrickPlacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    PileBrick,
    WallBrick,
    /// Imported decorative model.
    Prop,
}

/// Static geometry the player cannot walk into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub kind: ObstacleKind,
}

/// Counters of the session. `delivered <= target`; `game_over` is sticky until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub delivered: u32,
    pub target: u32,
    pub batch_size: u32,
    pub capacity: u32,
    pub game_over: bool,
}

impl GameState {
    pub fn remaining(&self) -> u32 {
        self.target.saturating_sub(self.delivered)
    }
}

/// Compound carrying state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarryState {
    Idle,
    Pushing,
    GameOver,
}

/// Distance and facing readings the HUD and rules share.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub player_to_wheelbarrow: f32,
    pub wheelbarrow_to_pickup: f32,
    pub wheelbarrow_to_delivery: f32,
    pub near_wheelbarrow: bool,
    pub at_pickup: bool,
    pub at_delivery: bool,
    /// Facing the pickup zone, or facing not required.
    pub facing_pickup: bool,
    /// Facing the delivery zone, or facing not required.
    pub facing_delivery: bool,
}

/// The authoritative game state.
///
/// All mutations go through explicit operations owned by the single game-loop
/// driver. Renderers and the HUD read it; they never write it.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) config: GameConfig,
    pub(crate) player: Player,
    pub(crate) wheelbarrow: Wheelbarrow,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) bricks: BTreeMap<BrickId, Brick>,
    pub(crate) pickup_pile: VecDeque<BrickId>,
    pub(crate) carried: Vec<BrickId>,
    pub(crate) delivered: Vec<BrickId>,
    pub(crate) state: GameState,
    next_brick_id: u64,
    pub(crate) tick: u64,
    /// Append-only log of rule-driven mutations.
    pub(crate) event_log: Vec<GameEvent>,
}

impl Default for World {
    fn default() -> Self {
        Self::build(GameConfig::default())
    }
}

impl World {
    /// Validate `config` and set up a fresh scene.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: GameConfig) -> Self {
        let scene = &config.scene;
        let rules = &config.rules;
        let player = Player {
            position: scene.player_start,
            yaw: scene.player_start_yaw,
        };
        let wheelbarrow = Wheelbarrow {
            position: scene.wheelbarrow_start,
            yaw: 0.0,
            attached: false,
        };

        let half = scene.brick_size * 0.5;
        // Quarter-turned bricks swap their X and Z footprint.
        let turned = Vec3::new(half.z, half.y, half.x);
        let mut obstacles = Vec::new();
        for p in scene.decorative_pile.positions() {
            obstacles.push(Obstacle {
                bounds: Aabb::from_center_half_extents(p, half),
                kind: ObstacleKind::PileBrick,
            });
        }
        for p in scene.decorative_wall.positions() {
            obstacles.push(Obstacle {
                bounds: Aabb::from_center_half_extents(p, turned),
                kind: ObstacleKind::WallBrick,
            });
        }

        let state = GameState {
            delivered: 0,
            target: rules.target,
            batch_size: rules.batch_size,
            capacity: rules.capacity,
            game_over: false,
        };

        let mut world = Self {
            config,
            player,
            wheelbarrow,
            obstacles,
            bricks: BTreeMap::new(),
            pickup_pile: VecDeque::new(),
            carried: Vec::new(),
            delivered: Vec::new(),
            state,
            next_brick_id: 0,
            tick: 0,
            event_log: Vec::new(),
        };
        world.place_batch();
        world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn wheelbarrow(&self) -> &Wheelbarrow {
        &self.wheelbarrow
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_pushing(&self) -> bool {
        self.wheelbarrow.attached
    }

    pub fn carry_state(&self) -> CarryState {
        if self.state.game_over {
            CarryState::GameOver
        } else if self.wheelbarrow.attached {
            CarryState::Pushing
        } else {
            CarryState::Idle
        }
    }

    pub fn pickup_zone(&self) -> &Zone {
        &self.config.scene.pickup_zone
    }

    pub fn delivery_zone(&self) -> &Zone {
        &self.config.scene.delivery_zone
    }

    /// Pile bricks, oldest first.
    pub fn pickup_pile(&self) -> &VecDeque<BrickId> {
        &self.pickup_pile
    }

    /// Loaded bricks, in load order.
    pub fn carried(&self) -> &[BrickId] {
        &self.carried
    }

    /// Delivered bricks, in delivery order.
    pub fn delivered(&self) -> &[BrickId] {
        &self.delivered
    }

    /// All live bricks (BTreeMap for deterministic iteration).
    pub fn bricks(&self) -> &BTreeMap<BrickId, Brick> {
        &self.bricks
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Add a static obstacle, e.g. the bounds of a loaded prop.
    pub fn add_obstacle(&mut self, bounds: Aabb, kind: ObstacleKind) {
        tracing::debug!(?bounds, ?kind, "obstacle added");
        self.obstacles.push(Obstacle { bounds, kind });
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Put the player at a pose without collision checks (scene setup,
    /// scripted teleports). An attached wheelbarrow follows.
    pub fn set_player_pose(&mut self, position: Vec3, yaw: f32) {
        self.player = Player { position, yaw };
        if self.wheelbarrow.attached {
            self.wheelbarrow
                .follow(&self.player, self.config.movement.carry_distance);
        }
    }

    /// World transform of a brick, resolving carry slots through the wheelbarrow.
    pub fn brick_transform(&self, id: BrickId) -> Option<Transform> {
        let brick = self.bricks.get(&id)?;
        let t = match brick.placement {
            BrickPlacement::Pile { position } => Transform::from_position(position),
            BrickPlacement::Wheelbarrow { slot } => {
                let local = self
                    .config
                    .scene
                    .carry_slots
                    .get(slot)
                    .copied()
                    .unwrap_or(Vec3::new(0.0, 0.4, 0.0));
                let rotation = Quat::from_rotation_y(self.wheelbarrow.yaw);
                Transform {
                    position: self.wheelbarrow.position + rotation * local,
                    rotation,
                    ..Transform::default()
                }
            }
            BrickPlacement::Delivered { index } => self.config.scene.wall.transform(index),
        };
        Some(t)
    }

    /// Distances and facing relevant to the interaction rules.
    pub fn proximity(&self) -> Proximity {
        let rules = &self.config.rules;
        let pickup = self.pickup_zone().center;
        let delivery = self.delivery_zone().center;
        let player_to_wheelbarrow =
            planar_distance(self.player.position, self.wheelbarrow.position);
        let wheelbarrow_to_pickup = planar_distance(self.wheelbarrow.position, pickup);
        let wheelbarrow_to_delivery = planar_distance(self.wheelbarrow.position, delivery);
        let facing = |target: Vec3| {
            !rules.require_facing
                || is_facing(
                    self.player.position,
                    self.player.yaw,
                    target,
                    rules.facing_threshold,
                )
        };
        Proximity {
            player_to_wheelbarrow,
            wheelbarrow_to_pickup,
            wheelbarrow_to_delivery,
            near_wheelbarrow: player_to_wheelbarrow <= rules.interaction_radius,
            at_pickup: wheelbarrow_to_pickup <= rules.interaction_radius,
            at_delivery: wheelbarrow_to_delivery <= rules.interaction_radius,
            facing_pickup: facing(pickup),
            facing_delivery: facing(delivery),
        }
    }

    /// Create `batch_size` bricks in a row across the pickup zone centre.
    pub(crate) fn place_batch(&mut self) -> Vec<BrickId> {
        let scene = &self.config.scene;
        let center = scene.pickup_zone.center;
        let y = scene.brick_rest_y;
        let offsets = batch_offsets(self.state.batch_size, scene.spawn_spacing);
        let mut ids = Vec::with_capacity(offsets.len());
        for dx in offsets {
            let id = BrickId(self.next_brick_id);
            self.next_brick_id += 1;
            let position = Vec3::new(center.x + dx, y, center.z);
            self.bricks.insert(
                id,
                Brick {
                    id,
                    placement: BrickPlacement::Pile { position },
                },
            );
            self.pickup_pile.push_back(id);
            ids.push(id);
        }
        ids
    }

    /// Back to the start of a session with the same config.
    pub fn reset(&mut self) {
        let config = self.config.clone();
        let obstacles: Vec<Obstacle> = self
            .obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Prop)
            .copied()
            .collect();
        *self = Self::build(config);
        self.obstacles.extend(obstacles);
        self.event_log.push(GameEvent::Reset);
        tracing::info!("session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_world_has_one_batch_in_the_pile() {
        let w = World::default();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.pickup_pile().len(), 3);
        assert!(w.carried().is_empty());
        assert!(w.delivered().is_empty());
        assert_eq!(w.bricks().len(), 3);
        assert_eq!(w.carry_state(), CarryState::Idle);
        assert!(w.events().is_empty());
    }

    #[test]
    fn batch_is_laid_across_pickup_centre() {
        let w = World::default();
        let xs: Vec<f32> = w
            .pickup_pile()
            .iter()
            .map(|id| w.brick_transform(*id).unwrap().position.x)
            .collect();
        assert!((xs[0] + 8.7).abs() < 1e-5);
        assert!((xs[1] + 8.0).abs() < 1e-5);
        assert!((xs[2] + 7.3).abs() < 1e-5);
    }

    #[test]
    fn decorations_become_obstacles() {
        let w = World::default();
        let pile = w
            .obstacles()
            .iter()
            .filter(|o| o.kind == ObstacleKind::PileBrick)
            .count();
        let wall = w
            .obstacles()
            .iter()
            .filter(|o| o.kind == ObstacleKind::WallBrick)
            .count();
        assert_eq!(pile, 36);
        assert_eq!(wall, 15);
    }

    #[test]
    fn wall_obstacles_are_quarter_turned() {
        let w = World::default();
        let wall = w
            .obstacles()
            .iter()
            .find(|o| o.kind == ObstacleKind::WallBrick)
            .unwrap();
        let size = wall.bounds.size();
        assert!((size.x - 0.3).abs() < 1e-5);
        assert!((size.z - 0.6).abs() < 1e-5);
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut config = GameConfig::default();
        config.rules.target = 0;
        assert!(World::new(config).is_err());
    }

    #[test]
    fn set_player_pose_drags_attached_wheelbarrow() {
        let mut w = World::default();
        w.wheelbarrow.attached = true;
        w.set_player_pose(Vec3::new(1.0, 0.9, 1.0), std::f32::consts::FRAC_PI_2);
        let wb = w.wheelbarrow().position;
        assert!((wb.x - 2.5).abs() < 1e-5);
        assert!((wb.z - 1.0).abs() < 1e-5);
        assert!((wb.y - 0.3).abs() < 1e-5);
    }

    #[test]
    fn proximity_uses_ground_plane() {
        let mut w = World::default();
        w.set_player_pose(Vec3::new(-4.0, 50.0, -2.5), 0.0);
        let p = w.proximity();
        assert!((p.player_to_wheelbarrow - 1.5).abs() < 1e-5);
        assert!(p.near_wheelbarrow);
    }

    #[test]
    fn facing_ignored_when_not_required() {
        let mut config = GameConfig::default();
        config.rules.require_facing = false;
        let mut w = World::new(config).unwrap();
        w.set_player_pose(Vec3::ZERO, std::f32::consts::PI);
        let p = w.proximity();
        assert!(p.facing_pickup);
        assert!(p.facing_delivery);
    }

    #[test]
    fn reset_keeps_props_and_logs() {
        let mut w = World::default();
        w.add_obstacle(
            Aabb::from_center_half_extents(Vec3::new(3.0, 1.0, 3.0), Vec3::ONE),
            ObstacleKind::Prop,
        );
        w.set_player_pose(Vec3::new(2.0, 0.9, 2.0), 1.0);
        w.reset();
        assert_eq!(w.player().position, w.config().scene.player_start);
        assert_eq!(
            w.obstacles()
                .iter()
                .filter(|o| o.kind == ObstacleKind::Prop)
                .count(),
            1
        );
        assert_eq!(w.events(), &[GameEvent::Reset]);
    }
}
