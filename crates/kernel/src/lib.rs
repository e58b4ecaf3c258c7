//! Game kernel: authoritative world state, interaction rules, movement gate.
//!
//! # Invariants
//! - A brick belongs to exactly one of pile, wheelbarrow or wall.
//! - `0 <= delivered <= target`; reaching the target sets game over until reset.
//! - Rejected actions never mutate state.
//! - All state mutations flow through explicit operations on [`World`].

pub mod config;
pub mod movement;
pub mod rules;
pub mod world;

pub use config::{
    ConfigError, GameConfig, MovementConfig, RuleConfig, SceneConfig, WorldBounds, Zone,
};
pub use movement::{MoveIntent, MoveOutcome, MoveRejected};
pub use rules::{ActionRejected, Delivery, Interaction, WheelbarrowToggle, ZoneKind};
pub use world::{
    Brick, BrickPlacement, CarryState, GameEvent, GameState, Obstacle, ObstacleKind, Player,
    Proximity, Wheelbarrow, World,
};
