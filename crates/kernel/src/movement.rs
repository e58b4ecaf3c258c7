//! Per-tick movement integration and the collision gate.

use brickyard_common::{forward_from_yaw, planar_distance};
use glam::Vec3;

use crate::world::World;

/// Desired motion for one tick. Each axis is clamped to `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    /// +1 forward, -1 backward.
    pub forward: f32,
    /// +1 turns clockwise seen from above (towards +X from +Z).
    pub turn: f32,
}

impl MoveIntent {
    pub fn new(forward: f32, turn: f32) -> Self {
        Self { forward, turn }
    }

    fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            forward: clamp(self.forward),
            turn: clamp(self.turn),
        }
    }
}

/// Why a proposed position was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejected {
    #[error("outside the world bounds")]
    OutOfBounds,
    #[error("too close to the wheelbarrow")]
    TooCloseToWheelbarrow,
    #[error("blocked by obstacle {obstacle}")]
    Blocked { obstacle: usize },
}

/// What a tick did to the player's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Game over; nothing moves.
    Frozen,
    /// No translation requested.
    Stationary,
    Moved(Vec3),
    Blocked(MoveRejected),
}

impl World {
    /// Advance one tick: turn, then try to translate, then drag an attached wheelbarrow.
    pub fn step(&mut self, dt: f32, intent: MoveIntent) -> MoveOutcome {
        let _span = tracing::trace_span!("world_step", tick = self.tick).entered();
        self.tick += 1;

        if self.state.game_over {
            return MoveOutcome::Frozen;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let intent = intent.clamped();
        let movement = self.config.movement;

        if intent.turn != 0.0 {
            self.player.yaw += intent.turn * movement.turn_speed * dt;
        }

        let outcome = if intent.forward == 0.0 || dt == 0.0 {
            MoveOutcome::Stationary
        } else {
            let speed = if self.wheelbarrow.attached {
                movement.push_speed
            } else {
                movement.move_speed
            };
            let candidate = self.player.position
                + forward_from_yaw(self.player.yaw) * intent.forward * speed * dt;
            match self.check_move(candidate) {
                Ok(()) => {
                    self.player.position = candidate;
                    MoveOutcome::Moved(candidate)
                }
                Err(reason) => {
                    tracing::trace!(%reason, ?candidate, "move rejected");
                    MoveOutcome::Blocked(reason)
                }
            }
        };

        if self.wheelbarrow.attached {
            self.wheelbarrow
                .follow(&self.player, movement.carry_distance);
        }
        outcome
    }

    /// Gate a proposed player position against bounds, the idle wheelbarrow
    /// and every static obstacle.
    pub fn check_move(&self, candidate: Vec3) -> Result<(), MoveRejected> {
        let movement = &self.config.movement;
        if !movement.bounds.contains(candidate) {
            return Err(MoveRejected::OutOfBounds);
        }

        if !self.wheelbarrow.attached {
            let wb = self.wheelbarrow.position;
            let now = planar_distance(self.player.position, wb);
            let next = planar_distance(candidate, wb);
            if next < movement.wheelbarrow_separation && next < now {
                return Err(MoveRejected::TooCloseToWheelbarrow);
            }
        }

        if let Some(obstacle) = self.obstacles.iter().position(|o| {
            o.bounds
                .inflated_xz(movement.player_radius)
                .contains_xz(candidate)
        }) {
            return Err(MoveRejected::Blocked { obstacle });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::world::ObstacleKind;
    use brickyard_common::Aabb;
    use std::f32::consts::{FRAC_PI_2, PI};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn step_increments_tick() {
        let mut w = World::default();
        w.step(DT, MoveIntent::default());
        w.step(DT, MoveIntent::default());
        w.step(DT, MoveIntent::default());
        assert_eq!(w.tick(), 3);
    }

    #[test]
    fn forward_moves_along_yaw_scaled_by_dt() {
        let mut w = World::default();
        let start = w.player().position;
        let outcome = w.step(0.5, MoveIntent::new(1.0, 0.0));
        assert!(matches!(outcome, MoveOutcome::Moved(_)));
        let moved = w.player().position - start;
        assert!((moved.z - 2.4).abs() < 1e-4);
        assert!(moved.x.abs() < 1e-5);
    }

    #[test]
    fn pushing_is_slower() {
        let mut w = World::default();
        w.set_player_pose(Vec3::new(-4.0, 0.9, -2.5), PI);
        w.wheelbarrow.attached = true;
        w.set_player_pose(Vec3::new(-4.0, 0.9, -2.5), PI);
        let start = w.player().position;
        w.step(1.0, MoveIntent::new(1.0, 0.0));
        let moved = (w.player().position - start).length();
        assert!((moved - 3.0).abs() < 1e-4);
        // The wheelbarrow rides along in front.
        let wb = w.wheelbarrow().position;
        assert!((wb.z - (w.player().position.z - 1.5)).abs() < 1e-4);
    }

    #[test]
    fn turning_is_never_blocked() {
        let mut w = World::default();
        // Pin the player against the +X bound.
        w.set_player_pose(Vec3::new(7.5, 0.9, -6.0), FRAC_PI_2);
        let before = w.player().position;
        let outcome = w.step(0.5, MoveIntent::new(1.0, 1.0));
        assert_eq!(outcome, MoveOutcome::Blocked(MoveRejected::OutOfBounds));
        assert_eq!(w.player().position, before);
        assert!((w.player().yaw - (FRAC_PI_2 + 1.2)).abs() < 1e-5);
    }

    #[test]
    fn out_of_bounds_on_any_axis_is_rejected() {
        let w = World::default();
        for candidate in [
            Vec3::new(-14.01, 0.9, 0.0),
            Vec3::new(7.51, 0.9, 0.0),
            Vec3::new(0.0, 0.9, -9.01),
            Vec3::new(0.0, 0.9, 9.01),
        ] {
            assert_eq!(w.check_move(candidate), Err(MoveRejected::OutOfBounds));
        }
        assert_eq!(w.check_move(Vec3::new(0.0, 0.9, 0.0)), Ok(()));
    }

    #[test]
    fn approaching_idle_wheelbarrow_is_limited() {
        let mut w = World::default();
        // Wheelbarrow at (-4, -1); stand 1.3 south of it facing it.
        w.set_player_pose(Vec3::new(-4.0, 0.9, -2.3), 0.0);
        assert_eq!(
            w.check_move(Vec3::new(-4.0, 0.9, -2.1)),
            Err(MoveRejected::TooCloseToWheelbarrow)
        );
        // Stepping back out is fine.
        w.set_player_pose(Vec3::new(-4.0, 0.9, -1.9), 0.0);
        assert_eq!(w.check_move(Vec3::new(-4.0, 0.9, -2.0)), Ok(()));
    }

    #[test]
    fn obstacles_block_with_player_radius() {
        let mut w = World::default();
        w.add_obstacle(
            Aabb::from_center_half_extents(Vec3::new(0.0, 0.5, 3.0), Vec3::splat(0.5)),
            ObstacleKind::Prop,
        );
        let index = w.obstacles().len() - 1;
        // Within 0.5 + radius 0.5 of the prop centre on Z.
        assert_eq!(
            w.check_move(Vec3::new(0.0, 0.9, 2.1)),
            Err(MoveRejected::Blocked { obstacle: index })
        );
        assert_eq!(w.check_move(Vec3::new(0.0, 0.9, 1.9)), Ok(()));
    }

    #[test]
    fn decorative_pile_blocks_the_player() {
        let w = World::default();
        assert!(matches!(
            w.check_move(Vec3::new(-8.0, 0.9, 1.0)),
            Err(MoveRejected::Blocked { .. })
        ));
    }

    #[test]
    fn game_over_freezes_movement() {
        let mut config = GameConfig::default();
        config.rules.target = 1;
        let mut w = World::new(config).unwrap();
        w.state.game_over = true;
        let before = *w.player();
        assert_eq!(w.step(1.0, MoveIntent::new(1.0, 1.0)), MoveOutcome::Frozen);
        assert_eq!(*w.player(), before);
    }

    #[test]
    fn bad_dt_or_intent_does_not_move() {
        let mut w = World::default();
        let before = w.player().position;
        assert_eq!(
            w.step(f32::NAN, MoveIntent::new(1.0, 0.0)),
            MoveOutcome::Stationary
        );
        assert_eq!(
            w.step(-1.0, MoveIntent::new(1.0, 0.0)),
            MoveOutcome::Stationary
        );
        assert_eq!(
            w.step(DT, MoveIntent::new(f32::NAN, 0.0)),
            MoveOutcome::Stationary
        );
        assert_eq!(w.player().position, before);
    }

    #[test]
    fn intent_is_clamped() {
        let mut w = World::default();
        let start = w.player().position;
        w.step(0.5, MoveIntent::new(10.0, 0.0));
        assert!(((w.player().position - start).length() - 2.4).abs() < 1e-4);
    }
}
