//! Interaction rules: the pickup -> carry -> deliver state machine.
//!
//! Every operation checks its guards before touching anything. A rejected
//! action returns [`ActionRejected`] and leaves the world exactly as it was.

use brickyard_common::BrickId;
use glam::Vec3;

use crate::world::{BrickPlacement, GameEvent, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Pickup,
    Delivery,
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneKind::Pickup => write!(f, "pickup"),
            ZoneKind::Delivery => write!(f, "delivery"),
        }
    }
}

/// Why an interaction was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejected {
    #[error("the game is over")]
    GameOver,
    #[error("not pushing the wheelbarrow")]
    NotPushing,
    #[error("wheelbarrow is out of reach")]
    WheelbarrowTooFar,
    #[error("wheelbarrow is outside the {0} zone")]
    OutOfRange(ZoneKind),
    #[error("player is not facing the {0} zone")]
    NotFacing(ZoneKind),
    #[error("wheelbarrow is full")]
    WheelbarrowFull,
    #[error("pickup pile is empty")]
    PileEmpty,
    #[error("wheelbarrow is empty")]
    NothingCarried,
    #[error("no wave is due")]
    WaveNotDue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelbarrowToggle {
    Attached,
    Released,
}

/// Result of a successful delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub brick: BrickId,
    /// Zero-based index into the wall.
    pub index: u32,
    pub position: Vec3,
    /// Bricks of a wave triggered by this delivery, if any.
    pub wave: Option<Vec<BrickId>>,
    pub game_over: bool,
}

/// Result of the combined action key.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Loaded { brick: BrickId, slot: usize },
    Delivered(Delivery),
}

impl World {
    /// Grab the wheelbarrow when idle and in reach, or release it when pushing.
    pub fn toggle_wheelbarrow(&mut self) -> Result<WheelbarrowToggle, ActionRejected> {
        if self.state.game_over {
            return self.reject(ActionRejected::GameOver);
        }

        if self.wheelbarrow.attached {
            self.wheelbarrow.attached = false;
            let position = self.wheelbarrow.position;
            self.event_log.push(GameEvent::WheelbarrowReleased { position });
            tracing::info!(?position, "wheelbarrow released");
            return Ok(WheelbarrowToggle::Released);
        }

        if !self.proximity().near_wheelbarrow {
            return self.reject(ActionRejected::WheelbarrowTooFar);
        }
        self.wheelbarrow.attached = true;
        self.wheelbarrow
            .follow(&self.player, self.config.movement.carry_distance);
        let position = self.wheelbarrow.position;
        self.event_log.push(GameEvent::WheelbarrowAttached { position });
        tracing::info!(?position, "wheelbarrow attached");
        Ok(WheelbarrowToggle::Attached)
    }

    /// Move the oldest pile brick onto the next free carry slot.
    pub fn load_brick(&mut self) -> Result<BrickId, ActionRejected> {
        self.check_load()?;
        let Some(id) = self.pickup_pile.pop_front() else {
            return self.reject(ActionRejected::PileEmpty);
        };
        let slot = self.carried.len();
        if let Some(brick) = self.bricks.get_mut(&id) {
            brick.placement = BrickPlacement::Wheelbarrow { slot };
        }
        self.carried.push(id);
        self.event_log.push(GameEvent::BrickLoaded { brick: id, slot });
        tracing::info!(brick = %id, slot, carried = self.carried.len(), "brick loaded");
        Ok(id)
    }

    /// Move the most recently loaded brick into the wall.
    pub fn deliver_brick(&mut self) -> Result<Delivery, ActionRejected> {
        self.check_deliver()?;
        let Some(id) = self.carried.pop() else {
            return self.reject(ActionRejected::NothingCarried);
        };
        let index = self.state.delivered;
        if let Some(brick) = self.bricks.get_mut(&id) {
            brick.placement = BrickPlacement::Delivered { index };
        }
        self.delivered.push(id);
        self.state.delivered += 1;
        let position = self.config.scene.wall.position(index);
        self.event_log.push(GameEvent::BrickDelivered {
            brick: id,
            index,
            position,
        });
        tracing::info!(
            brick = %id,
            index,
            delivered = self.state.delivered,
            target = self.state.target,
            "brick delivered"
        );

        let mut wave = None;
        if self.state.delivered >= self.state.target {
            self.state.game_over = true;
            self.event_log.push(GameEvent::GameWon {
                delivered: self.state.delivered,
            });
            tracing::info!(delivered = self.state.delivered, "wall complete, game won");
        } else if self.wave_due() {
            wave = self.spawn_wave().ok();
        }

        Ok(Delivery {
            brick: id,
            index,
            position,
            wave,
            game_over: self.state.game_over,
        })
    }

    /// Whether the pile and wheelbarrow are empty at a batch boundary short of the target.
    pub fn wave_due(&self) -> bool {
        let s = &self.state;
        self.pickup_pile.is_empty()
            && self.carried.is_empty()
            && s.delivered > 0
            && s.delivered < s.target
            && s.delivered % s.batch_size == 0
    }

    /// Replenish the pickup pile with one batch when a wave is due.
    pub fn spawn_wave(&mut self) -> Result<Vec<BrickId>, ActionRejected> {
        if self.state.game_over {
            return self.reject(ActionRejected::GameOver);
        }
        if !self.wave_due() {
            return self.reject(ActionRejected::WaveNotDue);
        }
        let ids = self.place_batch();
        self.event_log.push(GameEvent::WaveSpawned { bricks: ids.clone() });
        tracing::info!(count = ids.len(), delivered = self.state.delivered, "wave spawned");
        Ok(ids)
    }

    /// The action key: load when possible, otherwise deliver.
    ///
    /// When both fail the reported reason belongs to the zone the
    /// wheelbarrow is in, defaulting to the delivery attempt.
    pub fn primary_action(&mut self) -> Result<Interaction, ActionRejected> {
        let load_err = match self.load_brick() {
            Ok(brick) => {
                let slot = self.carried.len() - 1;
                return Ok(Interaction::Loaded { brick, slot });
            }
            Err(e) => e,
        };
        match self.deliver_brick() {
            Ok(d) => Ok(Interaction::Delivered(d)),
            Err(deliver_err) => {
                let p = self.proximity();
                if p.at_pickup && !p.at_delivery {
                    Err(load_err)
                } else {
                    Err(deliver_err)
                }
            }
        }
    }

    fn check_load(&self) -> Result<(), ActionRejected> {
        self.check_pushing()?;
        let p = self.proximity();
        if !p.at_pickup {
            return self.reject(ActionRejected::OutOfRange(ZoneKind::Pickup));
        }
        if !p.facing_pickup {
            return self.reject(ActionRejected::NotFacing(ZoneKind::Pickup));
        }
        if self.carried.len() >= self.state.capacity as usize {
            return self.reject(ActionRejected::WheelbarrowFull);
        }
        if self.pickup_pile.is_empty() {
            return self.reject(ActionRejected::PileEmpty);
        }
        Ok(())
    }

    fn check_deliver(&self) -> Result<(), ActionRejected> {
        self.check_pushing()?;
        let p = self.proximity();
        if !p.at_delivery {
            return self.reject(ActionRejected::OutOfRange(ZoneKind::Delivery));
        }
        if !p.facing_delivery {
            return self.reject(ActionRejected::NotFacing(ZoneKind::Delivery));
        }
        if self.carried.is_empty() {
            return self.reject(ActionRejected::NothingCarried);
        }
        Ok(())
    }

    fn check_pushing(&self) -> Result<(), ActionRejected> {
        if self.state.game_over {
            return self.reject(ActionRejected::GameOver);
        }
        if !self.wheelbarrow.attached {
            return self.reject(ActionRejected::NotPushing);
        }
        Ok(())
    }

    fn reject<T>(&self, reason: ActionRejected) -> Result<T, ActionRejected> {
        tracing::debug!(%reason, tick = self.tick, "action rejected");
        Err(reason)
    }
}
