use brickyard_kernel::{GameState, Proximity, World};

/// Everything the HUD reads. Build one per frame with [`HudInput::from_world`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudInput {
    pub state: GameState,
    pub carried: usize,
    pub pile: usize,
    pub pushing: bool,
    pub proximity: Proximity,
}

impl HudInput {
    pub fn from_world(world: &World) -> Self {
        Self {
            state: *world.state(),
            carried: world.carried().len(),
            pile: world.pickup_pile().len(),
            pushing: world.is_pushing(),
            proximity: world.proximity(),
        }
    }
}

/// Context-sensitive prompt under the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Controls,
    NearWheelbarrow,
    CanLoad { capacity: u32 },
    TurnToPile,
    CanDeliver,
    TurnToWall,
    Pushing,
    Victory { target: u32 },
}

impl std::fmt::Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hint::Controls => write!(
                f,
                "W/S: forward/back\nA/D: turn\nF: take/release wheelbarrow\nE: load/unload bricks\nC: camera  R: restart"
            ),
            Hint::NearWheelbarrow => {
                write!(f, "You are next to the wheelbarrow. Press F to take it.")
            }
            Hint::CanLoad { capacity } => write!(
                f,
                "Wheelbarrow at the pickup pile and facing it. Press E to load a brick (max {capacity})."
            ),
            Hint::TurnToPile => write!(
                f,
                "Wheelbarrow at the pickup pile. Turn with A/D to face the pile, then press E."
            ),
            Hint::CanDeliver => write!(
                f,
                "Wheelbarrow at the delivery zone and facing it. Press E to lay a brick on the wall."
            ),
            Hint::TurnToWall => write!(
                f,
                "Wheelbarrow at the delivery zone. Turn with A/D to face the wall, then press E."
            ),
            Hint::Pushing => write!(
                f,
                "Pushing the wheelbarrow. F: release at any time. Get close to a zone and face it to use E."
            ),
            Hint::Victory { target } => write!(
                f,
                "Game over! You stacked all {target} bricks and finished the wall."
            ),
        }
    }
}

/// Both HUD fields for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub status: String,
    pub hint: Hint,
}

/// Counters line: delivered of target, on the wheelbarrow, remaining.
pub fn status_line(state: &GameState, carried: usize) -> String {
    format!(
        "Bricks delivered: {} / {} | On wheelbarrow: {} | Remaining: {}",
        state.delivered,
        state.target,
        carried,
        state.remaining()
    )
}

/// Pick the hint for the current situation. Victory wins over everything.
pub fn select_hint(input: &HudInput) -> Hint {
    let s = &input.state;
    let p = &input.proximity;
    if s.game_over {
        return Hint::Victory { target: s.target };
    }
    if !input.pushing {
        return if p.near_wheelbarrow {
            Hint::NearWheelbarrow
        } else {
            Hint::Controls
        };
    }
    let can_take = input.carried < s.capacity as usize && input.pile > 0;
    if p.at_pickup && can_take {
        if p.facing_pickup {
            Hint::CanLoad {
                capacity: s.capacity,
            }
        } else {
            Hint::TurnToPile
        }
    } else if p.at_delivery && input.carried > 0 {
        if p.facing_delivery {
            Hint::CanDeliver
        } else {
            Hint::TurnToWall
        }
    } else {
        Hint::Pushing
    }
}

pub fn project(input: &HudInput) -> HudText {
    HudText {
        status: status_line(&input.state, input.carried),
        hint: select_hint(input),
    }
}
