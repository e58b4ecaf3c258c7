use serde::{Deserialize, Serialize};

/// A high-level action produced from keyboard input.
///
/// The game loop dispatches actions to world operations; nothing downstream
/// sees raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Walk forward while held.
    MoveForward,
    /// Walk backward while held.
    MoveBackward,
    /// Turn counter-clockwise while held.
    TurnLeft,
    /// Turn clockwise while held.
    TurnRight,
    /// Load a brick, or deliver one.
    Interact,
    /// Grab or release the wheelbarrow.
    ToggleWheelbarrow,
    /// Switch between overview and follow cameras.
    ToggleCamera,
    /// Start the session over.
    Restart,
}

impl Action {
    /// Held actions are sampled every tick; the rest fire on the press edge.
    pub fn is_held(&self) -> bool {
        matches!(
            self,
            Action::MoveForward | Action::MoveBackward | Action::TurnLeft | Action::TurnRight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_actions_are_held() {
        assert!(Action::MoveForward.is_held());
        assert!(Action::TurnRight.is_held());
    }

    #[test]
    fn discrete_actions_fire_on_edges() {
        for a in [
            Action::Interact,
            Action::ToggleWheelbarrow,
            Action::ToggleCamera,
            Action::Restart,
        ] {
            assert!(!a.is_held());
        }
    }
}
