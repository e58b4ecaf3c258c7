use std::collections::BTreeSet;

use crate::action::Action;
use crate::bindings::KeyBindings;
use crate::key::Key;

/// Movement axes for one tick, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Axes {
    pub forward: f32,
    pub turn: f32,
}

/// Held keys plus edge detection.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: BTreeSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Returns the bound edge action if this is a fresh
    /// press of a key bound to a non-held action.
    pub fn press(&mut self, key: Key, bindings: &KeyBindings) -> Option<Action> {
        if !self.held.insert(key) {
            // Auto-repeat.
            return None;
        }
        let action = bindings.action_for(key)?;
        if action.is_held() {
            return None;
        }
        tracing::debug!(%key, ?action, "key edge");
        Some(action)
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Drop every held key (focus loss, restart).
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Sum the held movement actions into axes. Opposite keys cancel.
    pub fn axes(&self, bindings: &KeyBindings) -> Axes {
        let mut forward = false;
        let mut backward = false;
        let mut left = false;
        let mut right = false;
        for key in &self.held {
            match bindings.action_for(*key) {
                Some(Action::MoveForward) => forward = true,
                Some(Action::MoveBackward) => backward = true,
                Some(Action::TurnLeft) => left = true,
                Some(Action::TurnRight) => right = true,
                _ => {}
            }
        }
        let axis = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
        Axes {
            forward: axis(forward, backward),
            turn: axis(right, left),
        }
    }
}
