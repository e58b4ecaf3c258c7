use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::Action;
use crate::key::Key;

/// Table from key to action.
///
/// BTreeMap keeps iteration (and serialised output) in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    table: BTreeMap<Key, Action>,
}

impl Default for KeyBindings {
    /// WASD and arrows to move, E to interact, F for the wheelbarrow,
    /// C for the camera, R to restart.
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind(Key::W, Action::MoveForward);
        b.bind(Key::S, Action::MoveBackward);
        b.bind(Key::A, Action::TurnLeft);
        b.bind(Key::D, Action::TurnRight);
        b.bind(Key::ArrowUp, Action::MoveForward);
        b.bind(Key::ArrowDown, Action::MoveBackward);
        b.bind(Key::ArrowLeft, Action::TurnLeft);
        b.bind(Key::ArrowRight, Action::TurnRight);
        b.bind(Key::E, Action::Interact);
        b.bind(Key::F, Action::ToggleWheelbarrow);
        b.bind(Key::C, Action::ToggleCamera);
        b.bind(Key::R, Action::Restart);
        b
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Bind `key` to `action`, returning the previous binding.
    pub fn bind(&mut self, key: Key, action: Action) -> Option<Action> {
        self.table.insert(key, action)
    }

    pub fn unbind(&mut self, key: Key) -> Option<Action> {
        self.table.remove(&key)
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.table.get(&key).copied()
    }

    /// Keys bound to `action`, in key order.
    pub fn keys_for(&self, action: Action) -> Vec<Key> {
        self.table
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, Action)> + '_ {
        self.table.iter().map(|(k, a)| (*k, *a))
    }
}
