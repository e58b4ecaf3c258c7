//! Input: keyboard edges mapped to game actions.
//!
//! # Invariants
//! - The world consumes actions, never raw key events.
//! - Edge actions fire once per physical press; auto-repeat is ignored.
//! - Movement is read from held keys every tick.

pub mod action;
pub mod bindings;
pub mod key;
pub mod state;

pub use action::Action;
pub use bindings::KeyBindings;
pub use key::{InputError, Key};
pub use state::{Axes, InputState};
