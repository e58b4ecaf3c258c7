//! HUD projection: read-only views of the world turned into display text.
//!
//! # Invariants
//! - Renderers cannot mutate world truth.
//! - HUD text is a pure function of the world state.

mod hud;
mod renderer;

pub use hud::{Hint, HudInput, HudText, project, select_hint, status_line};
pub use renderer::{DebugTextRenderer, HudRenderer, RenderView, Renderer};
