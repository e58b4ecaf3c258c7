//! Layout helpers: deterministic placement of bricks and normalisation of
//! imported models.
//!
//! # Invariants
//! - Every function is pure. Same inputs, same outputs.
//! - Scale factors are always finite and positive.

mod fit;
mod grid;

pub use fit::{ScaleFit, auto_scale_to_height, auto_scale_to_longest};
pub use grid::{GridLayout, WallLayout, batch_offsets};
