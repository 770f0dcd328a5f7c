//! Input: windowing-agnostic keys mapped to viewer actions.
//!
//! # Invariants
//! - The view layer consumes actions, never raw window events.
//! - Held keys drive continuous movement; presses drive one-off actions.

pub mod action;
mod state;

pub use action::{Action, Key};
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "deepspace-input v0.1.0"
}
