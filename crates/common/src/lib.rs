//! Shared types for the deepspace demo.
//!
//! # Invariants
//! - Everything here is plain data: no rendering, no input, no world state.
//! - Every tunable the core depends on lives in [`DemoConfig`], never in a global.

pub mod colour;
pub mod config;
pub mod heading;

pub use colour::Rgb;
pub use config::{ConfigError, DemoConfig, DisplayConfig, MovementConfig, ViewConfig, WorldConfig};
pub use heading::Heading;

/// Handle to one cell of a loaded sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u16);

pub fn crate_info() -> &'static str {
    "deepspace-common v0.1.0"
}
