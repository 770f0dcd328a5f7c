//! World Kernel: the bounded 3D world and the objects placed in it.
//!
//! # Invariants
//! - Every placement lies inside the world bounds on all three axes.
//! - Placements keep insertion order; iteration is deterministic for a given seed.
//! - The world is built once and is read-only afterwards.

mod generate;
pub mod world;

pub use generate::DecorativeRows;
pub use world::{PlacedObject, World, WorldBounds, WorldObject};

pub fn crate_info() -> &'static str {
    "deepspace-kernel v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("kernel"));
    }
}
