//! Rendering Adapter: the projection and visibility pipeline plus a
//! renderer-agnostic drawing surface.
//!
//! # Invariants
//! - Projection never mutates the world; it borrows placements into a
//!   transient draw list.
//! - Every object in a projection result satisfies the frustum predicate, and
//!   every object that satisfies it appears exactly once.
//! - Draw order comes from depth buckets walked farthest to nearest; there is
//!   no depth buffer.

mod palette;
mod projector;
mod surface;

pub use palette::{KIND_COLOURS, Palette, Style};
pub use projector::{DEFAULT_INFINITY, DepthBuckets, Frustum, Projected, Projector};
pub use surface::{DrawCommand, DrawSurface, Paint, RecordingSurface, RenderError};

pub fn crate_info() -> &'static str {
    "deepspace-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
