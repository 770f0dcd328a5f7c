//! View: the viewer, how it moves, and how one frame is composed.
//!
//! # Invariants
//! - The controller is the only writer of the viewer position.
//! - Movement is translation only; the heading is fixed forward (+Z).
//! - Objects are painted farthest first, so nearer ones occlude farther ones.
//! - Frame timing lives outside the world: the world never changes after build.

mod clock;
mod controller;
mod viewer;

pub use clock::{FrameLimiter, FrameTimer, IntervalTimer};
pub use controller::{FrameStats, Motion, ViewController};
pub use viewer::ViewerState;

pub fn crate_info() -> &'static str {
    "deepspace-view v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("view"));
    }
}
