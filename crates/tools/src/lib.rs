//! Developer Tooling: read-only world inspection for the CLI and the
//! desktop overlay.
//!
//! # Invariants
//! - Tools never mutate the world.
//! - Output order is deterministic: placements in insertion order, kinds
//!   ascending.

mod inspector;

pub use inspector::{WorldDump, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "deepspace-tools v0.1.0"
}
