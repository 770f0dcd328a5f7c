use deepspace_common::Heading;
use deepspace_kernel::{World, WorldBounds};
use std::collections::BTreeMap;

/// World inspector for developer tooling.
///
/// Provides read-only queries against a built world for the CLI and the
/// desktop overlay.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            bounds: world.bounds(),
            seed: world.seed(),
            placements: world.len(),
            state_hash: world.state_hash(),
            kinds: Self::kind_histogram(world),
        }
    }

    /// Placement count per object kind, ascending by kind.
    pub fn kind_histogram(world: &World) -> BTreeMap<u8, usize> {
        let mut kinds = BTreeMap::new();
        for placed in world.placements() {
            *kinds.entry(placed.object.kind).or_insert(0) += 1;
        }
        kinds
    }

    /// Textual listing of the heading set and every placement.
    ///
    /// Formatting is lazy, so dumping a large world streams straight into
    /// the writer.
    pub fn dump(world: &World) -> WorldDump<'_> {
        WorldDump { world }
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub bounds: WorldBounds,
    pub seed: u64,
    pub placements: usize,
    pub state_hash: u64,
    pub kinds: BTreeMap<u8, usize>,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: {}x{}x{} seed={} placements={} hash={:016x}",
            self.bounds.width,
            self.bounds.height,
            self.bounds.depth,
            self.seed,
            self.placements,
            self.state_hash
        )?;
        for (kind, count) in &self.kinds {
            write!(f, "\n  type({kind}): {count}")?;
        }
        Ok(())
    }
}

/// Display adapter returned by [`WorldInspector::dump`].
pub struct WorldDump<'w> {
    world: &'w World,
}

impl std::fmt::Display for WorldDump<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "headings:")?;
        for heading in Heading::ALL {
            writeln!(f, "  {heading:?} {heading}")?;
        }
        writeln!(f, "placements:")?;
        for placed in self.world.placements() {
            let p = placed.position;
            writeln!(f, "({}, {}, {}):{}", p.x, p.y, p.z, placed.object)?;
        }
        Ok(())
    }
}
