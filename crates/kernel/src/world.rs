use deepspace_common::Heading;
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// The valid placement box, with one corner at the origin.
///
/// A coordinate is inside when `0 <= c <= bound` on its axis, so both faces
/// of the box are inclusive. Negative bounds describe an empty box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl WorldBounds {
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn contains(&self, p: IVec3) -> bool {
        (0..=self.width).contains(&p.x)
            && (0..=self.height).contains(&p.y)
            && (0..=self.depth).contains(&p.z)
    }
}

/// An object template: visual style, base size and facing.
///
/// Deliberately `Clone` but not `Copy`: one template is reused across many
/// placements, and every placement takes its own explicit copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldObject {
    /// Index into the renderer's style table.
    pub kind: u8,
    /// Base render size before distance scaling.
    pub size: u32,
    pub facing: Heading,
}

impl WorldObject {
    pub fn new(kind: u8, size: u32, facing: Heading) -> Self {
        Self { kind, size, facing }
    }
}

impl std::fmt::Display for WorldObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type({})", self.kind)
    }
}

/// An object at a fixed world position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub position: IVec3,
    pub object: WorldObject,
}

/// The world: bounds plus an insertion-ordered list of placements.
///
/// Duplicated templates are expected; each placement owns its copy, so
/// nothing placed can be changed through another placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    bounds: WorldBounds,
    placements: Vec<PlacedObject>,
    /// Seed the world was generated from (0 for hand-built worlds).
    seed: u64,
}

impl World {
    /// Create an empty world with the given bounds.
    pub fn new(bounds: WorldBounds) -> Self {
        Self {
            bounds,
            placements: Vec::new(),
            seed: 0,
        }
    }

    pub(crate) fn with_seed(bounds: WorldBounds, seed: u64) -> Self {
        Self {
            seed,
            ..Self::new(bounds)
        }
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements in insertion order.
    pub fn placements(&self) -> impl ExactSizeIterator<Item = &PlacedObject> + '_ {
        self.placements.iter()
    }

    pub fn as_slice(&self) -> &[PlacedObject] {
        &self.placements
    }

    /// Place a copy of `object` at `(x, y, z)`.
    ///
    /// Returns `false` and leaves the world untouched when the position is
    /// outside the bounds.
    pub fn add_object(&mut self, object: &WorldObject, x: i32, y: i32, z: i32) -> bool {
        let position = IVec3::new(x, y, z);
        if !self.bounds.contains(position) {
            tracing::trace!(?position, "placement outside world bounds, dropped");
            return false;
        }
        self.placements.push(PlacedObject {
            position,
            object: object.clone(),
        });
        true
    }

    /// Deterministic hash of bounds and placements, in order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.bounds.width.to_le_bytes());
        mix(&mut h, &self.bounds.height.to_le_bytes());
        mix(&mut h, &self.bounds.depth.to_le_bytes());
        for placed in &self.placements {
            let p = placed.position;
            mix(&mut h, &p.x.to_le_bytes());
            mix(&mut h, &p.y.to_le_bytes());
            mix(&mut h, &p.z.to_le_bytes());
            mix(&mut h, &[placed.object.kind]);
            mix(&mut h, &placed.object.size.to_le_bytes());
            mix(&mut h, &placed.object.facing.unit().to_array().map(|c| c as i8 as u8));
        }
        h
    }
}
