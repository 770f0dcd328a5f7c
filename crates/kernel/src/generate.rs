use crate::world::{World, WorldBounds, WorldObject};
use deepspace_common::Heading;
use glam::IVec3;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Largest random object kind (inclusive).
const MAX_RANDOM_KIND: u8 = 5;
/// Random object sizes are drawn from `1..=MAX_RANDOM_SIZE`.
const MAX_RANDOM_SIZE: u32 = 5;

/// Two rows of large objects marching away from fixed origins, one along X
/// and one along Y, so the viewer has steady motion cues.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorativeRows {
    /// Row indices `first..last`; index `i` sits `i * spacing` from the origin.
    pub first: i32,
    pub last: i32,
    pub spacing: i32,
    pub size: u32,
    pub x_row_origin: IVec3,
    pub y_row_origin: IVec3,
}

impl Default for DecorativeRows {
    fn default() -> Self {
        Self {
            first: 30,
            last: 100,
            spacing: 20,
            size: 10,
            x_row_origin: IVec3::new(300, 300, 10),
            y_row_origin: IVec3::new(700, 700, 10),
        }
    }
}

impl DecorativeRows {
    /// Number of placements attempted (two per index).
    pub fn attempts(&self) -> usize {
        (self.last - self.first).max(0) as usize * 2
    }

    fn place<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R) -> usize {
        let mut placed = 0;
        for i in self.first..self.last {
            // Kinds cycle 0,0,1,1,..,4,4 along the row.
            let kind = ((i % 10) / 2) as u8;
            let facing = random_heading(rng);
            let template = WorldObject::new(kind, self.size, facing);

            let x = self.x_row_origin + IVec3::new(i * self.spacing, 0, 0);
            let y = self.y_row_origin + IVec3::new(0, i * self.spacing, 0);
            placed += world.add_object(&template, x.x, x.y, x.z) as usize;
            placed += world.add_object(&template, y.x, y.y, y.z) as usize;
        }
        placed
    }
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Heading {
    // ALL is a non-empty const array.
    *Heading::ALL.choose(rng).unwrap_or(&Heading::North)
}

impl World {
    /// Populate the world with `count - 1` uniformly random objects followed
    /// by the default decorative rows.
    ///
    /// Placements that fall outside the bounds are dropped silently.
    pub fn build<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.build_with(count, &DecorativeRows::default(), rng);
    }

    /// [`World::build`] with explicit decorative rows.
    pub fn build_with<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rows: &DecorativeRows,
        rng: &mut R,
    ) {
        let _span = tracing::info_span!("world_build", count).entered();
        let b = self.bounds();
        let mut placed = 0usize;
        let random = count.saturating_sub(1);

        for _ in 0..random {
            let template = WorldObject::new(
                rng.gen_range(0..=MAX_RANDOM_KIND),
                rng.gen_range(1..=MAX_RANDOM_SIZE),
                random_heading(rng),
            );
            let x = random_coord(rng, b.width);
            let y = random_coord(rng, b.height);
            let z = random_coord(rng, b.depth);
            placed += self.add_object(&template, x, y, z) as usize;
        }
        placed += rows.place(self, rng);

        let attempted = random + rows.attempts();
        tracing::info!(
            placed,
            rejected = attempted - placed,
            total = self.len(),
            "world built"
        );
    }

    /// Build a fresh world from a seed. Same seed, same world.
    pub fn generate(bounds: WorldBounds, count: usize, seed: u64) -> World {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut world = World::with_seed(bounds, seed);
        world.build(count, &mut rng);
        world
    }
}

/// Uniform in `0..=bound`; a negative bound yields an out-of-bounds value
/// so the placement is rejected rather than panicking on an empty range.
fn random_coord<R: Rng + ?Sized>(rng: &mut R, bound: i32) -> i32 {
    if bound < 0 {
        return bound;
    }
    rng.gen_range(0..=bound)
}
