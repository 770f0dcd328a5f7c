use deepspace_kernel::{World, WorldObject};
use glam::{IVec2, IVec3};
use std::collections::BTreeMap;

/// Depth at which screen offsets have shrunk all the way to the viewport centre.
pub const DEFAULT_INFINITY: f32 = 1000.0;

/// The axis-aligned forward view box.
///
/// `width` and `height` are full extents centred on the viewer, `depth` is the
/// far plane. Any non-positive extent makes the frustum degenerate and nothing
/// is visible through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frustum {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl Frustum {
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0 || self.depth <= 0
    }

    /// Visibility predicate on a viewer-relative offset `(ow, oh, od)`.
    ///
    /// Visible iff `0 < od <= depth`, `|ow| <= width / 2` and
    /// `|oh| <= height / 2`. Objects exactly on the viewer plane are hidden.
    pub fn contains(&self, rel: IVec3) -> bool {
        if self.is_degenerate() {
            return false;
        }
        // Compare doubled offsets so odd extents keep their half-unit.
        let half_ok = |offset: i32, extent: i32| 2 * (offset as i64).abs() <= extent as i64;
        rel.z > 0
            && rel.z <= self.depth
            && half_ok(rel.x, self.width)
            && half_ok(rel.y, self.height)
    }

    /// Screen-space centre of the viewport.
    pub fn centre(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }
}

/// One visible object in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected<'w> {
    pub screen: IVec2,
    /// Viewer-relative depth `od`, always in `(0, frustum.depth]`.
    pub depth: i32,
    pub object: &'w WorldObject,
}

/// Visible objects grouped by exact relative depth.
///
/// Within a bucket objects keep world insertion order. Walking buckets from
/// the largest depth to the smallest gives painter's-algorithm order.
#[derive(Debug, Clone, Default)]
pub struct DepthBuckets<'w> {
    buckets: BTreeMap<i32, Vec<Projected<'w>>>,
    len: usize,
}

impl<'w> DepthBuckets<'w> {
    fn push(&mut self, entry: Projected<'w>) {
        self.buckets.entry(entry.depth).or_default().push(entry);
        self.len += 1;
    }

    /// Number of visible objects.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct depths.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Objects at exactly `depth`, in insertion order.
    pub fn get(&self, depth: i32) -> Option<&[Projected<'w>]> {
        self.buckets.get(&depth).map(Vec::as_slice)
    }

    /// Distinct depths, nearest first.
    pub fn depths(&self) -> impl DoubleEndedIterator<Item = i32> + '_ {
        self.buckets.keys().copied()
    }

    /// Buckets from farthest to nearest.
    pub fn buckets_far_to_near(&self) -> impl Iterator<Item = (i32, &[Projected<'w>])> + '_ {
        self.buckets.iter().rev().map(|(d, v)| (*d, v.as_slice()))
    }

    /// Every visible object in draw order: farthest bucket first.
    pub fn far_to_near(&self) -> impl Iterator<Item = &Projected<'w>> + '_ {
        self.buckets.values().rev().flatten()
    }
}

/// Turns world placements plus a viewer position into a depth-bucketed,
/// screen-space draw list. Holds no per-call state and never mutates the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    infinity: f32,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            infinity: DEFAULT_INFINITY,
        }
    }
}

impl Projector {
    /// Create a projector whose offsets converge at `infinity`.
    ///
    /// A non-positive or NaN `infinity` falls back to [`DEFAULT_INFINITY`].
    pub fn with_infinity(infinity: f32) -> Self {
        if infinity > 0.0 {
            return Self { infinity };
        }
        tracing::warn!(infinity, "infinity must be positive, using default");
        Self::default()
    }

    pub fn infinity(&self) -> f32 {
        self.infinity
    }

    /// Linear foreshortening factor `1 - od / infinity`.
    pub fn foreshortening(&self, od: i32) -> f32 {
        1.0 - od as f32 / self.infinity
    }

    /// Screen position of a viewer-relative offset: the offset is scaled
    /// toward the viewport centre by the foreshortening factor.
    pub fn screen_position(&self, rel: IVec3, frustum: Frustum) -> IVec2 {
        let f = self.foreshortening(rel.z);
        let centre = frustum.centre();
        IVec2::new(
            (rel.x as f32 * f) as i32 + centre.x,
            (rel.y as f32 * f) as i32 + centre.y,
        )
    }

    /// Cull, project and bucket every placement of `world` as seen from `viewer`.
    pub fn project<'w>(&self, world: &'w World, viewer: IVec3, frustum: Frustum) -> DepthBuckets<'w> {
        let mut out = DepthBuckets::default();
        if frustum.is_degenerate() {
            return out;
        }

        for placed in world.placements() {
            let rel = placed.position - viewer;
            if !frustum.contains(rel) {
                continue;
            }
            out.push(Projected {
                screen: self.screen_position(rel, frustum),
                depth: rel.z,
                object: &placed.object,
            });
        }

        tracing::trace!(
            visible = out.len(),
            buckets = out.bucket_count(),
            "projected world"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepspace_common::Heading;
    use deepspace_kernel::WorldBounds;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn obj(kind: u8) -> WorldObject {
        WorldObject::new(kind, 2, Heading::North)
    }

    fn scenario_world() -> World {
        let mut w = World::new(WorldBounds::new(1000, 1000, 2000));
        w.add_object(&obj(0), 500, 500, 100);
        w
    }

    #[test]
    fn centred_object_projects_to_centre() {
        let world = scenario_world();
        let frustum = Frustum::new(1000, 1000, 200);
        let out = Projector::default().project(&world, IVec3::new(500, 500, 0), frustum);

        assert_eq!(out.len(), 1);
        assert_eq!(out.depths().collect::<Vec<_>>(), vec![100]);
        let p = out.get(100).unwrap()[0];
        assert_eq!(p.screen, IVec2::new(500, 500));
        assert_eq!(p.depth, 100);
    }

    #[test]
    fn object_behind_viewer_is_culled() {
        let world = scenario_world();
        let frustum = Frustum::new(1000, 1000, 200);
        let out = Projector::default().project(&world, IVec3::new(500, 500, 150), frustum);
        assert!(out.is_empty());
    }

    #[test]
    fn viewer_plane_is_invisible() {
        let world = scenario_world();
        let frustum = Frustum::new(1000, 1000, 200);
        let out = Projector::default().project(&world, IVec3::new(500, 500, 100), frustum);
        assert!(out.is_empty());
    }

    #[test]
    fn far_plane_is_inclusive() {
        let world = scenario_world();
        let viewer = IVec3::new(500, 500, 0);
        let p = Projector::default();
        assert_eq!(p.project(&world, viewer, Frustum::new(10, 10, 100)).len(), 1);
        assert!(p.project(&world, viewer, Frustum::new(10, 10, 99)).is_empty());
    }

    #[test]
    fn lateral_limits_are_half_extents() {
        let mut world = World::new(WorldBounds::new(1000, 1000, 1000));
        world.add_object(&obj(0), 600, 500, 10); // ow = 100
        world.add_object(&obj(1), 500, 399, 10); // oh = -101
        let viewer = IVec3::new(500, 500, 0);
        let out = Projector::default().project(&world, viewer, Frustum::new(200, 200, 50));
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(10).unwrap()[0].object.kind, 0);
    }

    #[test]
    fn odd_width_keeps_half_unit() {
        let f = Frustum::new(201, 10, 10);
        assert!(f.contains(IVec3::new(100, 0, 1)));
        assert!(!f.contains(IVec3::new(101, 0, 1)));
    }

    #[test]
    fn offsets_shrink_with_depth() {
        let mut world = World::new(WorldBounds::new(2000, 2000, 2000));
        world.add_object(&obj(0), 600, 400, 500); // ow=100, oh=-100, od=500
        let out = Projector::default().project(
            &world,
            IVec3::new(500, 500, 0),
            Frustum::new(1000, 1000, 1000),
        );
        // factor 0.5
        assert_eq!(out.get(500).unwrap()[0].screen, IVec2::new(550, 450));
    }

    #[test]
    fn custom_infinity_changes_convergence() {
        let p = Projector::with_infinity(200.0);
        assert_eq!(p.foreshortening(0), 1.0);
        assert_eq!(p.foreshortening(100), 0.5);
        assert_eq!(p.foreshortening(200), 0.0);
        let s = p.screen_position(IVec3::new(40, -40, 100), Frustum::new(100, 100, 300));
        assert_eq!(s, IVec2::new(70, 30));
    }

    #[test]
    fn bad_infinity_falls_back_to_default() {
        for bad in [0.0, -5.0, f32::NAN] {
            assert_eq!(Projector::with_infinity(bad).infinity(), DEFAULT_INFINITY);
        }
    }

    #[test]
    fn degenerate_frustum_sees_nothing() {
        let world = scenario_world();
        let viewer = IVec3::new(500, 500, 0);
        let p = Projector::default();
        for f in [
            Frustum::new(0, 1000, 200),
            Frustum::new(1000, -1, 200),
            Frustum::new(1000, 1000, 0),
            Frustum::new(-5, -5, -5),
        ] {
            assert!(p.project(&world, viewer, f).is_empty(), "{f:?}");
        }
    }

    #[test]
    fn shared_depth_shares_bucket_in_insertion_order() {
        let mut world = World::new(WorldBounds::new(1000, 1000, 1000));
        world.add_object(&obj(3), 510, 500, 40);
        world.add_object(&obj(1), 500, 500, 20);
        world.add_object(&obj(4), 490, 500, 40);
        world.add_object(&obj(2), 500, 510, 40);

        let out = Projector::default().project(
            &world,
            IVec3::new(500, 500, 0),
            Frustum::new(100, 100, 100),
        );
        assert_eq!(out.bucket_count(), 2);
        let kinds: Vec<u8> = out.get(40).unwrap().iter().map(|p| p.object.kind).collect();
        assert_eq!(kinds, vec![3, 4, 2]);
    }

    #[test]
    fn far_to_near_is_non_increasing() {
        let world = World::generate(WorldBounds::new(1000, 1000, 1000), 2000, 5);
        let out = Projector::default().project(
            &world,
            IVec3::new(500, 500, 100),
            Frustum::new(800, 800, 600),
        );
        assert!(!out.is_empty());
        let depths: Vec<i32> = out.far_to_near().map(|p| p.depth).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(depths.len(), out.len());

        let bucket_depths: Vec<i32> = out.buckets_far_to_near().map(|(d, _)| d).collect();
        assert!(bucket_depths.windows(2).all(|w| w[0] > w[1]));
    }

    /// Every visible placement appears exactly once and nothing else does,
    /// across random viewers and frusta.
    #[test]
    fn result_matches_visibility_predicate() {
        let world = World::generate(WorldBounds::new(600, 600, 600), 800, 11);
        let projector = Projector::default();
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..50 {
            let viewer = IVec3::new(
                rng.gen_range(-100..700),
                rng.gen_range(-100..700),
                rng.gen_range(-100..700),
            );
            let frustum = Frustum::new(
                rng.gen_range(-10..600),
                rng.gen_range(-10..600),
                rng.gen_range(-10..400),
            );
            let out = projector.project(&world, viewer, frustum);

            let expected: Vec<*const WorldObject> = world
                .placements()
                .filter(|p| frustum.contains(p.position - viewer))
                .map(|p| &p.object as *const _)
                .collect();

            let mut got: Vec<*const WorldObject> = out
                .far_to_near()
                .map(|p| p.object as *const _)
                .collect();
            assert_eq!(got.len(), expected.len());
            got.sort();
            let mut expected_sorted = expected.clone();
            expected_sorted.sort();
            assert_eq!(got, expected_sorted);

            // Bucket keys are exactly the distinct visible depths.
            let mut distinct: Vec<i32> = world
                .placements()
                .map(|p| p.position - viewer)
                .filter(|rel| frustum.contains(*rel))
                .map(|rel| rel.z)
                .collect();
            distinct.sort();
            distinct.dedup();
            assert_eq!(out.depths().collect::<Vec<_>>(), distinct);
        }
    }
}
