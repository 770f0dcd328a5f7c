use crate::viewer::ViewerState;
use deepspace_common::{DemoConfig, Heading};
use deepspace_input::Action;
use deepspace_kernel::{World, WorldObject};
use deepspace_render::{DrawSurface, Paint, Palette, Projector, RenderError, Style};
use glam::{IVec2, IVec3, UVec2};

/// Fraction of the viewport covered by the crosshair frame.
const CROSSHAIR_FRAME: f32 = 0.25;
const CROSSHAIR_RADIUS: u32 = 10;
/// A disc is a circle plus its mask square; a sprite is one quad.
const MAX_SHAPES_PER_OBJECT: usize = 2;
/// Crosshair circle and frame rectangle.
const OVERLAY_SHAPES: usize = 2;

/// Movement policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    /// Units per frame for held movement keys.
    pub step: i32,
    /// Units per drift tick.
    pub drift_step: i32,
    /// Advance forward on every drift tick.
    pub auto_drift: bool,
    /// Drifting past this depth wraps the viewer back to z = 0.
    pub wrap_depth: i32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            step: 2,
            drift_step: 1,
            auto_drift: true,
            wrap_depth: 5000,
        }
    }
}

/// Counts from one composed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub visible: usize,
    pub buckets: usize,
    pub drawn: usize,
    /// Visible objects whose rendered size clamped to zero.
    pub skipped: usize,
}

/// Owns the viewer and drives projection plus drawing each frame.
#[derive(Debug, Clone)]
pub struct ViewController {
    viewer: ViewerState,
    projector: Projector,
    motion: Motion,
}

impl ViewController {
    pub fn new(viewer: ViewerState, projector: Projector, motion: Motion) -> Self {
        Self {
            viewer,
            projector,
            motion,
        }
    }

    pub fn from_config(config: &DemoConfig) -> Self {
        let m = &config.movement;
        Self::new(
            ViewerState::from_config(&config.view),
            Projector::with_infinity(config.view.infinity),
            Motion {
                step: m.step,
                drift_step: m.drift_step,
                auto_drift: m.auto_drift,
                wrap_depth: config.world.depth,
            },
        )
    }

    /// Upper bound on the draw calls [`ViewController::draw_frame`] issues
    /// for `world`, background excluded. Size fixed-capacity surfaces with it.
    pub fn max_frame_shapes(world: &World) -> usize {
        world
            .len()
            .saturating_mul(MAX_SHAPES_PER_OBJECT)
            .saturating_add(OVERLAY_SHAPES)
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn position(&self) -> IVec3 {
        self.viewer.position
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Move the viewer directly, e.g. to inspect a frame from a chosen spot.
    pub fn teleport(&mut self, position: IVec3) {
        self.viewer.position = position;
    }

    /// Apply one input action. `Quit` and `Noop` are left to the caller.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move(heading) => self.translate(heading, self.motion.step),
            Action::Nudge(heading) => self.translate(heading, 1),
            Action::Quit | Action::Noop => {}
        }
    }

    fn translate(&mut self, heading: Heading, distance: i32) {
        self.viewer.position += heading.unit() * distance;
    }

    /// One drift tick. Returns `true` when the viewer wrapped back to z = 0.
    ///
    /// Does nothing unless auto drift is enabled. Only the depth coordinate
    /// wraps; x and y are kept.
    pub fn tick(&mut self) -> bool {
        if !self.motion.auto_drift {
            return false;
        }
        self.translate(self.viewer.heading, self.motion.drift_step);
        if self.viewer.position.z > self.motion.wrap_depth {
            self.viewer.position.z = 0;
            tracing::info!(position = ?self.viewer.position, "wrapping viewer back to z = 0");
            return true;
        }
        false
    }

    /// Rendered size of `object` at relative depth `od`, or `None` when it
    /// rounds to zero or below.
    ///
    /// Linear falloff `size * size_scale * (1 - od / distance_scale)`,
    /// independent of the projector's screen-position falloff.
    pub fn render_size(&self, object: &WorldObject, od: i32) -> Option<u32> {
        let v = &self.viewer;
        let raw = object.size as f32 * v.size_scale * (1.0 - od as f32 / v.distance_scale);
        let size = raw.round();
        (size >= 1.0).then_some(size as u32)
    }

    /// Compose one frame onto `surface`: background, visible objects from
    /// farthest to nearest, then the crosshair. Does not present.
    pub fn draw_frame<S: DrawSurface + ?Sized>(
        &self,
        world: &World,
        palette: &Palette,
        surface: &mut S,
    ) -> Result<FrameStats, RenderError> {
        surface.fill_background(palette.background);

        let buckets = self
            .projector
            .project(world, self.viewer.position, self.viewer.frustum);
        let mut stats = FrameStats {
            visible: buckets.len(),
            buckets: buckets.bucket_count(),
            ..FrameStats::default()
        };

        for entry in buckets.far_to_near() {
            let Some(size) = self.render_size(entry.object, entry.depth) else {
                stats.skipped += 1;
                continue;
            };
            let half = IVec2::splat(size as i32 / 2);
            match palette.style(entry.object.kind) {
                Style::Disc(colour) => {
                    surface.draw_circle(entry.screen, size, colour, Paint::Filled);
                    surface.draw_rect(entry.screen - half, UVec2::splat(size), palette.mask, Paint::Filled);
                }
                Style::Sprite(sprite) => {
                    surface.draw_sprite(sprite, entry.screen - half, UVec2::splat(size))?;
                }
            }
            stats.drawn += 1;
        }

        self.draw_crosshair(palette, surface);
        Ok(stats)
    }

    fn draw_crosshair<S: DrawSurface + ?Sized>(&self, palette: &Palette, surface: &mut S) {
        let f = self.viewer.frustum;
        if f.is_degenerate() {
            return;
        }
        surface.draw_circle(f.centre(), CROSSHAIR_RADIUS, palette.crosshair, Paint::Outline(1));

        let (w, h) = (f.width as f32, f.height as f32);
        let top_left = IVec2::new(
            (w / 2.0 * (1.0 - CROSSHAIR_FRAME)) as i32,
            (h / 2.0 * (1.0 - CROSSHAIR_FRAME)) as i32,
        );
        let size = UVec2::new((w * CROSSHAIR_FRAME) as u32, (h * CROSSHAIR_FRAME) as u32);
        surface.draw_rect(top_left, size, palette.frame, Paint::Outline(2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepspace_common::Rgb;
    use deepspace_kernel::WorldBounds;
    use deepspace_render::{DrawCommand, Frustum, RecordingSurface};

    fn viewer_at(position: IVec3, frustum: Frustum) -> ViewerState {
        ViewerState {
            position,
            frustum,
            ..ViewerState::default()
        }
    }

    fn controller(position: IVec3, motion: Motion) -> ViewController {
        ViewController::new(
            viewer_at(position, Frustum::new(1000, 1000, 200)),
            Projector::default(),
            motion,
        )
    }

    fn scenario_world() -> World {
        let mut w = World::new(WorldBounds::new(1000, 1000, 2000));
        w.add_object(&WorldObject::new(0, 5, Heading::North), 500, 500, 100);
        w
    }

    #[test]
    fn held_move_uses_step() {
        let mut c = controller(IVec3::new(10, 10, 10), Motion::default());
        c.apply(Action::Move(Heading::West));
        c.apply(Action::Move(Heading::Down));
        assert_eq!(c.position(), IVec3::new(8, 8, 10));
    }

    #[test]
    fn nudge_moves_one_unit() {
        let mut c = controller(IVec3::ZERO, Motion::default());
        c.apply(Action::Nudge(Heading::North));
        c.apply(Action::Nudge(Heading::North));
        c.apply(Action::Nudge(Heading::South));
        assert_eq!(c.position(), IVec3::new(0, 0, 1));
    }

    #[test]
    fn quit_and_noop_do_not_move() {
        let mut c = controller(IVec3::new(1, 2, 3), Motion::default());
        c.apply(Action::Quit);
        c.apply(Action::Noop);
        assert_eq!(c.position(), IVec3::new(1, 2, 3));
    }

    #[test]
    fn teleport_sets_position() {
        let mut c = controller(IVec3::ZERO, Motion::default());
        c.teleport(IVec3::new(7, 8, 9));
        assert_eq!(c.position(), IVec3::new(7, 8, 9));
    }

    #[test]
    fn drift_advances_forward() {
        let mut c = controller(IVec3::new(5, 6, 7), Motion::default());
        assert!(!c.tick());
        assert_eq!(c.position(), IVec3::new(5, 6, 8));
    }

    #[test]
    fn drift_disabled_does_nothing() {
        let motion = Motion {
            auto_drift: false,
            ..Motion::default()
        };
        let mut c = controller(IVec3::new(5, 6, 7), motion);
        assert!(!c.tick());
        assert_eq!(c.position(), IVec3::new(5, 6, 7));
    }

    #[test]
    fn drift_wraps_depth_only() {
        let motion = Motion {
            wrap_depth: 2000,
            ..Motion::default()
        };
        let mut c = controller(IVec3::new(500, 400, 1999), motion);
        assert!(!c.tick());
        assert_eq!(c.position(), IVec3::new(500, 400, 2000));
        assert!(c.tick());
        assert_eq!(c.position(), IVec3::new(500, 400, 0));
    }

    #[test]
    fn render_size_at_zero_depth_is_unscaled() {
        let c = controller(IVec3::ZERO, Motion::default());
        let obj = WorldObject::new(0, 3, Heading::North);
        assert_eq!(c.render_size(&obj, 0), Some(12));
    }

    #[test]
    fn render_size_falls_off_linearly() {
        let c = controller(IVec3::ZERO, Motion::default());
        let obj = WorldObject::new(0, 5, Heading::North);
        // 5 * 4 * (1 - 200/400) = 10
        assert_eq!(c.render_size(&obj, 200), Some(10));
        // 5 * 4 * (1 - 380/400) = 1
        assert_eq!(c.render_size(&obj, 380), Some(1));
    }

    #[test]
    fn render_size_clamps_beyond_distance_scale() {
        let c = controller(IVec3::ZERO, Motion::default());
        let obj = WorldObject::new(0, 5, Heading::North);
        assert_eq!(c.render_size(&obj, 400), None);
        assert_eq!(c.render_size(&obj, 1000), None);
        assert_eq!(c.render_size(&obj, 399), None); // 0.05 rounds to zero
    }

    #[test]
    fn frame_draws_centred_object() {
        let world = scenario_world();
        let c = controller(IVec3::new(500, 500, 0), Motion::default());
        let mut surface = RecordingSurface::new();
        let stats = c.draw_frame(&world, &Palette::flat(), &mut surface).unwrap();
        surface.present().unwrap();

        assert_eq!(
            stats,
            FrameStats {
                visible: 1,
                buckets: 1,
                drawn: 1,
                skipped: 0
            }
        );
        let frame = surface.last_frame();
        assert_eq!(frame[0], DrawCommand::Background(Rgb::BLACK));
        // 5 * 4 * (1 - 100/400) = 15
        assert_eq!(
            frame[1],
            DrawCommand::Circle {
                centre: IVec2::new(500, 500),
                radius: 15,
                colour: Rgb::RED,
                paint: Paint::Filled,
            }
        );
        assert_eq!(
            frame[2],
            DrawCommand::Rect {
                top_left: IVec2::new(493, 493),
                size: UVec2::splat(15),
                colour: Rgb::BLACK,
                paint: Paint::Filled,
            }
        );
        // Crosshair circle and frame come last.
        assert_eq!(frame.len(), 5);
        assert_eq!(
            frame[4],
            DrawCommand::Rect {
                top_left: IVec2::new(375, 375),
                size: UVec2::splat(250),
                colour: Rgb::GOLD,
                paint: Paint::Outline(2),
            }
        );
    }

    #[test]
    fn frame_excludes_object_behind_viewer() {
        let world = scenario_world();
        let c = controller(IVec3::new(500, 500, 150), Motion::default());
        let mut surface = RecordingSurface::new();
        let stats = c.draw_frame(&world, &Palette::flat(), &mut surface).unwrap();
        assert_eq!(stats.visible, 0);
        // background + crosshair only
        assert_eq!(surface.pending().len(), 3);
    }

    #[test]
    fn nearer_objects_paint_last() {
        let mut world = World::new(WorldBounds::new(1000, 1000, 1000));
        world.add_object(&WorldObject::new(1, 2, Heading::North), 500, 500, 10);
        world.add_object(&WorldObject::new(2, 2, Heading::North), 500, 500, 150);
        world.add_object(&WorldObject::new(3, 2, Heading::North), 500, 500, 60);
        let c = controller(IVec3::new(500, 500, 0), Motion::default());
        let mut surface = RecordingSurface::new();
        c.draw_frame(&world, &Palette::flat(), &mut surface).unwrap();

        let colours: Vec<Rgb> = surface
            .pending()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Circle {
                    colour,
                    paint: Paint::Filled,
                    ..
                } => Some(*colour),
                _ => None,
            })
            .collect();
        assert_eq!(colours, vec![Rgb::GOLD, Rgb::BLUE, Rgb::GREEN]);
    }

    #[test]
    fn tiny_far_objects_are_skipped() {
        let mut world = World::new(WorldBounds::new(1000, 1000, 1000));
        world.add_object(&WorldObject::new(0, 1, Heading::North), 500, 500, 199);
        let viewer = ViewerState {
            position: IVec3::new(500, 500, 0),
            frustum: Frustum::new(1000, 1000, 300),
            distance_scale: 200.0,
            ..ViewerState::default()
        };
        let c = ViewController::new(viewer, Projector::default(), Motion::default());
        let mut surface = RecordingSurface::new();
        let stats = c.draw_frame(&world, &Palette::flat(), &mut surface).unwrap();
        assert_eq!(stats.visible, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.drawn, 0);
    }

    #[test]
    fn sprite_styles_draw_sprites() {
        let world = scenario_world();
        let c = controller(IVec3::new(500, 500, 0), Motion::default());
        let mut surface = RecordingSurface::with_sprites(6);
        c.draw_frame(&world, &Palette::with_sprites(6), &mut surface)
            .unwrap();
        assert!(matches!(
            surface.pending()[1],
            DrawCommand::Sprite {
                sprite: deepspace_common::SpriteId(0),
                ..
            }
        ));
    }

    #[test]
    fn missing_sprite_surfaces_an_error() {
        let world = scenario_world();
        let c = controller(IVec3::new(500, 500, 0), Motion::default());
        let mut surface = RecordingSurface::new();
        let result = c.draw_frame(&world, &Palette::with_sprites(6), &mut surface);
        assert!(matches!(result, Err(RenderError::UnknownSprite(_))));
    }

    #[test]
    fn from_config_wires_everything() {
        let mut config = DemoConfig::default();
        config.world.depth = 1234;
        config.movement.auto_drift = false;
        config.view.infinity = 500.0;
        let c = ViewController::from_config(&config);
        assert_eq!(c.motion().wrap_depth, 1234);
        assert!(!c.motion().auto_drift);
        assert_eq!(c.projector().infinity(), 500.0);
        assert_eq!(c.position(), config.view.start);
    }

    #[test]
    fn decorative_rows_fit_frame_shape_bound() {
        let mut config = DemoConfig::default();
        config.world.object_count = 12;
        let world = World::generate(
            WorldBounds::new(config.world.width, config.world.height, config.world.depth),
            config.world.object_count,
            config.world.seed,
        );
        assert!(world.len() > config.world.object_count);

        // Looking straight down the Y row.
        let mut c = ViewController::from_config(&config);
        c.teleport(IVec3::new(700, 1600, 0));
        let mut surface = RecordingSurface::new();
        let stats = c.draw_frame(&world, &Palette::flat(), &mut surface).unwrap();
        surface.present().unwrap();

        let shapes = surface
            .last_frame()
            .iter()
            .filter(|cmd| !matches!(cmd, DrawCommand::Background(_)))
            .count();
        assert!(stats.drawn > config.world.object_count);
        assert!(shapes > config.world.object_count * 2 + 8);
        assert!(shapes <= ViewController::max_frame_shapes(&world));
    }

    #[test]
    fn frame_shape_bound_counts_overlay() {
        let empty = World::new(WorldBounds::new(10, 10, 10));
        assert_eq!(ViewController::max_frame_shapes(&empty), 2);
        assert_eq!(ViewController::max_frame_shapes(&scenario_world()), 4);
    }

    #[test]
    fn unvalidated_zero_infinity_uses_default() {
        let mut config = DemoConfig::default();
        config.view.infinity = 0.0;
        let c = ViewController::from_config(&config);
        assert_eq!(c.projector().infinity(), deepspace_render::DEFAULT_INFINITY);
        assert!(DemoConfig::from_yaml("view:\n  infinity: 0\n").is_err());
    }

    /// Flying forward through a generated world: the draw order stays
    /// back-to-front every frame and the viewer wraps exactly once.
    #[test]
    fn fly_through_generated_world() {
        let mut config = DemoConfig::default();
        config.world = deepspace_common::WorldConfig {
            width: 1000,
            height: 1000,
            depth: 300,
            object_count: 400,
            seed: 3,
        };
        config.view.start = IVec3::new(500, 500, 0);
        let world = World::generate(
            WorldBounds::new(config.world.width, config.world.height, config.world.depth),
            config.world.object_count,
            config.world.seed,
        );
        let mut c = ViewController::from_config(&config);
        let mut surface = RecordingSurface::new();
        let mut wraps = 0;

        for _ in 0..310 {
            wraps += c.tick() as u32;
            let buckets = c
                .projector()
                .project(&world, c.position(), c.viewer().frustum);
            let depths: Vec<i32> = buckets.far_to_near().map(|p| p.depth).collect();
            assert!(depths.windows(2).all(|w| w[0] >= w[1]));

            let stats = c.draw_frame(&world, &Palette::flat(), &mut surface).unwrap();
            assert_eq!(stats.drawn + stats.skipped, stats.visible);
            surface.present().unwrap();
        }
        assert_eq!(wraps, 1);
        assert_eq!(surface.frames(), 310);
    }
}
