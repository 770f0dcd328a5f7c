use deepspace_common::{Rgb, SpriteId};
use glam::{IVec2, UVec2};

/// Errors a drawing surface can report.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("sprite {0:?} is not in the loaded sheet")]
    UnknownSprite(SpriteId),
    #[error("frame exceeds {capacity} shapes")]
    BatchOverflow { capacity: usize },
    #[error("surface error: {0}")]
    Surface(String),
}

/// How a shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Filled,
    /// Outline of the given width in pixels.
    Outline(u32),
}

/// The drawing capability the core renders through.
///
/// Coordinates are screen pixels with the origin at the top-left and Y
/// growing downward. Implementations decide how the frame reaches the
/// screen; `present` marks the end of one frame.
pub trait DrawSurface {
    fn fill_background(&mut self, colour: Rgb);

    fn draw_circle(&mut self, centre: IVec2, radius: u32, colour: Rgb, paint: Paint);

    fn draw_rect(&mut self, top_left: IVec2, size: UVec2, colour: Rgb, paint: Paint);

    fn draw_sprite(&mut self, sprite: SpriteId, top_left: IVec2, size: UVec2) -> Result<(), RenderError>;

    fn present(&mut self) -> Result<(), RenderError>;
}

/// A recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Background(Rgb),
    Circle {
        centre: IVec2,
        radius: u32,
        colour: Rgb,
        paint: Paint,
    },
    Rect {
        top_left: IVec2,
        size: UVec2,
        colour: Rgb,
        paint: Paint,
    },
    Sprite {
        sprite: SpriteId,
        top_left: IVec2,
        size: UVec2,
    },
}

impl std::fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paint = |p: &Paint| match p {
            Paint::Filled => "filled".to_string(),
            Paint::Outline(w) => format!("outline {w}"),
        };
        match self {
            DrawCommand::Background(c) => write!(f, "background ({}, {}, {})", c.0, c.1, c.2),
            DrawCommand::Circle {
                centre,
                radius,
                colour,
                paint: p,
            } => write!(
                f,
                "circle at ({}, {}) r={} ({}, {}, {}) {}",
                centre.x,
                centre.y,
                radius,
                colour.0,
                colour.1,
                colour.2,
                paint(p)
            ),
            DrawCommand::Rect {
                top_left,
                size,
                colour,
                paint: p,
            } => write!(
                f,
                "rect at ({}, {}) {}x{} ({}, {}, {}) {}",
                top_left.x,
                top_left.y,
                size.x,
                size.y,
                colour.0,
                colour.1,
                colour.2,
                paint(p)
            ),
            DrawCommand::Sprite {
                sprite,
                top_left,
                size,
            } => write!(
                f,
                "sprite #{} at ({}, {}) {}x{}",
                sprite.0, top_left.x, top_left.y, size.x, size.y
            ),
        }
    }
}

/// Surface that records draw calls instead of rasterising them.
///
/// Used by tests and the headless CLI. The commands of the frame in progress
/// accumulate until `present`, which moves them to `last_frame`.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pending: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames: u64,
    /// Sprites `0..sprite_count` are considered loaded.
    sprite_count: u16,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that accepts sprite ids below `sprite_count`.
    pub fn with_sprites(sprite_count: u16) -> Self {
        Self {
            sprite_count,
            ..Self::default()
        }
    }

    /// Commands of the frame in progress.
    pub fn pending(&self) -> &[DrawCommand] {
        &self.pending
    }

    /// Commands of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Human-readable listing of the last presented frame, one call per line.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "=== Frame {} ({} draw calls) ===\n",
            self.frames,
            self.last_frame.len()
        );
        for cmd in &self.last_frame {
            out.push_str(&format!("  {cmd}\n"));
        }
        out
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_background(&mut self, colour: Rgb) {
        self.pending.push(DrawCommand::Background(colour));
    }

    fn draw_circle(&mut self, centre: IVec2, radius: u32, colour: Rgb, paint: Paint) {
        self.pending.push(DrawCommand::Circle {
            centre,
            radius,
            colour,
            paint,
        });
    }

    fn draw_rect(&mut self, top_left: IVec2, size: UVec2, colour: Rgb, paint: Paint) {
        self.pending.push(DrawCommand::Rect {
            top_left,
            size,
            colour,
            paint,
        });
    }

    fn draw_sprite(&mut self, sprite: SpriteId, top_left: IVec2, size: UVec2) -> Result<(), RenderError> {
        if sprite.0 >= self.sprite_count {
            return Err(RenderError::UnknownSprite(sprite));
        }
        self.pending.push(DrawCommand::Sprite {
            sprite,
            top_left,
            size,
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames += 1;
        Ok(())
    }
}
