use bytemuck::{Pod, Zeroable};
use deepspace_common::{Rgb, SpriteId};
use deepspace_render::{DrawSurface, Paint, RenderError};
use glam::{IVec2, UVec2};

/// Shape selector read by the fragment shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ShapeKind {
    RectFilled = 0,
    RectOutline = 1,
    CircleFilled = 2,
    CircleOutline = 3,
    Sprite = 4,
}

/// One screen-space quad as laid out in the GPU instance buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    /// `[x, y, width, height]` in pixels, origin top-left.
    pub rect: [f32; 4],
    pub color: [f32; 4],
    /// Atlas rectangle `[u0, v0, u1, v1]`; only read for sprites.
    pub uv: [f32; 4],
    /// `[kind, outline width, 0, 0]`.
    pub params: [f32; 4],
}

impl ShapeInstance {
    fn new(kind: ShapeKind, top_left: IVec2, size: UVec2, colour: Rgb) -> Self {
        Self {
            rect: [
                top_left.x as f32,
                top_left.y as f32,
                size.x as f32,
                size.y as f32,
            ],
            color: colour.to_f32_rgba(),
            uv: [0.0, 0.0, 1.0, 1.0],
            params: [kind as u32 as f32, 0.0, 0.0, 0.0],
        }
    }

    pub fn kind(&self) -> u32 {
        self.params[0] as u32
    }

    fn with_outline(mut self, width: u32) -> Self {
        self.params[1] = width as f32;
        self
    }
}

/// CPU-side frame builder.
///
/// Draw calls append to the frame in progress; `present` seals it so the GPU
/// renderer can upload it. The background call starts a new frame.
#[derive(Debug)]
pub struct ShapeBatch {
    capacity: usize,
    clear: Rgb,
    pending: Vec<ShapeInstance>,
    frame_clear: Rgb,
    frame: Vec<ShapeInstance>,
    sprite_uvs: Vec<[f32; 4]>,
}

impl ShapeBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            clear: Rgb::BLACK,
            pending: Vec::new(),
            frame_clear: Rgb::BLACK,
            frame: Vec::new(),
            sprite_uvs: Vec::new(),
        }
    }

    /// Atlas rectangles indexed by sprite id.
    pub fn set_sprite_uvs(&mut self, uvs: Vec<[f32; 4]>) {
        self.sprite_uvs = uvs;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instances of the last presented frame, in paint order.
    pub fn frame(&self) -> &[ShapeInstance] {
        &self.frame
    }

    /// Background colour of the last presented frame.
    pub fn clear_colour(&self) -> Rgb {
        self.frame_clear
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl DrawSurface for ShapeBatch {
    fn fill_background(&mut self, colour: Rgb) {
        self.pending.clear();
        self.clear = colour;
    }

    fn draw_circle(&mut self, centre: IVec2, radius: u32, colour: Rgb, paint: Paint) {
        let r = radius as i32;
        let top_left = centre - IVec2::splat(r);
        let size = UVec2::splat(radius * 2);
        let instance = match paint {
            Paint::Filled => ShapeInstance::new(ShapeKind::CircleFilled, top_left, size, colour),
            Paint::Outline(w) => {
                ShapeInstance::new(ShapeKind::CircleOutline, top_left, size, colour).with_outline(w)
            }
        };
        self.pending.push(instance);
    }

    fn draw_rect(&mut self, top_left: IVec2, size: UVec2, colour: Rgb, paint: Paint) {
        let instance = match paint {
            Paint::Filled => ShapeInstance::new(ShapeKind::RectFilled, top_left, size, colour),
            Paint::Outline(w) => {
                ShapeInstance::new(ShapeKind::RectOutline, top_left, size, colour).with_outline(w)
            }
        };
        self.pending.push(instance);
    }

    fn draw_sprite(&mut self, sprite: SpriteId, top_left: IVec2, size: UVec2) -> Result<(), RenderError> {
        let uv = self
            .sprite_uvs
            .get(sprite.0 as usize)
            .copied()
            .ok_or(RenderError::UnknownSprite(sprite))?;
        let mut instance = ShapeInstance::new(ShapeKind::Sprite, top_left, size, Rgb::WHITE);
        instance.uv = uv;
        self.pending.push(instance);
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if self.pending.len() > self.capacity {
            self.pending.clear();
            return Err(RenderError::BatchOverflow {
                capacity: self.capacity,
            });
        }
        std::mem::swap(&mut self.frame, &mut self.pending);
        self.pending.clear();
        self.frame_clear = self.clear;
        Ok(())
    }
}
