//! Image assets: the object sprite sheet and the window icon.
//!
//! Images are decoded once at startup into plain RGBA8 buffers. The renderer
//! refers to sprites by [`SpriteId`], never by file path.
//!
//! # Layout
//! A sprite sheet is a grid of square cells read row-major from the top
//! left. Cell `n` becomes `SpriteId(n)`; partial cells at the right and
//! bottom edges are ignored.

use deepspace_common::SpriteId;
use image::imageops::FilterType;
use image::RgbaImage;
use std::path::Path;

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid sprite sheet: {0}")]
    InvalidSheet(String),
}

/// Normalized texture rectangle: `[u0, v0, u1, v1]`.
pub type UvRect = [f32; 4];

/// Decoded sprite sheet plus the UV rectangle of every cell.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    width: u32,
    height: u32,
    cell: u32,
    pixels: Vec<u8>,
    uvs: Vec<UvRect>,
}

impl SpriteSheet {
    /// Decode a PNG sheet from disk.
    pub fn load(path: impl AsRef<Path>, cell: u32) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let sheet = Self::from_image(img, cell)?;
        tracing::info!(
            path = %path.display(),
            sprites = sheet.len(),
            "sprite sheet loaded"
        );
        Ok(sheet)
    }

    /// Build a sheet from raw RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>, cell: u32) -> Result<Self, AssetError> {
        let img = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            AssetError::InvalidSheet(format!("pixel buffer does not match {width}x{height}"))
        })?;
        Self::from_image(img, cell)
    }

    fn from_image(img: RgbaImage, cell: u32) -> Result<Self, AssetError> {
        let (width, height) = img.dimensions();
        if cell == 0 {
            return Err(AssetError::InvalidSheet("cell size must be positive".into()));
        }
        let (cols, rows) = (width / cell, height / cell);
        if cols == 0 || rows == 0 {
            return Err(AssetError::InvalidSheet(format!(
                "{width}x{height} image is smaller than one {cell}px cell"
            )));
        }

        let (w, h) = (width as f32, height as f32);
        let mut uvs = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = ((col * cell) as f32, (row * cell) as f32);
                uvs.push([x / w, y / h, (x + cell as f32) / w, (y + cell as f32) / h]);
            }
        }

        Ok(Self {
            width,
            height,
            cell,
            pixels: img.into_raw(),
            uvs,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell(&self) -> u32 {
        self.cell
    }

    /// RGBA8, row-major, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of sprites in the sheet.
    pub fn len(&self) -> usize {
        self.uvs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uvs.is_empty()
    }

    pub fn uv(&self, sprite: SpriteId) -> Option<UvRect> {
        self.uvs.get(sprite.0 as usize).copied()
    }

    pub fn uvs(&self) -> &[UvRect] {
        &self.uvs
    }
}

/// A square RGBA8 window icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Load an image and scale it to a `size`x`size` icon.
pub fn load_icon(path: impl AsRef<Path>, size: u32) -> Result<Icon, AssetError> {
    let img = image::open(path.as_ref())?.to_rgba8();
    Ok(icon_from_image(&img, size))
}

fn icon_from_image(img: &RgbaImage, size: u32) -> Icon {
    let scaled = if img.dimensions() == (size, size) {
        img.clone()
    } else {
        image::imageops::resize(img, size, size, FilterType::Triangle)
    };
    Icon {
        rgba: scaled.into_raw(),
        width: size,
        height: size,
    }
}

pub fn crate_info() -> &'static str {
    "deepspace-assets v0.1.0"
}
