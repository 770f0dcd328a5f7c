use deepspace_common::{Rgb, SpriteId};

/// How objects of one kind are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Filled circle of the object's size with a black square punched in it.
    Disc(Rgb),
    /// A sprite-sheet cell scaled to the object's size.
    Sprite(SpriteId),
}

/// Kind-to-style lookup plus the fixed overlay colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Rgb,
    /// Colour of the square drawn over each disc.
    pub mask: Rgb,
    pub crosshair: Rgb,
    pub frame: Rgb,
    styles: Vec<Style>,
    fallback: Style,
}

/// Disc colours by object kind.
pub const KIND_COLOURS: [Rgb; 6] = [
    Rgb::RED,
    Rgb::GREEN,
    Rgb::GOLD,
    Rgb::BLUE,
    Rgb::YELLOW,
    Rgb::DARK_GREY,
];

impl Default for Palette {
    fn default() -> Self {
        Self::flat()
    }
}

impl Palette {
    /// Flat shapes only; needs no assets.
    pub fn flat() -> Self {
        Self {
            background: Rgb::BLACK,
            mask: Rgb::BLACK,
            crosshair: Rgb::WHITE,
            frame: Rgb::GOLD,
            styles: KIND_COLOURS.iter().copied().map(Style::Disc).collect(),
            fallback: Style::Disc(Rgb::GREY),
        }
    }

    /// Kinds below `sprite_count` use the sprite with the same index; the
    /// rest keep their flat disc.
    pub fn with_sprites(sprite_count: u16) -> Self {
        let mut palette = Self::flat();
        for (kind, style) in palette.styles.iter_mut().enumerate() {
            if kind < sprite_count as usize {
                *style = Style::Sprite(SpriteId(kind as u16));
            }
        }
        palette
    }

    /// Style for `kind`, or the grey fallback for kinds outside the table.
    pub fn style(&self, kind: u8) -> Style {
        self.styles
            .get(kind as usize)
            .copied()
            .unwrap_or(self.fallback)
    }
}
