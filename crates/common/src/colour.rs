use serde::{Deserialize, Serialize};

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const BROWN: Rgb = Rgb(128, 64, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(237, 28, 36);
    pub const GREEN: Rgb = Rgb(34, 177, 76);
    pub const BLUE: Rgb = Rgb(63, 72, 204);
    pub const DARK_GREY: Rgb = Rgb(40, 40, 40);
    pub const GREY: Rgb = Rgb(128, 128, 128);
    pub const GOLD: Rgb = Rgb(255, 201, 14);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);

    /// Multiply each channel by `factor`, truncating. Results saturate at 0 and 255.
    pub fn scale(self, factor: f32) -> Rgb {
        let ch = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Rgb(ch(self.0), ch(self.1), ch(self.2))
    }

    /// Grey level from the channel vector length, capped at 255.
    pub fn to_greyscale(self) -> Rgb {
        let (r, g, b) = (self.0 as f32, self.1 as f32, self.2 as f32);
        let c = (r * r + g * g + b * b).sqrt().min(255.0) as u8;
        Rgb(c, c, c)
    }

    /// Linear 0..1 RGBA with full alpha, as GPU backends want it.
    pub fn to_f32_rgba(self) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            1.0,
        ]
    }
}
