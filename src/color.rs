//! RGB colours shared by the simulation (entity tints) and the renderer

use serde::{Deserialize, Serialize};

/// An opaque sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build from a `0xRRGGBB` literal
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// From hue (degrees), saturation and lightness (0.0 - 1.0)
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
        }
    }

    /// Linear blend toward `other` (t = 0.0 keeps self)
    pub fn mix(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let blend = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: blend(self.r, other.r),
            g: blend(self.g, other.g),
            b: blend(self.b, other.b),
        }
    }

    /// CSS hex string (`#rrggbb`)
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba()` string with the given alpha
    pub fn to_css_alpha(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
    }
}

/// Named colours used across the game
pub mod palette {
    use super::Color;

    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);

    // Player look and the shared "celebration" mix
    pub const PINK: Color = Color::hex(0xff6b9d);
    pub const PURPLE: Color = Color::hex(0xa855f7);
    pub const MINT: Color = Color::hex(0x06d6a0);
    pub const SUNSHINE: Color = Color::hex(0xffd23f);
    pub const CELEBRATION: [Color; 3] = [PINK, PURPLE, MINT];

    pub const HURT_RED: Color = Color::hex(0xff4757);
    pub const HEALTH_GREEN: Color = Color::hex(0x00ff88);
    pub const GOLD: Color = Color::hex(0xffd700);
    pub const HOT_PINK: Color = Color::hex(0xff69b4);
    pub const SKY: Color = Color::hex(0x87ceeb);
    pub const CYAN: Color = Color::hex(0x00d4ff);
    pub const ORANGE: Color = Color::hex(0xff7f51);

    // Enemy tints
    pub const BLUE: Color = Color::hex(0x4a90e2);
    pub const RED: Color = Color::hex(0xe74c3c);
    pub const PLUM: Color = Color::hex(0x8e44ad);
    pub const AMBER: Color = Color::hex(0xf39c12);
    pub const EMERALD: Color = Color::hex(0x2ecc71);
    pub const SLATE: Color = Color::hex(0x34495e);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trips_to_css() {
        assert_eq!(palette::PINK.to_css(), "#ff6b9d");
        assert_eq!(Color::hex(0x010203), Color { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5), Color::hex(0xff0000));
        assert_eq!(Color::from_hsl(120.0, 1.0, 0.5), Color::hex(0x00ff00));
        assert_eq!(Color::from_hsl(600.0, 1.0, 0.5), Color::hex(0x0000ff));
        assert_eq!(Color::from_hsl(42.0, 0.0, 1.0), palette::WHITE);
    }

    #[test]
    fn test_mix_endpoints() {
        assert_eq!(palette::BLACK.mix(palette::WHITE, 0.0), palette::BLACK);
        assert_eq!(palette::BLACK.mix(palette::WHITE, 1.0), palette::WHITE);
    }

    #[test]
    fn test_css_alpha_is_clamped() {
        assert_eq!(palette::BLACK.to_css_alpha(2.0), "rgba(0, 0, 0, 1.000)");
    }
}
