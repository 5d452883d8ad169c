//! RGBA color value used by color-typed paint properties.

use glam::Vec4;

/// Linear RGBA color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Color from float channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color from 8-bit channels.
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Channels as `[r, g, b, a]`.
    #[must_use]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Component-wise linear interpolation toward `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let mixed = Vec4::from_array(self.to_array())
            .lerp(Vec4::from_array(other.to_array()), t);
        Self::new(mixed.x, mixed.y, mixed.z, mixed.w)
    }

    /// Parse a CSS-like color string.
    ///
    /// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` and a handful of keywords. Returns `None` for
    /// anything else.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(body) = s.strip_prefix("rgba(").and_then(|b| b.strip_suffix(')')) {
            return parse_rgb_body(body, true);
        }
        if let Some(body) = s.strip_prefix("rgb(").and_then(|b| b.strip_suffix(')')) {
            return parse_rgb_body(body, false);
        }
        match s.as_str() {
            "transparent" => Some(Self::TRANSPARENT),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::new(1.0, 0.0, 0.0, 1.0)),
            "green" => Some(Self::from_rgba8(0, 128, 0, 255)),
            "blue" => Some(Self::new(0.0, 0.0, 1.0, 1.0)),
            _ => None,
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        4 => Some(Color::from_rgba8(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            nibble(3)?,
        )),
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_body(body: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |s: &str| -> Option<f32> {
        let v: f32 = s.parse().ok()?;
        Some((v / 255.0).clamp(0.0, 1.0))
    };
    let alpha = if with_alpha {
        parts[3].parse::<f32>().ok()?.clamp(0.0, 1.0)
    } else {
        1.0
    };
    Some(Color::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}
