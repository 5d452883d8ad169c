//! Color packing for compact attribute transport.
//!
//! A color travels as two floats, each holding two 8-bit channels as
//! `a * 256 + b`. Every value is an integer below 2^16, so it is exact in an
//! `f32` and the shader recovers both bytes with a shift and a mask.

use crate::style::Color;

/// Pack two channel values in `[0, 255]` into one float.
///
/// Inputs are rounded to the nearest integer and clamped.
#[inline]
#[must_use]
pub fn pack_uint8_to_float(a: f32, b: f32) -> f32 {
    let a = a.round().clamp(0.0, 255.0);
    let b = b.round().clamp(0.0, 255.0);
    256.0 * a + b
}

/// Pack a color as `[(r, g), (b, a)]`.
#[inline]
#[must_use]
pub fn pack_color(color: Color) -> [f32; 2] {
    [
        pack_uint8_to_float(255.0 * color.r, 255.0 * color.g),
        pack_uint8_to_float(255.0 * color.b, 255.0 * color.a),
    ]
}

/// Inverse of [`pack_uint8_to_float`], as performed by the shader.
#[must_use]
pub fn unpack_float(packed: f32) -> [u8; 2] {
    let packed = packed as u32;
    [(packed >> 8) as u8, (packed & 0xff) as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_pair_round_trips() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let packed = pack_uint8_to_float(f32::from(a), f32::from(b));
                assert_eq!(unpack_float(packed), [a, b]);
            }
        }
    }

    #[test]
    fn color_channels_round_trip() {
        for v in 0..=255u8 {
            let color = Color::from_rgba8(v, 255 - v, v / 2, 255);
            let [rg, ba] = pack_color(color);
            assert_eq!(unpack_float(rg), [v, 255 - v]);
            assert_eq!(unpack_float(ba), [v / 2, 255]);
        }
    }

    #[test]
    fn out_of_range_channels_clamp() {
        assert_eq!(pack_uint8_to_float(300.0, -4.0), 256.0 * 255.0);
        assert_eq!(pack_color(Color::WHITE), [65535.0, 65535.0]);
    }
}
