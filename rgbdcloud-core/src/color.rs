//! Packed RGB color codec
//!
//! PCD stores a 24-bit color inside the bit pattern of a 32-bit float field named
//! `rgb`. The float is never a numeric conversion of the color: the packed integer
//! bits are reinterpreted as an `f32` on the way in and back to `u32` on the way out.

/// Pack an 8-bit RGB triple into `0x00RRGGBB`
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Unpack `0x??RRGGBB` into an RGB triple, ignoring the top byte
#[inline]
pub fn unpack_rgb(value: u32) -> [u8; 3] {
    [
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
    ]
}

/// Pack a color and reinterpret the packed bits as the PCD `rgb` float
#[inline]
pub fn pack_rgb_f32(color: [u8; 3]) -> f32 {
    f32::from_bits(pack_rgb(color[0], color[1], color[2]))
}

/// Recover a color from the bit pattern of a PCD `rgb` float
#[inline]
pub fn unpack_rgb_f32(value: f32) -> [u8; 3] {
    unpack_rgb(value.to_bits())
}

/// Convert a normalized (0..1) color to 8-bit channels, rounding to nearest
pub fn to_u8_color(color: [f32; 3]) -> [u8; 3] {
    color.map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Convert 8-bit channels to a normalized (0..1) color
pub fn to_unit_color(color: [u8; 3]) -> [f32; 3] {
    color.map(|c| c as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), 0x0012_3456);
        assert_eq!(pack_rgb(255, 0, 0), 0x00FF_0000);
        assert_eq!(unpack_rgb(0xAA12_3456), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn test_round_trip_all_colors() {
        for r in 0..=255u8 {
            for g in 0..=255u8 {
                for b in 0..=255u8 {
                    assert_eq!(unpack_rgb(pack_rgb(r, g, b)), [r, g, b]);
                    let f = pack_rgb_f32([r, g, b]);
                    assert_eq!(unpack_rgb_f32(f), [r, g, b]);
                }
            }
        }
    }

    #[test]
    fn test_float_is_bit_reinterpretation() {
        let f = pack_rgb_f32([255, 255, 255]);
        assert_eq!(f.to_bits(), 0x00FF_FFFF);
        // A numeric cast would give 16777215.0
        assert_ne!(f, 16_777_215.0);
        assert!(f.is_subnormal());
    }

    #[test]
    fn test_unit_color_conversion() {
        for c in 0..=255u8 {
            assert_eq!(to_u8_color(to_unit_color([c, c, c])), [c, c, c]);
        }
        assert_eq!(to_u8_color([1.5, -0.2, 0.5]), [255, 0, 128]);
    }
}
