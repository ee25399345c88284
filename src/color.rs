use palette::Srgb;

/// Format an 8-bit color as `#rrggbb` (lowercase, zero-padded per channel).
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Round a real-valued RGB triple to the nearest 8-bit color.
///
/// Halfway values round to even, and anything outside 0-255 saturates. Means of
/// valid pixels never leave that range, so saturation only guards float noise.
pub(crate) fn round_to_srgb(c: [f64; 3]) -> Srgb<u8> {
    let channel = |v: f64| v.round_ties_even().clamp(0.0, 255.0) as u8;
    Srgb::new(channel(c[0]), channel(c[1]), channel(c[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(to_hex(Srgb::new(255, 0, 128)), "#ff0080");
        assert_eq!(to_hex(Srgb::new(0, 0, 0)), "#000000");
        assert_eq!(to_hex(Srgb::new(1, 10, 171)), "#010aab");
    }

    #[test]
    fn rounding_goes_to_even_on_ties() {
        assert_eq!(round_to_srgb([0.5, 1.5, 2.5]), Srgb::new(0, 2, 2));
        assert_eq!(round_to_srgb([127.49, 127.51, 254.9]), Srgb::new(127, 128, 255));
    }

    #[test]
    fn rounding_saturates() {
        assert_eq!(round_to_srgb([-0.7, 255.6, 300.0]), Srgb::new(0, 255, 255));
    }
}
