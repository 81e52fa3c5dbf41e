use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed trace colours
// ---------------------------------------------------------------------------

/// 8-bit sRGB colour used throughout the figure model.
pub type Rgb = Srgb<u8>;

pub const CONE_RESISTANCE: Rgb = Srgb::new(0x2d, 0x2e, 0x87);
pub const LOCAL_FRICTION: Rgb = Srgb::new(0xe0, 0x49, 0x13);
/// matplotlib `tab:gray`
pub const FRICTION_RATIO: Rgb = Srgb::new(0x7f, 0x7f, 0x7f);
/// matplotlib `tab:blue`
pub const GROUNDWATER: Rgb = Srgb::new(0x1f, 0x77, 0xb4);
/// matplotlib `tab:brown`
pub const SURFACE: Rgb = Srgb::new(0x8c, 0x56, 0x4b);

pub const WHITE: Rgb = Srgb::new(0xff, 0xff, 0xff);
pub const BLACK: Rgb = Srgb::new(0x00, 0x00, 0x00);

// ---------------------------------------------------------------------------
// Hex codes
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` / `#rgb` (leading `#` optional).
pub fn parse_hex(code: &str) -> Option<Rgb> {
    code.trim().parse::<Rgb>().ok()
}

/// Format as lowercase `#rrggbb`.
pub fn to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

// ---------------------------------------------------------------------------
// Blending
// ---------------------------------------------------------------------------

/// Composite `fg` over `bg` with the given opacity, in linear light.
pub fn blend(fg: Rgb, bg: Rgb, alpha: f32) -> Rgb {
    let fg: LinSrgb = fg.into_format::<f32>().into_linear();
    let bg: LinSrgb = bg.into_format::<f32>().into_linear();
    let mixed = bg.mix(fg, alpha.clamp(0.0, 1.0));
    Srgb::<f32>::from_linear(mixed).into_format()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_is_lowercase() {
        let c = parse_hex("#2D2E87").unwrap();
        assert_eq!(c, CONE_RESISTANCE);
        assert_eq!(to_hex(c), "#2d2e87");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hex("tab:gray").is_none());
        assert!(parse_hex("").is_none());
    }

    #[test]
    fn blend_extremes() {
        assert_eq!(blend(BLACK, WHITE, 0.0), WHITE);
        assert_eq!(blend(BLACK, WHITE, 1.0), BLACK);
    }
}
