//! Colour helpers for the custom theme engine.
//!
//! Applying the resulting colours is the renderer's job; this module only
//! derives them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Primary/secondary pair produced by [`smart_palette`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
}

/// Skins the renderer knows how to draw.
pub const SKINS: [&str; 4] = ["skin-default", "skin-neon", "skin-retro", "skin-minimal"];
pub const FONT_STYLES: [&str; 3] = ["font-inter", "font-mono", "font-serif"];
pub const PRESET_THEMES: [&str; 6] = [
    "aura-default",
    "theme-neon-nights",
    "theme-forest-calm",
    "theme-solar-warm",
    "theme-midnight-rose",
    "theme-ocean-deep",
];

/// Parse `#rrggbb` (the `#` is optional, case-insensitive).
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Shift every channel by `percent` of full scale, clamping to 0..=255.
/// Unparsable input is returned unchanged.
pub fn adjust_color_brightness(hex: &str, percent: f32) -> String {
    let Some(rgb) = hex_to_rgb(hex) else {
        return hex.to_string();
    };
    let amount = (2.55 * percent).round() as i32;
    let shift = |c: u8| (i32::from(c) + amount).clamp(0, 255) as u8;
    rgb_to_hex(Rgb {
        r: shift(rgb.r),
        g: shift(rgb.g),
        b: shift(rgb.b),
    })
}

/// Derive a secondary colour from `primary` (a lighter variant).
pub fn smart_palette(primary: &str) -> Palette {
    if hex_to_rgb(primary).is_none() {
        return Palette {
            primary: primary.to_string(),
            secondary: "#ffffff".to_string(),
        };
    }
    Palette {
        primary: primary.to_string(),
        secondary: adjust_color_brightness(primary, 40.0),
    }
}

/// Translucent border colour matching `primary`, used for glass panels.
pub fn glass_border(primary: &str) -> Option<String> {
    let Rgb { r, g, b } = hex_to_rgb(primary)?;
    Some(format!("rgba({r}, {g}, {b}, 0.3)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(
            hex_to_rgb("#00c6ff"),
            Some(Rgb {
                r: 0,
                g: 198,
                b: 255
            })
        );
        assert_eq!(hex_to_rgb("0072FF").map(|c| c.b), Some(255));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }

    #[test]
    fn test_adjust_brightness_clamps() {
        // +40% = +102 per channel
        assert_eq!(adjust_color_brightness("#00c6ff", 40.0), "#66ffff");
        assert_eq!(adjust_color_brightness("#101010", -40.0), "#000000");
        assert_eq!(adjust_color_brightness("nope", 40.0), "nope");
    }

    #[test]
    fn test_smart_palette_fallback() {
        let p = smart_palette("not-a-colour");
        assert_eq!(p.secondary, "#ffffff");
        let p = smart_palette("#0072ff");
        assert_eq!(p.secondary, "#66d8ff");
    }

    #[test]
    fn test_glass_border() {
        assert_eq!(
            glass_border("#00c6ff").as_deref(),
            Some("rgba(0, 198, 255, 0.3)")
        );
    }
}
