//! UI theme colors and the wheel segment palette.

use ratatui::style::Color;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,           // Active borders, highlights
    pub accent_bright: Color,    // Brighter accent
    pub danger: Color,           // Errors
    pub success: Color,          // Success indicators
    pub warning: Color,          // Status messages
    pub text: Color,             // Primary text
    pub text_dim: Color,         // Dimmed text
    pub inactive: Color,         // Inactive borders
    pub header: Color,           // Header text
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired defaults
        Self {
            accent: Color::Rgb(250, 179, 135),
            accent_bright: Color::Rgb(245, 194, 231),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(243, 139, 168),
        }
    }
}

/// Default wheel segment colors, assigned cyclically by list position.
pub const DEFAULT_WHEEL_PALETTE: [&str; 8] = [
    "#F43F5E", // rose
    "#F59E0B", // amber
    "#10B981", // emerald
    "#0EA5E9", // sky
    "#8B5CF6", // violet
    "#EC4899", // pink
    "#14B8A6", // teal
    "#F97316", // orange
];

/// Build the wheel palette, honoring config overrides when they parse.
/// Invalid entries are skipped; an empty result falls back to the default.
pub fn wheel_palette(overrides: &[String]) -> Vec<Color> {
    let custom: Vec<Color> = overrides
        .iter()
        .filter_map(|s| parse_hex_color(s))
        .collect();

    if !custom.is_empty() {
        return custom;
    }

    DEFAULT_WHEEL_PALETTE
        .iter()
        .filter_map(|s| parse_hex_color(s))
        .collect()
}

/// Render an RGB color back to "#RRGGBB" (named colors have no fixed hex).
pub fn color_to_hex(color: Color) -> Option<String> {
    match color {
        Color::Rgb(r, g, b) => Some(format!("#{:02X}{:02X}{:02X}", r, g, b)),
        _ => None,
    }
}

/// Parse a hex color string (#RRGGBB or #RGB)
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');

    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_six_digit() {
        assert_eq!(parse_hex_color("#F43F5E"), Some(Color::Rgb(244, 63, 94)));
        assert_eq!(parse_hex_color("10B981"), Some(Color::Rgb(16, 185, 129)));
    }

    #[test]
    fn test_parse_hex_three_digit() {
        assert_eq!(parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#f00"), Some(Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_hex_round_trip() {
        let color = parse_hex_color("#F43F5E").unwrap();
        assert_eq!(color_to_hex(color), Some("#F43F5E".to_string()));
        assert_eq!(color_to_hex(Color::Red), None);
    }

    #[test]
    fn test_palette_fallback_on_bad_overrides() {
        let palette = wheel_palette(&["nope".to_string()]);
        assert_eq!(palette.len(), DEFAULT_WHEEL_PALETTE.len());
    }

    #[test]
    fn test_palette_override() {
        let palette = wheel_palette(&["#fff".to_string(), "#000".to_string()]);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0], Color::Rgb(255, 255, 255));
    }
}
