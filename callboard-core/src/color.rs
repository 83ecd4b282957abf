//! Display-color resolution for admin-entered event colors.
//!
//! Admins type colors by hand, so anything can arrive: `#cfd6f6`, `fff`,
//! an already-formatted `rgba(...)`, or garbage. Rendering must survive
//! all of it, so parsing failures fall back to a fixed color instead of
//! erroring.

/// Opacity applied to event backgrounds.
pub const DEFAULT_EVENT_ALPHA: f32 = 0.82;

/// Fallback when a color is absent or unparseable.
pub const FALLBACK_EVENT_COLOR: &str = "rgba(255, 215, 170, 0.82)";

/// Parse a 3- or 6-digit hex color (optional leading `#`) into RGB.
pub fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let normalized = hex.trim().trim_start_matches('#');

    let full: String = match normalized.len() {
        3 => normalized.chars().flat_map(|c| [c, c]).collect(),
        6 => normalized.to_string(),
        _ => return None,
    };

    let packed = u32::from_str_radix(&full, 16).ok()?;
    Some((
        ((packed >> 16) & 0xff) as u8,
        ((packed >> 8) & 0xff) as u8,
        (packed & 0xff) as u8,
    ))
}

/// Resolve a color specifier to a display color at the given opacity.
///
/// `rgb`/`hsl`-prefixed strings are assumed preformatted and pass through
/// unchanged; hex triplets/sextets become `rgba(...)` with the alpha
/// clamped to [0, 1]; everything else returns the fallback.
pub fn to_display_color(specifier: Option<&str>, alpha: f32) -> String {
    let Some(color) = specifier.map(str::trim).filter(|c| !c.is_empty()) else {
        return FALLBACK_EVENT_COLOR.to_string();
    };

    if color.starts_with("rgb") || color.starts_with("hsl") {
        return color.to_string();
    }

    match parse_hex_rgb(color) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {})", alpha.clamp(0.0, 1.0)),
        None => FALLBACK_EVENT_COLOR.to_string(),
    }
}

/// [`to_display_color`] at the standard event-background opacity.
pub fn event_background(specifier: Option<&str>) -> String {
    to_display_color(specifier, DEFAULT_EVENT_ALPHA)
}
