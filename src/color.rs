use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Stars are created with a hue inside a fixed 60-degree band; a scheme
/// shifts that band at render time without touching simulation state.
pub const BASE_HUE: f32 = 200.0;

/// Color scheme for stars, connections and the pointer glow
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Blue to violet (the classic night-sky look)
    #[default]
    Nebula,
    /// Red to amber
    Ember,
    /// Green to teal
    Aurora,
    /// Grayscale
    Mono,
}

impl ColorScheme {
    pub fn name(&self) -> &str {
        match self {
            ColorScheme::Nebula => "Nebula",
            ColorScheme::Ember => "Ember",
            ColorScheme::Aurora => "Aurora",
            ColorScheme::Mono => "Mono",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Nebula => ColorScheme::Ember,
            ColorScheme::Ember => ColorScheme::Aurora,
            ColorScheme::Aurora => ColorScheme::Mono,
            ColorScheme::Mono => ColorScheme::Nebula,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ColorScheme::Nebula => ColorScheme::Mono,
            ColorScheme::Ember => ColorScheme::Nebula,
            ColorScheme::Aurora => ColorScheme::Ember,
            ColorScheme::Mono => ColorScheme::Aurora,
        }
    }

    /// Start of this scheme's hue band; None renders grayscale
    fn band_start(&self) -> Option<f32> {
        match self {
            ColorScheme::Nebula => Some(200.0),
            ColorScheme::Ember => Some(0.0),
            ColorScheme::Aurora => Some(110.0),
            ColorScheme::Mono => None,
        }
    }

    /// Shift a stored star hue (BASE_HUE band) into this scheme's band
    pub fn remap(&self, hue: f32) -> Option<f32> {
        self.band_start().map(|start| start + (hue - BASE_HUE))
    }

    /// Inner and outer glow colors for the pointer halo
    pub fn glow_colors(&self) -> (Rgb, Rgb) {
        match self {
            ColorScheme::Nebula => ((0.55, 0.36, 0.96), (0.23, 0.51, 0.96)),
            ColorScheme::Ember => ((0.96, 0.45, 0.23), (0.96, 0.23, 0.28)),
            ColorScheme::Aurora => ((0.36, 0.96, 0.55), (0.23, 0.96, 0.78)),
            ColorScheme::Mono => ((0.60, 0.60, 0.60), (0.35, 0.35, 0.35)),
        }
    }
}

/// Linear RGB triple, channels in 0..=1
pub type Rgb = (f32, f32, f32);

/// Standard HSL to RGB. Hue in degrees (wraps), saturation/lightness in 0..=1.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0..=59 => (c, x, 0.0),
        60..=119 => (x, c, 0.0),
        120..=179 => (0.0, c, x),
        180..=239 => (0.0, x, c),
        240..=299 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}

/// Color for a star dot. Near-cursor stars draw from the scheme's hue band
/// at high saturation; resting stars are plain white. The terminal has no
/// alpha channel, so opacity scales the channels instead.
pub fn star_rgb(scheme: ColorScheme, hue: f32, near_cursor: bool, alpha: f32) -> Rgb {
    let alpha = alpha.clamp(0.0, 1.0);
    if !near_cursor {
        return (alpha, alpha, alpha);
    }
    match scheme.remap(hue) {
        Some(h) => scale(hsl_to_rgb(h, 1.0, 0.8), alpha),
        None => (alpha, alpha, alpha),
    }
}

/// Color for a connection line endpoint (dimmer than a star core)
pub fn link_rgb(scheme: ColorScheme, hue: f32, alpha: f32) -> Rgb {
    let alpha = alpha.clamp(0.0, 1.0);
    match scheme.remap(hue) {
        Some(h) => scale(hsl_to_rgb(h, 0.7, 0.6), alpha),
        None => scale((0.8, 0.8, 0.8), alpha),
    }
}

/// Raw glow tint at a fractional distance from the pointer. Fades linearly
/// to the rim and brightens with dwell power, capped well below full white
/// so foreground dots stay readable on top of it.
pub fn glow_rgb(scheme: ColorScheme, dist_frac: f32, power: f32) -> Rgb {
    let alpha = ((1.0 - dist_frac) * 0.15 * power).clamp(0.0, 0.75);
    let (inner, outer) = scheme.glow_colors();
    scale(lerp(inner, outer, dist_frac), alpha)
}

/// Background tint for a cell inside the pointer glow, or None when the
/// contribution is too dim to show.
pub fn glow_bg(scheme: ColorScheme, dist_frac: f32, power: f32) -> Option<Color> {
    let c = to_color(glow_rgb(scheme, dist_frac, power));
    // Drop tints that would round to near-black anyway
    match c {
        Color::Rgb(r, g, b) if r.max(g).max(b) < 8 => None,
        other => Some(other),
    }
}

pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    (
        a.0 + (b.0 - a.0) * t,
        a.1 + (b.1 - a.1) * t,
        a.2 + (b.2 - a.2) * t,
    )
}

pub fn scale(rgb: Rgb, k: f32) -> Rgb {
    (rgb.0 * k, rgb.1 * k, rgb.2 * k)
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(
        (rgb.0.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.1.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.2.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

pub fn to_rgba8(rgb: Rgb) -> [u8; 3] {
    [
        (rgb.0.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.1.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.2.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        let (r, g, b) = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((r - 1.0).abs() < 1e-5 && g.abs() < 1e-5 && b.abs() < 1e-5);

        let (r, g, b) = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!(r.abs() < 1e-5 && (g - 1.0).abs() < 1e-5 && b.abs() < 1e-5);

        let (r, g, b) = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!(r.abs() < 1e-5 && g.abs() < 1e-5 && (b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hsl_grayscale_when_desaturated() {
        let (r, g, b) = hsl_to_rgb(200.0, 0.0, 0.5);
        assert!((r - 0.5).abs() < 1e-5);
        assert!((g - 0.5).abs() < 1e-5);
        assert!((b - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(hsl_to_rgb(380.0, 1.0, 0.5), hsl_to_rgb(20.0, 1.0, 0.5));
        assert_eq!(hsl_to_rgb(-90.0, 1.0, 0.5), hsl_to_rgb(270.0, 1.0, 0.5));
    }

    #[test]
    fn test_resting_star_is_white() {
        let rgb = star_rgb(ColorScheme::Nebula, 230.0, false, 1.0);
        assert_eq!(rgb, (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_mono_scheme_has_no_hue() {
        let rgb = star_rgb(ColorScheme::Mono, 230.0, true, 0.8);
        assert!((rgb.0 - rgb.1).abs() < 1e-5);
        assert!((rgb.1 - rgb.2).abs() < 1e-5);
    }

    #[test]
    fn test_scheme_cycle_round_trips() {
        let start = ColorScheme::Nebula;
        let mut scheme = start;
        for _ in 0..4 {
            scheme = scheme.next();
        }
        assert_eq!(scheme, start);
        assert_eq!(start.next().prev(), start);
    }

    #[test]
    fn test_glow_fades_out_at_edge() {
        assert!(glow_bg(ColorScheme::Nebula, 0.0, 5.0).is_some());
        assert!(glow_bg(ColorScheme::Nebula, 1.0, 5.0).is_none());
    }
}
