use crate::color::{self, ColorScheme, Rgb};
use crate::simulation::StarField;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// A dot this dim doesn't light its braille bit
const DOT_THRESHOLD: f32 = 0.10;

/// A single rendered cell with position, foreground and optional glow tint
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub fg: Color,
    pub bg: Option<Color>,
}

/// Dot-resolution framebuffer. Each dot keeps the brightest thing drawn on
/// it; cells later take their color from their brightest dot.
struct DotGrid {
    width: usize,
    height: usize,
    weight: Vec<f32>,
    rgb: Vec<Rgb>,
}

impl DotGrid {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            weight: vec![0.0; width * height],
            rgb: vec![(0.0, 0.0, 0.0); width * height],
        }
    }

    fn plot(&mut self, x: i32, y: i32, weight: f32, rgb: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if weight > self.weight[idx] {
            self.weight[idx] = weight;
            self.rgb[idx] = rgb;
        }
    }

    fn at(&self, x: usize, y: usize) -> (f32, Rgb) {
        let idx = y * self.width + x;
        (self.weight[idx], self.rgb[idx])
    }
}

/// Visit every dot of the line segment from (x0,y0) to (x1,y1), passing the
/// normalized distance along the segment for gradient coloring.
pub fn plot_line(x0: i32, y0: i32, x1: i32, y1: i32, mut visit: impl FnMut(i32, i32, f32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let steps = dx.max(-dy).max(1) as f32;

    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let mut step = 0.0;
    loop {
        visit(x, y, step / steps);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        step += 1.0;
    }
}

/// Shared brightness pulse for a star at the given simulation clock
pub fn pulse(clock: f32, phase: f32) -> f32 {
    (clock * 2.0 + phase).sin() * 0.3 + 1.0
}

/// Rasterize the field to colored braille cells. The field runs in dot
/// space, so a canvas of WxH cells maps 1:1 onto a 2Wx4H dot grid.
pub fn render_field(
    field: &StarField,
    canvas_width: u16,
    canvas_height: u16,
    scheme: ColorScheme,
) -> Vec<BrailleCell> {
    let dot_width = canvas_width as usize * 2;
    let dot_height = canvas_height as usize * 4;
    if dot_width == 0 || dot_height == 0 {
        return Vec::new();
    }

    let mut grid = DotGrid::new(dot_width, dot_height);
    let clock = field.clock();
    let power = field.pointer.power;

    // Connection lines first so star cores win overlapping dots
    if field.settings.show_connections {
        let stars = field.stars();
        let radius = field.settings.connection_radius;
        for (a, b, dist) in field.connections() {
            let alpha = (0.25 * (1.0 - dist / radius) * power).min(0.6);
            if alpha < 0.05 {
                continue;
            }
            let (sa, sb) = (&stars[a], &stars[b]);
            let rgb_a = color::link_rgb(scheme, sa.hue, alpha);
            let rgb_b = color::link_rgb(scheme, sb.hue, alpha);
            plot_line(
                sa.x as i32,
                sa.y as i32,
                sb.x as i32,
                sb.y as i32,
                |x, y, t| grid.plot(x, y, alpha, color::lerp(rgb_a, rgb_b, t)),
            );
        }
    }

    for star in field.stars() {
        let pulse = pulse(clock, star.pulse_phase);
        let brightness = (star.opacity * pulse).clamp(0.0, 1.0);
        let rgb = color::star_rgb(scheme, star.hue, star.near_cursor, brightness);
        let (x, y) = (star.x.round() as i32, star.y.round() as i32);
        grid.plot(x, y, brightness, rgb);

        // Bigger (or cursor-boosted) stars spill into a plus-shaped halo
        let drawn_radius = star.radius * pulse * if star.near_cursor { 1.5 } else { 1.0 };
        if drawn_radius >= 1.6 {
            let halo = brightness * 0.5;
            for (ox, oy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                grid.plot(x + ox, y + oy, halo, color::scale(rgb, 0.5));
            }
        }
    }

    // Glow geometry in dot space; intensity follows magnetic power
    let glow_radius = field.settings.effective_orbit_radius(power) * power * 0.8;
    let draw_glow = field.settings.show_glow && field.pointer.present && glow_radius > 0.0;

    let mut cells = Vec::with_capacity((canvas_width as usize) * (canvas_height as usize) / 4);
    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let base_x = cx as usize * 2;
            let base_y = cy as usize * 4;

            let mut pattern: u8 = 0;
            let mut best_weight = 0.0;
            let mut best_rgb = (0.0, 0.0, 0.0);
            for (dx, col) in BRAILLE_DOTS.iter().enumerate() {
                for (dy, bit) in col.iter().enumerate() {
                    let (weight, rgb) = grid.at(base_x + dx, base_y + dy);
                    if weight >= DOT_THRESHOLD {
                        pattern |= bit;
                        if weight > best_weight {
                            best_weight = weight;
                            best_rgb = rgb;
                        }
                    }
                }
            }

            let bg = if draw_glow {
                let dx = (base_x as f32 + 1.0) - field.pointer.x;
                let dy = (base_y as f32 + 2.0) - field.pointer.y;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < glow_radius {
                    color::glow_bg(scheme, dist / glow_radius, power)
                } else {
                    None
                }
            } else {
                None
            };

            if pattern == 0 && bg.is_none() {
                continue;
            }

            let char = if pattern == 0 {
                ' '
            } else {
                char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ')
            };
            cells.push(BrailleCell {
                x: cx,
                y: cy,
                char,
                fg: color::to_color(best_rgb),
                bg,
            });
        }
    }

    cells
}

/// Dot-space dimensions of the simulation field for a given canvas size
pub fn calculate_field_size(canvas_width: u16, canvas_height: u16) -> (usize, usize) {
    // Braille gives 2x4 resolution per character
    (canvas_width as usize * 2, canvas_height as usize * 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FieldSettings;

    #[test]
    fn test_braille_pattern() {
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_braille_char_generation() {
        let empty = char::from_u32(BRAILLE_BASE).unwrap();
        assert_eq!(empty, '\u{2800}');

        let full = char::from_u32(BRAILLE_BASE + 0xFF).unwrap();
        assert_eq!(full, '\u{28FF}');
    }

    #[test]
    fn test_line_visits_both_endpoints() {
        let mut points = Vec::new();
        plot_line(0, 0, 5, 3, |x, y, _| points.push((x, y)));
        assert_eq!(points.first(), Some(&(0, 0)));
        assert_eq!(points.last(), Some(&(5, 3)));
    }

    #[test]
    fn test_line_gradient_monotonic() {
        let mut ts = Vec::new();
        plot_line(0, 0, 10, 0, |_, _, t| ts.push(t));
        assert!(ts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ts[0], 0.0);
        assert!((ts.last().unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_dot_grid_keeps_brightest() {
        let mut grid = DotGrid::new(4, 4);
        grid.plot(1, 1, 0.3, (0.3, 0.0, 0.0));
        grid.plot(1, 1, 0.8, (0.0, 0.8, 0.0));
        grid.plot(1, 1, 0.5, (0.0, 0.0, 0.5));
        let (weight, rgb) = grid.at(1, 1);
        assert_eq!(weight, 0.8);
        assert_eq!(rgb, (0.0, 0.8, 0.0));
    }

    #[test]
    fn test_dot_grid_ignores_out_of_bounds() {
        let mut grid = DotGrid::new(2, 2);
        grid.plot(-1, 0, 1.0, (1.0, 1.0, 1.0));
        grid.plot(0, 5, 1.0, (1.0, 1.0, 1.0));
        assert_eq!(grid.at(0, 0).0, 0.0);
        assert_eq!(grid.at(0, 1).0, 0.0);
    }

    #[test]
    fn test_render_zero_canvas_is_empty() {
        let field = StarField::new(0, 0, FieldSettings::default());
        assert!(render_field(&field, 0, 0, ColorScheme::Nebula).is_empty());
    }

    #[test]
    fn test_render_emits_cells_for_stars() {
        let (w, h) = calculate_field_size(40, 12);
        let field = StarField::new(w, h, FieldSettings::default());
        let cells = render_field(&field, 40, 12, ColorScheme::Nebula);
        assert!(!cells.is_empty());
        for cell in &cells {
            assert!(cell.x < 40 && cell.y < 12);
        }
    }

    #[test]
    fn test_no_glow_without_pointer() {
        let (w, h) = calculate_field_size(40, 12);
        let field = StarField::new(w, h, FieldSettings::default());
        let cells = render_field(&field, 40, 12, ColorScheme::Nebula);
        assert!(cells.iter().all(|c| c.bg.is_none()));
    }

    #[test]
    fn test_glow_tints_cells_near_pointer() {
        let (w, h) = calculate_field_size(40, 12);
        let mut field = StarField::new(w, h, FieldSettings::default());
        field.pointer_moved(w as f32 / 2.0, h as f32 / 2.0, 0);
        let cells = render_field(&field, 40, 12, ColorScheme::Nebula);
        assert!(cells.iter().any(|c| c.bg.is_some()));
    }
}
