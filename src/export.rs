use crate::braille;
use crate::color::{self, ColorScheme};
use crate::simulation::StarField;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Render the current field state to an RGBA image, `scale` pixels per
/// braille dot. Layering matches the terminal renderer: glow, then
/// connection lines, then star dots on top.
pub fn render_image(field: &StarField, scheme: ColorScheme, scale: u32) -> RgbaImage {
    let scale = scale.max(1);
    let width = (field.width.max(1.0) as u32) * scale;
    let height = (field.height.max(1.0) as u32) * scale;
    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));

    let pointer = field.pointer;

    if field.settings.show_glow && pointer.present {
        let glow_radius =
            field.settings.effective_orbit_radius(pointer.power) * pointer.power * 0.8;
        if glow_radius > 0.0 {
            paint_glow(&mut img, field, scheme, scale, glow_radius);
        }
    }

    if field.settings.show_connections {
        let stars = field.stars();
        for (a, b, dist) in field.connections() {
            let alpha = (0.25 * (1.0 - dist / field.settings.connection_radius)
                * pointer.power)
                .min(0.6);
            if alpha < 0.05 {
                continue;
            }
            let from = color::link_rgb(scheme, stars[a].hue, alpha);
            let to = color::link_rgb(scheme, stars[b].hue, alpha);
            let (x0, y0) = (stars[a].x.round() as i32, stars[a].y.round() as i32);
            let (x1, y1) = (stars[b].x.round() as i32, stars[b].y.round() as i32);
            braille::plot_line(x0, y0, x1, y1, |dx, dy, t| {
                blend_block(&mut img, dx, dy, scale, color::lerp(from, to, t));
            });
        }
    }

    for star in field.stars() {
        let pulse = braille::pulse(field.clock(), star.pulse_phase);
        let brightness = (star.opacity * pulse).clamp(0.0, 1.0);
        let rgb = color::star_rgb(scheme, star.hue, star.near_cursor, brightness);
        let radius = (star.radius * pulse * scale as f32 * 0.5).max(1.0);
        fill_dot(&mut img, star.x * scale as f32, star.y * scale as f32, radius, rgb);
    }

    img
}

/// Write a snapshot of the field to `path` as a PNG
pub fn write_snapshot(
    field: &StarField,
    scheme: ColorScheme,
    scale: u32,
    path: &Path,
) -> Result<(), String> {
    let img = render_image(field, scheme, scale);
    img.save(path)
        .map_err(|e| format!("Failed to write snapshot {}: {}", path.display(), e))
}

/// Write a snapshot to a timestamped PNG in the current directory and
/// return its path.
pub fn snapshot(field: &StarField, scheme: ColorScheme, scale: u32) -> Result<PathBuf, String> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("System clock error: {}", e))?
        .as_secs();
    let path = PathBuf::from(format!("starfield-{}.png", secs));
    write_snapshot(field, scheme, scale, &path)?;
    Ok(path)
}

/// Paint the pointer glow as a radial gradient behind everything else
fn paint_glow(
    img: &mut RgbaImage,
    field: &StarField,
    scheme: ColorScheme,
    scale: u32,
    glow_radius: f32,
) {
    let pointer = field.pointer;
    let (width, height) = img.dimensions();
    for py in 0..height {
        for px in 0..width {
            let dx = (px as f32 + 0.5) / scale as f32 - pointer.x;
            let dy = (py as f32 + 0.5) / scale as f32 - pointer.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist >= glow_radius {
                continue;
            }
            let rgb = color::glow_rgb(scheme, dist / glow_radius, pointer.power);
            blend_max(img, px, py, rgb);
        }
    }
}

/// Stamp a scale-sized block for one line step, so connection lines stay
/// visible at higher export scales.
fn blend_block(img: &mut RgbaImage, dot_x: i32, dot_y: i32, scale: u32, rgb: color::Rgb) {
    if dot_x < 0 || dot_y < 0 {
        return;
    }
    let base_x = dot_x as u32 * scale;
    let base_y = dot_y as u32 * scale;
    for oy in 0..scale {
        for ox in 0..scale {
            let (px, py) = (base_x + ox, base_y + oy);
            if px < img.width() && py < img.height() {
                blend_max(img, px, py, rgb);
            }
        }
    }
}

/// Fill a circular dot centered at pixel coordinates
fn fill_dot(img: &mut RgbaImage, cx: f32, cy: f32, radius: f32, rgb: color::Rgb) {
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(img.width().saturating_sub(1));
    let y1 = ((cy + radius).ceil() as u32).min(img.height().saturating_sub(1));
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = px as f32 + 0.5 - cx;
            let dy = py as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                blend_max(img, px, py, rgb);
            }
        }
    }
}

/// Brightest-wins per channel, like the terminal dot grid
fn blend_max(img: &mut RgbaImage, x: u32, y: u32, rgb: color::Rgb) {
    let [r, g, b] = color::to_rgba8(rgb);
    let px = img.get_pixel_mut(x, y);
    px.0[0] = px.0[0].max(r);
    px.0[1] = px.0[1].max(g);
    px.0[2] = px.0[2].max(b);
}
