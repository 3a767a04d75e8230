use crate::settings::{FieldSettings, Layout};
use rand::rngs::ThreadRng;
use rand::Rng;

/// Stars closer to the pointer than this never orbit, so the orbit angle
/// math stays away from the singularity at zero distance.
pub const ORBIT_DEAD_ZONE: f32 = 10.0;

/// Opacity floor; resting stars stay faintly visible, never fully dark
pub const MIN_OPACITY: f32 = 0.4;

/// Nominal per-frame clock step (phase math only, not frame pacing)
const SIM_TICK: f32 = 0.016;

/// One animated star. Position, velocity, opacity and the near-cursor flag
/// mutate every frame; everything else is fixed at creation.
#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    /// Resting coordinate the star relaxes toward absent pointer influence
    pub home_x: f32,
    pub home_y: f32,
    /// Rendered dot size (0.5-2.0)
    pub radius: f32,
    /// Brightness (MIN_OPACITY..=1.0)
    pub opacity: f32,
    /// Relaxation/pull rate (0.01-0.03)
    pub drift: f32,
    pub vx: f32,
    pub vy: f32,
    /// Hue within the 60-degree band starting at color::BASE_HUE
    pub hue: f32,
    /// Offsets the shared brightness pulse so stars don't blink in lockstep
    pub pulse_phase: f32,
    /// Inside the effective orbit radius and beyond the dead zone.
    /// Render-side only: glow strength, coloring, connection eligibility.
    pub near_cursor: bool,
}

/// Pointer state for one field session. Timestamps are caller-supplied
/// milliseconds so the field itself never touches a wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    /// False until the first pointer event; an absent pointer influences
    /// nothing and draws no glow.
    pub present: bool,
    /// Scales attraction while the pointer dwells; 1.0 when moving
    pub power: f32,
    press_until_ms: u64,
    last_move_ms: u64,
}

impl Pointer {
    /// True within the timed pulse after a press. The pulse ends on its own
    /// after press_pulse_ms; release is deliberately not tracked.
    pub fn is_pressing(&self, now_ms: u64) -> bool {
        self.present && now_ms < self.press_until_ms
    }
}

/// The interactive star field: a fixed-size set of stars advanced once per
/// frame against the current pointer state, in braille-dot coordinates.
pub struct StarField {
    pub width: f32,
    pub height: f32,
    stars: Vec<Star>,
    pub pointer: Pointer,
    pub settings: FieldSettings,
    pub paused: bool,
    clock: f32,
    rng: ThreadRng,
}

impl StarField {
    pub fn new(width: usize, height: usize, settings: FieldSettings) -> Self {
        let mut field = Self {
            width: width as f32,
            height: height as f32,
            stars: Vec::new(),
            pointer: Pointer {
                power: 1.0,
                ..Pointer::default()
            },
            settings,
            paused: false,
            clock: 0.0,
            rng: rand::thread_rng(),
        };
        field.scatter();
        field
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Rebuild the entire star set from the current settings and layout.
    /// Homes land inside [0, width) x [0, height); a degenerate field gets
    /// no stars at all.
    pub fn scatter(&mut self) {
        self.clock = 0.0;
        let count = if self.width >= 1.0 && self.height >= 1.0 {
            self.settings.star_count
        } else {
            0
        };
        let layout = self.settings.layout;
        let (w, h) = (self.width, self.height);

        let mut stars = Vec::with_capacity(count);
        for i in 0..count {
            let (home_x, home_y) = match layout {
                Layout::Uniform => (
                    self.rng.gen_range(0.0..w),
                    self.rng.gen_range(0.0..h),
                ),
                Layout::Clustered => {
                    let c = i % 4;
                    let cx = w * (0.25 + 0.5 * (c % 2) as f32);
                    let cy = h * (0.25 + 0.5 * (c / 2) as f32);
                    let spread = w.min(h) * 0.18;
                    let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                    let r = self.rng.gen_range(0.0..spread.max(1.0));
                    (
                        (cx + r * angle.cos()).clamp(0.0, w - 1.0),
                        (cy + r * angle.sin()).clamp(0.0, h - 1.0),
                    )
                }
                Layout::Ring => {
                    let angle = i as f32 / count.max(1) as f32 * std::f32::consts::TAU
                        + self.rng.gen_range(-0.08..0.08);
                    let ring = w.min(h) * self.rng.gen_range(0.30..0.42);
                    (
                        (w / 2.0 + ring * angle.cos()).clamp(0.0, w - 1.0),
                        (h / 2.0 + ring * angle.sin()).clamp(0.0, h - 1.0),
                    )
                }
            };

            stars.push(Star {
                index: i,
                x: home_x,
                y: home_y,
                home_x,
                home_y,
                radius: self.rng.gen_range(0.5..2.0),
                opacity: self.rng.gen_range(MIN_OPACITY..0.7),
                drift: self.rng.gen_range(0.01..0.03),
                vx: 0.0,
                vy: 0.0,
                hue: self.rng.gen_range(crate::color::BASE_HUE..crate::color::BASE_HUE + 60.0),
                pulse_phase: self.rng.gen_range(0.0..std::f32::consts::TAU),
                near_cursor: false,
            });
        }
        self.stars = stars;
    }

    /// Resize the field; any dimension change discards and rebuilds the
    /// whole star set (no interpolation between layouts).
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        let (w, h) = (new_width as f32, new_height as f32);
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scatter();
        }
    }

    /// Pointer moved: last-write-wins coordinate, idle state reset
    pub fn pointer_moved(&mut self, x: f32, y: f32, now_ms: u64) {
        self.pointer.x = x;
        self.pointer.y = y;
        self.pointer.present = true;
        self.pointer.last_move_ms = now_ms;
        self.pointer.power = 1.0;
    }

    /// Pointer pressed: starts the repulsion pulse. A new press simply
    /// restarts the window.
    pub fn pointer_pressed(&mut self, x: f32, y: f32, now_ms: u64) {
        self.pointer.x = x;
        self.pointer.y = y;
        self.pointer.present = true;
        self.pointer.press_until_ms = now_ms + self.settings.press_pulse_ms;
        self.pointer.last_move_ms = now_ms;
        self.pointer.power = 1.0;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advance the field by one frame.
    pub fn advance(&mut self, now_ms: u64) {
        if self.paused {
            return;
        }
        self.clock += SIM_TICK;

        // Dwell ramps power from 1 to the cap over power_ramp_ms once the
        // pointer has been idle past the threshold. Reset to 1 happens only
        // in the movement/press handlers.
        if self.pointer.present {
            let idle = now_ms.saturating_sub(self.pointer.last_move_ms);
            if idle > self.settings.idle_threshold_ms {
                let frac = (idle - self.settings.idle_threshold_ms) as f32
                    / self.settings.power_ramp_ms.max(1) as f32;
                self.pointer.power =
                    (1.0 + frac * (self.settings.power_cap - 1.0)).min(self.settings.power_cap);
            }
        }

        let pressing = self.pointer.is_pressing(now_ms);
        let power = self.pointer.power;
        let orbit_radius = self.settings.effective_orbit_radius(power);
        let repulse_radius = self.settings.repulse_radius;
        let min_orbit = self.settings.min_orbit_radius;
        let damping = self.settings.damping;
        let (px, py, present) = (self.pointer.x, self.pointer.y, self.pointer.present);
        let clock = self.clock;

        for star in &mut self.stars {
            let (dx, dy, dist) = if present {
                let dx = px - star.x;
                let dy = py - star.y;
                (dx, dy, (dx * dx + dy * dy).sqrt())
            } else {
                (0.0, 0.0, f32::INFINITY)
            };

            // Click repulsion: impulse into velocity, not position
            if pressing && dist < repulse_radius {
                let angle = dy.atan2(dx);
                let force = (repulse_radius - dist) / 15.0;
                star.vx -= angle.cos() * force * 1.5;
                star.vy -= angle.sin() * force * 1.5;
            }

            // Integrate and damp, unconditionally, so impulses decay
            star.x += star.vx;
            star.y += star.vy;
            star.vx *= damping;
            star.vy *= damping;

            if !pressing && dist < orbit_radius && dist > ORBIT_DEAD_ZONE {
                // Spiral orbit: the target circles the pointer at a radius
                // shrunk by power, with a phase fanned out per star index.
                let angle = dy.atan2(dx);
                let spiral = clock * 0.5 + star.index as f32 * 0.1;
                let orbit_angle = angle + spiral.sin() * 0.3;

                let target_radius = (dist * 0.7 / power).max(min_orbit);
                let target_x = px - orbit_angle.cos() * target_radius;
                let target_y = py - orbit_angle.sin() * target_radius;

                let pull = star.drift * 2.5 * power;
                star.x += (target_x - star.x) * pull;
                star.y += (target_y - star.y) * pull;
                star.opacity = (star.opacity + 0.03).min(1.0);
            } else {
                star.x += (star.home_x - star.x) * star.drift;
                star.y += (star.home_y - star.y) * star.drift;
                star.opacity = (star.opacity - 0.01).max(MIN_OPACITY);
            }

            star.near_cursor = dist < orbit_radius && dist > ORBIT_DEAD_ZONE;
        }
    }

    /// Connection pairs among near-cursor stars: each eligible pair appears
    /// exactly once, lower index first, with its mutual distance.
    pub fn connections(&self) -> Vec<(usize, usize, f32)> {
        let radius = self.settings.connection_radius;
        let mut pairs = Vec::new();
        for (i, a) in self.stars.iter().enumerate() {
            if !a.near_cursor {
                continue;
            }
            for b in &self.stars[i + 1..] {
                if !b.near_cursor {
                    continue;
                }
                let dx = b.x - a.x;
                let dy = b.y - a.y;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < radius {
                    pairs.push((a.index, b.index, dist));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_field(width: usize, height: usize) -> StarField {
        StarField::new(width, height, FieldSettings::default())
    }

    #[test]
    fn test_scatter_respects_count_and_bounds() {
        let field = test_field(320, 192);
        assert_eq!(field.stars().len(), 200);
        for star in field.stars() {
            assert!(star.home_x >= 0.0 && star.home_x < 320.0);
            assert!(star.home_y >= 0.0 && star.home_y < 192.0);
            assert!(star.radius >= 0.5 && star.radius <= 2.0);
            assert!(star.drift >= 0.01 && star.drift <= 0.03);
            assert!(star.hue >= 200.0 && star.hue <= 260.0);
        }
    }

    #[test]
    fn test_degenerate_field_is_empty() {
        let field = test_field(0, 0);
        assert!(field.stars().is_empty());
    }

    #[test]
    fn test_resize_rebuilds_within_new_bounds() {
        let mut field = test_field(320, 192);
        field.resize(80, 40);
        assert_eq!(field.stars().len(), 200);
        for star in field.stars() {
            assert!(star.home_x >= 0.0 && star.home_x < 80.0);
            assert!(star.home_y >= 0.0 && star.home_y < 40.0);
        }
    }

    #[test]
    fn test_resize_to_same_size_keeps_stars() {
        let mut field = test_field(320, 192);
        let first_home = (field.stars()[0].home_x, field.stars()[0].home_y);
        field.resize(320, 192);
        assert_eq!(
            (field.stars()[0].home_x, field.stars()[0].home_y),
            first_home
        );
    }

    #[test]
    fn test_layouts_stay_in_bounds() {
        for layout in [Layout::Clustered, Layout::Ring] {
            let mut settings = FieldSettings::default();
            settings.layout = layout;
            let field = StarField::new(160, 96, settings);
            assert_eq!(field.stars().len(), 200);
            for star in field.stars() {
                assert!(star.home_x >= 0.0 && star.home_x < 160.0);
                assert!(star.home_y >= 0.0 && star.home_y < 96.0);
            }
        }
    }

    #[test]
    fn test_opacity_stays_in_range() {
        let mut field = test_field(320, 192);
        field.pointer_moved(160.0, 96.0, 0);
        for frame in 0..300 {
            field.advance(frame * 16);
        }
        // Pull the pointer away and let everything decay
        field.pointer_moved(5000.0, 5000.0, 5000);
        for frame in 0..300 {
            field.advance(5000 + frame * 16);
        }
        for star in field.stars() {
            assert!(star.opacity >= MIN_OPACITY && star.opacity <= 1.0);
        }
    }

    #[test]
    fn test_damping_shrinks_velocity_each_frame() {
        let mut field = test_field(320, 192);
        field.stars[0].vx = 5.0;
        field.stars[0].vy = -3.0;
        let mut speed = (5.0f32 * 5.0 + 3.0 * 3.0).sqrt();
        for frame in 1..10 {
            field.advance(frame * 16);
            let s = &field.stars[0];
            let next = (s.vx * s.vx + s.vy * s.vy).sqrt();
            assert!(next < speed, "speed must strictly decrease");
            speed = next;
        }
    }

    #[test]
    fn test_power_ramps_to_cap_and_holds() {
        let mut field = test_field(320, 192);
        field.pointer_moved(160.0, 96.0, 0);

        // Halfway up the ramp: 1000ms idle = 500ms past threshold
        field.advance(1000);
        assert!((field.pointer.power - 3.0).abs() < 0.1);

        // Past threshold + ramp: pinned at the cap
        field.advance(1600);
        assert_eq!(field.pointer.power, 5.0);
        field.advance(60_000);
        assert_eq!(field.pointer.power, 5.0);

        // Any movement resets to 1
        field.pointer_moved(161.0, 96.0, 60_016);
        assert_eq!(field.pointer.power, 1.0);
    }

    #[test]
    fn test_press_pulse_expires_on_its_own() {
        let mut field = test_field(320, 192);
        field.pointer_pressed(160.0, 96.0, 1000);
        assert!(field.pointer.is_pressing(1001));
        assert!(field.pointer.is_pressing(1299));
        assert!(!field.pointer.is_pressing(1300));

        // A new press restarts the window
        field.pointer_pressed(160.0, 96.0, 1200);
        assert!(field.pointer.is_pressing(1400));
        assert!(!field.pointer.is_pressing(1500));
    }

    #[test]
    fn test_press_repels_within_radius_same_frame() {
        let mut field = test_field(320, 192);
        field.pointer_pressed(100.0, 100.0, 0);
        // Star 50 dots to the right of the pointer; away is +x
        field.stars[0].x = 150.0;
        field.stars[0].y = 100.0;
        field.stars[0].vx = 0.0;
        field.stars[0].vy = 0.0;
        field.advance(0);
        assert!(field.stars[0].vx > 0.0, "impulse must point away");
        assert!(field.stars[0].vy.abs() < 1e-3);
    }

    #[test]
    fn test_dead_zone_falls_through_to_relaxation() {
        let mut field = test_field(320, 192);
        field.pointer_moved(100.0, 100.0, 0);
        // 5 dots from the pointer, well inside the dead zone
        field.stars[0].x = 105.0;
        field.stars[0].y = 100.0;
        field.stars[0].home_x = 300.0;
        field.stars[0].home_y = 180.0;
        field.stars[0].opacity = 0.9;
        field.advance(16);
        let s = &field.stars[0];
        assert!(!s.near_cursor);
        assert!(s.opacity < 0.9, "relaxation decays opacity");
        assert!(s.x > 105.0 && s.y > 100.0, "star drifts toward home");
    }

    #[test]
    fn test_orbit_brightens_star() {
        let mut field = test_field(320, 192);
        field.pointer_moved(160.0, 96.0, 0);
        field.stars[0].x = 220.0;
        field.stars[0].y = 96.0;
        field.stars[0].opacity = 0.5;
        field.advance(16);
        let s = &field.stars[0];
        assert!(s.near_cursor);
        assert!(s.opacity > 0.5);
    }

    #[test]
    fn test_connections_unique_lower_index_first() {
        let mut field = test_field(320, 192);
        field.stars.truncate(3);
        for (i, star) in field.stars.iter_mut().enumerate() {
            star.near_cursor = true;
            star.x = 100.0 + i as f32 * 40.0;
            star.y = 100.0;
        }
        // Star 2 pushed out of connection range of star 0 only
        field.stars[2].x = 100.0 + 40.0 + 140.0;

        let pairs = field.connections();
        assert_eq!(pairs.len(), 2);
        for &(a, b, dist) in &pairs {
            assert!(a < b, "lower index is always the from endpoint");
            assert!(dist < field.settings.connection_radius);
        }
        assert!(pairs.iter().any(|&(a, b, _)| (a, b) == (0, 1)));
        assert!(pairs.iter().any(|&(a, b, _)| (a, b) == (1, 2)));
    }

    #[test]
    fn test_connections_skip_far_and_resting_stars() {
        let mut field = test_field(320, 192);
        field.stars.truncate(2);
        field.stars[0].x = 100.0;
        field.stars[0].y = 100.0;
        field.stars[0].near_cursor = true;
        field.stars[1].x = 110.0;
        field.stars[1].y = 100.0;
        field.stars[1].near_cursor = false;
        assert!(field.connections().is_empty());
    }

    #[test]
    fn test_absent_pointer_means_pure_relaxation() {
        let mut field = test_field(320, 192);
        for frame in 0..200 {
            field.advance(frame * 16);
        }
        for star in field.stars() {
            assert!(!star.near_cursor);
            assert!((star.x - star.home_x).abs() < 1.0);
            assert!((star.y - star.home_y).abs() < 1.0);
        }
    }

    #[test]
    fn test_pause_freezes_the_field() {
        let mut field = test_field(320, 192);
        field.pointer_moved(160.0, 96.0, 0);
        field.toggle_pause();
        let before: Vec<(f32, f32)> = field.stars().iter().map(|s| (s.x, s.y)).collect();
        field.advance(16);
        let after: Vec<(f32, f32)> = field.stars().iter().map(|s| (s.x, s.y)).collect();
        assert_eq!(before, after);
    }
}
