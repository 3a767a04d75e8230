use serde::{Deserialize, Serialize};

/// Layout used for star home positions when the field is (re)scattered
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Layout {
    /// Homes uniformly random across the field (classic star field)
    #[default]
    Uniform,
    /// Homes grouped into a few loose clusters
    Clustered,
    /// Homes on a jittered ring around the field center
    Ring,
}

impl Layout {
    pub fn name(&self) -> &str {
        match self {
            Layout::Uniform => "Uniform",
            Layout::Clustered => "Clustered",
            Layout::Ring => "Ring",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Layout::Uniform => Layout::Clustered,
            Layout::Clustered => Layout::Ring,
            Layout::Ring => Layout::Uniform,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Layout::Uniform => Layout::Ring,
            Layout::Clustered => Layout::Uniform,
            Layout::Ring => Layout::Clustered,
        }
    }
}

/// All field settings consolidated into one struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSettings {
    // === Population ===
    /// Number of stars per field instance (10-2000).
    /// Takes effect on the next scatter; the live set is fixed-size.
    pub star_count: usize,
    /// Home position layout
    pub layout: Layout,

    // === Pointer dynamics ===
    /// Base orbit capture radius in dots (20-600)
    pub max_orbit_radius: f32,
    /// Floor for the per-star orbit target radius in dots (5-200)
    pub min_orbit_radius: f32,
    /// Velocity retained per frame after a click impulse (0.80-0.99)
    pub damping: f32,
    /// Upper bound for magnetic power (1.0-10.0)
    pub power_cap: f32,
    /// How long a click keeps repelling, in ms (100-1000)
    pub press_pulse_ms: u64,
    /// Pointer idle time before power starts ramping, in ms (100-2000)
    pub idle_threshold_ms: u64,
    /// Time past the idle threshold for power to reach the cap (250-5000)
    pub power_ramp_ms: u64,
    /// Radius of the click repulsion burst in dots (50-400)
    pub repulse_radius: f32,

    // === Visual ===
    /// Max distance between two near-cursor stars to link them (20-300)
    pub connection_radius: f32,
    /// Draw connection lines between near-cursor stars
    pub show_connections: bool,
    /// Tint the background around the pointer
    pub show_glow: bool,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            star_count: 200,
            layout: Layout::default(),

            max_orbit_radius: 250.0,
            min_orbit_radius: 50.0,
            damping: 0.92,
            power_cap: 5.0,
            press_pulse_ms: 300,
            idle_threshold_ms: 500,
            power_ramp_ms: 1000,
            repulse_radius: 200.0,

            connection_radius: 150.0,
            show_connections: true,
            show_glow: true,
        }
    }
}

impl FieldSettings {
    /// Adjust star count within bounds
    pub fn adjust_star_count(&mut self, delta: i32) {
        self.star_count = (self.star_count as i32 + delta).clamp(10, 2000) as usize;
    }

    /// Adjust base orbit capture radius within bounds
    pub fn adjust_max_orbit_radius(&mut self, delta: f32) {
        self.max_orbit_radius = (self.max_orbit_radius + delta).clamp(20.0, 600.0);
    }

    /// Adjust orbit target radius floor within bounds
    pub fn adjust_min_orbit_radius(&mut self, delta: f32) {
        self.min_orbit_radius = (self.min_orbit_radius + delta).clamp(5.0, 200.0);
    }

    /// Adjust velocity damping within bounds
    pub fn adjust_damping(&mut self, delta: f32) {
        self.damping = (self.damping + delta).clamp(0.80, 0.99);
    }

    /// Adjust magnetic power cap within bounds
    pub fn adjust_power_cap(&mut self, delta: f32) {
        self.power_cap = (self.power_cap + delta).clamp(1.0, 10.0);
    }

    /// Adjust click repulsion radius within bounds
    pub fn adjust_repulse_radius(&mut self, delta: f32) {
        self.repulse_radius = (self.repulse_radius + delta).clamp(50.0, 400.0);
    }

    /// Adjust connection radius within bounds
    pub fn adjust_connection_radius(&mut self, delta: f32) {
        self.connection_radius = (self.connection_radius + delta).clamp(20.0, 300.0);
    }

    /// Toggle connection lines
    pub fn toggle_connections(&mut self) {
        self.show_connections = !self.show_connections;
    }

    /// Toggle pointer glow
    pub fn toggle_glow(&mut self) {
        self.show_glow = !self.show_glow;
    }

    /// Orbit capture radius grown by the current magnetic power
    pub fn effective_orbit_radius(&self, power: f32) -> f32 {
        self.max_orbit_radius * (1.0 + power * 0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_clamps_at_bounds() {
        let mut settings = FieldSettings::default();

        settings.adjust_star_count(100_000);
        assert_eq!(settings.star_count, 2000);
        settings.adjust_star_count(-100_000);
        assert_eq!(settings.star_count, 10);

        settings.adjust_damping(1.0);
        assert_eq!(settings.damping, 0.99);
        settings.adjust_damping(-1.0);
        assert_eq!(settings.damping, 0.80);

        settings.adjust_power_cap(100.0);
        assert_eq!(settings.power_cap, 10.0);
        settings.adjust_power_cap(-100.0);
        assert_eq!(settings.power_cap, 1.0);
    }

    #[test]
    fn test_effective_orbit_radius_grows_with_power() {
        let settings = FieldSettings::default();
        let rest = settings.effective_orbit_radius(1.0);
        let charged = settings.effective_orbit_radius(5.0);
        assert!(charged > rest);
        assert_eq!(rest, 250.0 * 1.3);
        assert_eq!(charged, 250.0 * 2.5);
    }

    #[test]
    fn test_layout_cycle_round_trips() {
        let start = Layout::Uniform;
        assert_eq!(start.next().next().next(), start);
        assert_eq!(start.prev().prev().prev(), start);
        assert_eq!(start.next().prev(), start);
    }
}
