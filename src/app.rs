use crate::braille;
use crate::color::ColorScheme;
use crate::export;
use crate::presets::Preset;
use crate::settings::{FieldSettings, Layout};
use crate::simulation::StarField;
use std::time::Instant;

/// Focus state for parameter editing in the sidebar
/// Alphabetically ordered for consistent UI display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    // Alphabetical order
    Connections,
    Damping,
    Glow,
    Layout,
    MaxOrbit,
    MinOrbit,
    PowerCap,
    Scheme,
    Stars,
    // Controls box (not a param)
    Controls,
}

impl Focus {
    /// Tab cycles through parameters in alphabetical order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Connections,
            Focus::Connections => Focus::Damping,
            Focus::Damping => Focus::Glow,
            Focus::Glow => Focus::Layout,
            Focus::Layout => Focus::MaxOrbit,
            Focus::MaxOrbit => Focus::MinOrbit,
            Focus::MinOrbit => Focus::PowerCap,
            Focus::PowerCap => Focus::Scheme,
            Focus::Scheme => Focus::Stars,
            Focus::Stars => Focus::Connections, // Loop back
        }
    }

    /// Shift+Tab cycles through parameters in reverse alphabetical order
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None | Focus::Controls => Focus::Stars,
            Focus::Connections => Focus::Stars, // Loop back
            Focus::Damping => Focus::Connections,
            Focus::Glow => Focus::Damping,
            Focus::Layout => Focus::Glow,
            Focus::MaxOrbit => Focus::Layout,
            Focus::MinOrbit => Focus::MaxOrbit,
            Focus::PowerCap => Focus::MinOrbit,
            Focus::Scheme => Focus::PowerCap,
            Focus::Stars => Focus::Scheme,
        }
    }

    /// Get the line index in the parameters box for this focus (alphabetical order)
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Controls => 0,
            Focus::Connections => 0,
            Focus::Damping => 1,
            Focus::Glow => 2,
            Focus::Layout => 3,
            Focus::MaxOrbit => 4,
            Focus::MinOrbit => 5,
            Focus::PowerCap => 6,
            Focus::Scheme => 7,
            Focus::Stars => 8,
        }
    }

    /// Check if focus is on a parameter (not Controls or None)
    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None | Focus::Controls)
    }
}

/// Main application state
pub struct App {
    pub field: StarField,
    pub color_scheme: ColorScheme,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    pub controls_scroll: u16,
    pub snapshot_scale: u32,
    /// One-line notice shown in the sidebar (snapshot path, errors)
    pub status_message: Option<String>,
    started: Instant,
}

impl App {
    pub fn new(
        canvas_width: u16,
        canvas_height: u16,
        settings: FieldSettings,
        color_scheme: ColorScheme,
        snapshot_scale: u32,
    ) -> Self {
        let (field_width, field_height) = braille::calculate_field_size(canvas_width, canvas_height);
        Self {
            field: StarField::new(field_width, field_height, settings),
            color_scheme,
            focus: Focus::Controls,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            controls_scroll: 0,
            snapshot_scale,
            status_message: None,
            started: Instant::now(),
        }
    }

    /// Milliseconds since launch, the time base for every field event
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Advance the field one frame
    pub fn tick(&mut self) {
        let now = self.now_ms();
        self.field.advance(now);
    }

    /// Forward a pointer move in braille-dot coordinates
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let now = self.now_ms();
        self.field.pointer_moved(x, y, now);
    }

    /// Forward a pointer press (click burst) in braille-dot coordinates
    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        let now = self.now_ms();
        self.field.pointer_pressed(x, y, now);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Connections => self.toggle_connections(),
            Focus::Damping => self.field.settings.adjust_damping(0.01),
            Focus::Glow => self.toggle_glow(),
            Focus::Layout => {
                self.field.settings.layout = self.field.settings.layout.next();
                self.field.scatter();
            }
            Focus::MaxOrbit => self.field.settings.adjust_max_orbit_radius(10.0),
            Focus::MinOrbit => self.field.settings.adjust_min_orbit_radius(5.0),
            Focus::PowerCap => self.field.settings.adjust_power_cap(0.5),
            Focus::Scheme => self.cycle_color_scheme(),
            Focus::Stars => {
                self.field.settings.adjust_star_count(20);
                self.field.scatter();
            }
        }
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        match self.focus {
            Focus::None | Focus::Controls => {}
            Focus::Connections => self.toggle_connections(),
            Focus::Damping => self.field.settings.adjust_damping(-0.01),
            Focus::Glow => self.toggle_glow(),
            Focus::Layout => {
                self.field.settings.layout = self.field.settings.layout.prev();
                self.field.scatter();
            }
            Focus::MaxOrbit => self.field.settings.adjust_max_orbit_radius(-10.0),
            Focus::MinOrbit => self.field.settings.adjust_min_orbit_radius(-5.0),
            Focus::PowerCap => self.field.settings.adjust_power_cap(-0.5),
            Focus::Scheme => {
                self.color_scheme = self.color_scheme.prev();
            }
            Focus::Stars => {
                self.field.settings.adjust_star_count(-20);
                self.field.scatter();
            }
        }
    }

    /// Cycle to next focus
    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Navigate to previous parameter (Shift+Tab)
    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.field.toggle_pause();
    }

    /// Re-seed every star at a fresh home position
    pub fn scatter(&mut self) {
        self.field.scatter();
        self.status_message = None;
    }

    /// Set the home layout directly (1-3 keys) and re-seed
    pub fn set_layout(&mut self, layout: Layout) {
        self.field.settings.layout = layout;
        self.field.scatter();
    }

    /// Cycle color scheme
    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = self.color_scheme.next();
    }

    /// Toggle connection lines
    pub fn toggle_connections(&mut self) {
        self.field.settings.show_connections = !self.field.settings.show_connections;
    }

    /// Toggle the pointer glow
    pub fn toggle_glow(&mut self) {
        self.field.settings.show_glow = !self.field.settings.show_glow;
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help content up
    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    /// Scroll help content down
    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Scroll controls box up
    pub fn scroll_controls_up(&mut self) {
        self.controls_scroll = self.controls_scroll.saturating_sub(1);
    }

    /// Scroll controls box down
    pub fn scroll_controls_down(&mut self, max_scroll: u16) {
        self.controls_scroll = (self.controls_scroll + 1).min(max_scroll);
    }

    /// Resize the field to match a new canvas size
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let (field_width, field_height) = braille::calculate_field_size(canvas_width, canvas_height);
        self.field.resize(field_width, field_height);
    }

    /// Replace settings and scheme with a preset's, then re-seed
    pub fn apply_preset(&mut self, preset: &Preset) {
        self.field.settings = preset.settings.clone();
        self.color_scheme = preset.color_scheme;
        self.field.scatter();
        self.status_message = Some(format!("Preset: {}", preset.name));
    }

    /// Save a PNG of the current frame and note the result in the sidebar
    pub fn take_snapshot(&mut self) {
        match export::snapshot(&self.field, self.color_scheme, self.snapshot_scale) {
            Ok(path) => {
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                self.status_message = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycle_visits_all_params() {
        let mut focus = Focus::Connections;
        let mut seen = 1;
        loop {
            focus = focus.next();
            if focus == Focus::Connections {
                break;
            }
            seen += 1;
        }
        assert_eq!(seen, 9);
    }

    #[test]
    fn test_focus_prev_inverts_next() {
        let all = [
            Focus::Connections,
            Focus::Damping,
            Focus::Glow,
            Focus::Layout,
            Focus::MaxOrbit,
            Focus::MinOrbit,
            Focus::PowerCap,
            Focus::Scheme,
            Focus::Stars,
        ];
        for f in all {
            assert_eq!(f.next().prev(), f);
        }
    }

    #[test]
    fn test_adjust_star_count_rescatters() {
        let mut app = App::new(
            40,
            20,
            FieldSettings::default(),
            ColorScheme::Nebula,
            4,
        );
        app.focus = Focus::Stars;
        app.adjust_focused_up();
        assert_eq!(app.field.settings.star_count, 220);
        assert_eq!(app.field.stars().len(), 220);
    }

    #[test]
    fn test_apply_preset_swaps_settings_and_scheme() {
        let mut app = App::new(
            40,
            20,
            FieldSettings::default(),
            ColorScheme::Nebula,
            4,
        );
        let preset = Preset::new(
            "Test",
            "",
            FieldSettings {
                star_count: 60,
                ..Default::default()
            },
            ColorScheme::Ember,
        );
        app.apply_preset(&preset);
        assert_eq!(app.field.stars().len(), 60);
        assert_eq!(app.color_scheme, ColorScheme::Ember);
        assert!(app.status_message.is_some());
    }
}
