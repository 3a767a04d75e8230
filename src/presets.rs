use crate::color::ColorScheme;
use crate::settings::{FieldSettings, Layout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named preset containing field settings and a color scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: FieldSettings,
    pub color_scheme: ColorScheme,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: FieldSettings,
        color_scheme: ColorScheme,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
            color_scheme,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let mut manager = Self {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();
        manager.load_user_presets();
        manager
    }

    /// Load the built-in presets
    fn load_builtin_presets(&mut self) {
        self.builtin = vec![
            Preset::new(
                "Classic",
                "Default star field with orbit, burst and connections",
                FieldSettings::default(),
                ColorScheme::Nebula,
            ),
            Preset::new(
                "Calm",
                "Sparse, slow field with a weak pointer pull",
                FieldSettings {
                    star_count: 120,
                    power_cap: 2.0,
                    damping: 0.95,
                    show_connections: false,
                    ..Default::default()
                },
                ColorScheme::Nebula,
            ),
            Preset::new(
                "Magnetic Storm",
                "Fast power ramp, wide bursts, dense swarm",
                FieldSettings {
                    star_count: 400,
                    power_cap: 8.0,
                    power_ramp_ms: 500,
                    repulse_radius: 300.0,
                    ..Default::default()
                },
                ColorScheme::Ember,
            ),
            Preset::new(
                "Constellation",
                "Few bright stars with long connection lines",
                FieldSettings {
                    star_count: 80,
                    connection_radius: 250.0,
                    min_orbit_radius: 30.0,
                    ..Default::default()
                },
                ColorScheme::Nebula,
            ),
            Preset::new(
                "Swarm",
                "Many stars on a tight orbit leash",
                FieldSettings {
                    star_count: 600,
                    max_orbit_radius: 150.0,
                    min_orbit_radius: 20.0,
                    show_glow: false,
                    ..Default::default()
                },
                ColorScheme::Aurora,
            ),
            Preset::new(
                "Fireflies",
                "Drifting ring of dim stars, no lines or glow",
                FieldSettings {
                    star_count: 150,
                    layout: Layout::Ring,
                    show_connections: false,
                    show_glow: false,
                    ..Default::default()
                },
                ColorScheme::Aurora,
            ),
        ];
    }

    /// Get the presets directory path
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("starfield").join("presets"))
    }

    /// Load user presets from disk
    fn load_user_presets(&mut self) {
        if let Some(dir) = Self::presets_dir() {
            if dir.exists() {
                if let Ok(entries) = fs::read_dir(&dir) {
                    for entry in entries.flatten() {
                        if entry.path().extension().is_some_and(|e| e == "json") {
                            if let Ok(content) = fs::read_to_string(entry.path()) {
                                if let Ok(preset) = serde_json::from_str::<Preset>(&content) {
                                    self.user.push(preset);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Save a preset to disk
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create presets directory: {}", e))?;

        let path = dir.join(format!("{}.json", sanitize(&preset.name)));

        let json = serde_json::to_string_pretty(&preset)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;

        fs::write(&path, json).map_err(|e| format!("Failed to write preset file: {}", e))?;

        if !self.user.iter().any(|p| p.name == preset.name) {
            self.user.push(preset);
        }

        Ok(())
    }

    /// Delete a user preset
    pub fn delete_preset(&mut self, name: &str) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;

        if let Some(pos) = self.user.iter().position(|p| p.name == name) {
            self.user.remove(pos);
        }

        let path = dir.join(format!("{}.json", sanitize(name)));
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to delete preset file: {}", e))?;
        }

        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Get preset names for display
    pub fn preset_names(&self) -> Vec<&str> {
        self.all_presets().map(|p| p.name.as_str()).collect()
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_exist_and_resolve() {
        let mut manager = PresetManager {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();

        assert!(!manager.builtin.is_empty());
        assert!(manager.find("classic").is_some());
        assert!(manager.find("Magnetic Storm").is_some());
        assert!(manager.find("no-such-preset").is_none());
    }

    #[test]
    fn test_builtin_settings_within_adjuster_bounds() {
        let mut manager = PresetManager {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();

        for preset in &manager.builtin {
            let s = &preset.settings;
            assert!((10..=2000).contains(&s.star_count), "{}", preset.name);
            assert!(s.power_cap >= 1.0 && s.power_cap <= 10.0, "{}", preset.name);
            assert!(s.damping >= 0.80 && s.damping <= 0.99, "{}", preset.name);
        }
    }

    #[test]
    fn test_sanitize_filenames() {
        assert_eq!(sanitize("Magnetic Storm"), "Magnetic_Storm");
        assert_eq!(sanitize("a/b\\c"), "a_b_c");
        assert_eq!(sanitize("plain-name_1"), "plain-name_1");
    }

    #[test]
    fn test_preset_roundtrip() {
        let preset = Preset::new(
            "Test",
            "Round trip",
            FieldSettings {
                star_count: 42,
                ..Default::default()
            },
            ColorScheme::Aurora,
        );
        let json = serde_json::to_string(&preset).unwrap();
        let parsed: Preset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Test");
        assert_eq!(parsed.settings.star_count, 42);
        assert_eq!(parsed.color_scheme, ColorScheme::Aurora);
    }
}
