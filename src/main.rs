mod app;
mod braille;
mod color;
mod config;
mod export;
mod presets;
mod settings;
mod simulation;
mod ui;

use app::{App, Focus};
use clap::Parser;
use color::ColorScheme;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use presets::PresetManager;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::{FieldSettings, Layout};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "starfield")]
#[command(about = "Interactive star field simulation in the terminal")]
struct Args {
    /// Number of stars (10-2000)
    #[arg(short = 'n', long)]
    stars: Option<usize>,

    /// Base orbit capture radius in dots (20-600)
    #[arg(long = "max-orbit")]
    max_orbit: Option<f32>,

    /// Minimum orbit target radius in dots (5-200)
    #[arg(long = "min-orbit")]
    min_orbit: Option<f32>,

    /// Velocity damping per frame after a click burst (0.80-0.99)
    #[arg(long)]
    damping: Option<f32>,

    /// Magnetic power cap for a dwelling pointer (1.0-10.0)
    #[arg(long = "power-cap")]
    power_cap: Option<f32>,

    /// Color scheme (nebula, ember, aurora, mono)
    #[arg(short = 'c', long)]
    scheme: Option<String>,

    /// Home position layout (uniform, clustered, ring)
    #[arg(short = 'l', long)]
    layout: Option<String>,

    /// Start from a named preset (built-in or saved)
    #[arg(short = 'p', long)]
    preset: Option<String>,

    /// Load settings from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable connection lines between orbiting stars
    #[arg(long = "no-connections", default_value = "false")]
    no_connections: bool,

    /// Disable the pointer glow
    #[arg(long = "no-glow", default_value = "false")]
    no_glow: bool,

    /// Pixels per braille dot in PNG snapshots (1-16)
    #[arg(long = "snapshot-scale", default_value = "4")]
    snapshot_scale: u32,
}

fn parse_scheme(s: &str) -> ColorScheme {
    match s.to_lowercase().as_str() {
        "ember" | "fire" => ColorScheme::Ember,
        "aurora" | "green" => ColorScheme::Aurora,
        "mono" | "gray" | "grey" => ColorScheme::Mono,
        _ => ColorScheme::Nebula,
    }
}

fn parse_layout(s: &str) -> Layout {
    match s.to_lowercase().as_str() {
        "clustered" | "clusters" => Layout::Clustered,
        "ring" | "circle" => Layout::Ring,
        _ => Layout::Uniform,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scheme_aliases() {
        assert_eq!(parse_scheme("Ember"), ColorScheme::Ember);
        assert_eq!(parse_scheme("grey"), ColorScheme::Mono);
        assert_eq!(parse_scheme("anything-else"), ColorScheme::Nebula);
    }

    #[test]
    fn test_parse_layout_aliases() {
        assert_eq!(parse_layout("RING"), Layout::Ring);
        assert_eq!(parse_layout("clusters"), Layout::Clustered);
        assert_eq!(parse_layout("default"), Layout::Uniform);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Settings precedence: defaults < config file < preset < explicit flags
    let mut settings = FieldSettings::default();
    let mut color_scheme = ColorScheme::default();
    let mut snapshot_scale = args.snapshot_scale.clamp(1, 16);

    if let Some(path) = &args.config {
        let cfg = AppConfig::load_from_file(path)?;
        settings = cfg.settings;
        color_scheme = cfg.color_scheme;
        snapshot_scale = cfg.snapshot_scale.clamp(1, 16);
    }

    if let Some(name) = &args.preset {
        let manager = PresetManager::new();
        let preset = manager
            .find(name)
            .ok_or_else(|| format!("Unknown preset '{}'. Available: {}", name, manager.preset_names().join(", ")))?;
        settings = preset.settings.clone();
        color_scheme = preset.color_scheme;
    }

    if let Some(n) = args.stars {
        settings.star_count = n.clamp(10, 2000);
    }
    if let Some(r) = args.max_orbit {
        settings.max_orbit_radius = r.clamp(20.0, 600.0);
    }
    if let Some(r) = args.min_orbit {
        settings.min_orbit_radius = r.clamp(5.0, 200.0);
    }
    if let Some(d) = args.damping {
        settings.damping = d.clamp(0.80, 0.99);
    }
    if let Some(p) = args.power_cap {
        settings.power_cap = p.clamp(1.0, 10.0);
    }
    if let Some(s) = &args.scheme {
        color_scheme = parse_scheme(s);
    }
    if let Some(l) = &args.layout {
        settings.layout = parse_layout(l);
    }
    if args.no_connections {
        settings.show_connections = false;
    }
    if args.no_glow {
        settings.show_glow = false;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let frame_rect = ratatui::layout::Rect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, false);
    let mut app = App::new(canvas_width, canvas_height, settings, color_scheme, snapshot_scale);

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Drain events until the frame deadline so a mouse-move storm can't
        // starve the animation; each event lands before the next tick.
        let deadline = Instant::now() + FRAME_DURATION;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.scatter(),
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            let size = terminal.size()?;
                            let rect = ratatui::layout::Rect {
                                x: 0,
                                y: 0,
                                width: size.width,
                                height: size.height,
                            };
                            let (w, h) = ui::get_canvas_size(rect, app.fullscreen_mode);
                            app.resize(w, h);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }
                        KeyCode::Char('1') => app.set_layout(Layout::Uniform),
                        KeyCode::Char('2') => app.set_layout(Layout::Clustered),
                        KeyCode::Char('3') => app.set_layout(Layout::Ring),
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            app.cycle_color_scheme();
                            app.focus = Focus::Scheme;
                        }
                        KeyCode::Char('l') | KeyCode::Char('L') => {
                            app.toggle_connections();
                            app.focus = Focus::Connections;
                        }
                        KeyCode::Char('g') | KeyCode::Char('G') => {
                            app.toggle_glow();
                            app.focus = Focus::Glow;
                        }
                        KeyCode::Char('s') | KeyCode::Char('S') => app.take_snapshot(),

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up();
                                } else {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down();
                                } else {
                                    let term_size = terminal.size().unwrap_or_default();
                                    let visible = ui::get_controls_visible_lines(term_size.height);
                                    app.scroll_controls_down(
                                        ui::CONTROLS_CONTENT_LINES.saturating_sub(visible),
                                    );
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    let (ox, oy) = ui::canvas_origin(app.fullscreen_mode);
                    if mouse.column < ox || mouse.row < oy {
                        continue;
                    }
                    // Center of the hovered cell in braille-dot coordinates
                    let dot_x = ((mouse.column - ox) as f32) * 2.0 + 1.0;
                    let dot_y = ((mouse.row - oy) as f32) * 4.0 + 2.0;
                    match mouse.kind {
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            app.pointer_moved(dot_x, dot_y);
                        }
                        MouseEventKind::Down(MouseButton::Left) => {
                            app.pointer_pressed(dot_x, dot_y);
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    let (canvas_width, canvas_height) = ui::get_canvas_size(
                        ratatui::layout::Rect {
                            x: 0,
                            y: 0,
                            width,
                            height,
                        },
                        app.fullscreen_mode,
                    );
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }

        // Advance the field one frame
        app.tick();
    }
}
