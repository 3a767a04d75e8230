use crate::app::{App, Focus};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub const SIDEBAR_WIDTH: u16 = 22;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 13;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        (frame_area.width.saturating_sub(2), frame_area.height.saturating_sub(2))
    } else {
        let canvas_width = frame_area.width.saturating_sub(SIDEBAR_WIDTH + 2);
        let canvas_height = frame_area.height.saturating_sub(2);
        (canvas_width, canvas_height)
    }
}

/// Visible lines inside the controls box for a given terminal height
pub fn get_controls_visible_lines(term_height: u16) -> u16 {
    // Status box + params box above it, minus its own borders
    term_height.saturating_sub(6 + 11 + 2)
}

/// Terminal cell of the canvas interior's top-left corner, for mapping
/// mouse coordinates into the field.
pub fn canvas_origin(fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        (1, 1)
    } else {
        (SIDEBAR_WIDTH + 1, 1)
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),  // Status
            Constraint::Length(11), // Parameters
            Constraint::Min(10),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Star Field ");

    // Power bar: how far the pointer has dwelt toward the cap
    let power = app.field.pointer.power.max(1.0);
    let cap = app.field.settings.power_cap.max(1.0);
    let frac = if cap > 1.0 {
        ((power - 1.0) / (cap - 1.0)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let bar_width = (area.width.saturating_sub(4)) as usize;
    let filled = (frac * bar_width as f32) as usize;
    let empty = bar_width.saturating_sub(filled);

    let status_text = if app.field.paused { "PAUSED" } else { "RUNNING" };
    let status_color = if app.field.paused {
        HIGHLIGHT_COLOR
    } else {
        BORDER_COLOR
    };

    let mut content = vec![
        Line::from(Span::styled(
            format!("{} stars", app.field.stars().len()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(Color::Magenta)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
    ];

    if let Some(msg) = &app.status_message {
        content.push(Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    }

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let settings = &app.field.settings;

    let content = vec![
        make_line(
            "Links",
            on_off(settings.show_connections),
            app.focus == Focus::Connections,
        ),
        make_line(
            "Damping",
            format!("{:.2}", settings.damping),
            app.focus == Focus::Damping,
        ),
        make_line("Glow", on_off(settings.show_glow), app.focus == Focus::Glow),
        make_line(
            "Layout",
            settings.layout.name().to_string(),
            app.focus == Focus::Layout,
        ),
        make_line(
            "Orbit max",
            format!("{:.0}", settings.max_orbit_radius),
            app.focus == Focus::MaxOrbit,
        ),
        make_line(
            "Orbit min",
            format!("{:.0}", settings.min_orbit_radius),
            app.focus == Focus::MinOrbit,
        ),
        make_line(
            "Power cap",
            format!("{:.1}", settings.power_cap),
            app.focus == Focus::PowerCap,
        ),
        make_line(
            "Scheme",
            app.color_scheme.name().to_string(),
            app.focus == Focus::Scheme,
        ),
        make_line(
            "Stars",
            format!("{}", settings.star_count),
            app.focus == Focus::Stars,
        ),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2); // minus borders
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0 // No scrolling needed
    } else if focus_line >= visible_height {
        // Scroll to show focused line at bottom of visible area
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0 // Focus is within first visible lines
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Move", "attract stars".to_string()),
        make_control("Click", "burst".to_string()),
        make_control("Space", "pause/resume".to_string()),
        make_control("H/?", "help".to_string()),
        make_control("R", "re-scatter".to_string()),
        make_control("1-3", "layouts".to_string()),
        make_control("C", "color scheme".to_string()),
        make_control("L", "toggle links".to_string()),
        make_control("G", "toggle glow".to_string()),
        make_control("S", "save PNG".to_string()),
        make_control("V", "fullscreen".to_string()),
        make_control("Tab", "edit params".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let block = styled_block(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = braille::render_field(&app.field, inner.width, inner.height, app.color_scheme);

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let mut style = Style::default().fg(cell.fg);
            if let Some(bg) = cell.bg {
                style = style.bg(bg);
            }
            let span = Span::styled(cell.char.to_string(), style);
            let paragraph = Paragraph::new(Line::from(span));
            frame.render_widget(paragraph, cell_rect);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(32);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("INTERACTIVE STAR FIELD", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Stars drift around fixed home positions. Move the mouse over the canvas and nearby stars swing into orbit around the pointer; click to blast them outward."),
        Line::from(""),
        Line::from(Span::styled("MAGNETIC POWER:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Hold the pointer still and its pull ramps up, widening the capture radius, tightening orbits and brightening the glow. Move again to reset."),
        Line::from(""),
        Line::from(Span::styled("CONNECTIONS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Stars orbiting the pointer link up with lines when they pass close to each other. Toggle with L."),
        Line::from(""),
        Line::from(Span::styled("LAYOUTS (1-3):", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("1=Uniform, 2=Clustered, 3=Ring. Changing layout re-scatters the field."),
        Line::from(""),
        Line::from(Span::styled("C - Color Scheme", Style::default().fg(TEXT_COLOR))),
        Line::from("Nebula (violet-blue), Ember, Aurora, Mono"),
        Line::from(""),
        Line::from(Span::styled("S - Snapshot", Style::default().fg(TEXT_COLOR))),
        Line::from("Saves the current frame as a PNG in the working directory."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, R=Re-scatter, V=Fullscreen, Tab/Arrows=Adjust, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
