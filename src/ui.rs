use crate::app::{App, Focus};
use crate::color::{coefficient_color, kind_color};
use crate::picker;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 50;

/// Key and description of every line in the controls box
const CONTROLS: [(&str, &str); 14] = [
    ("Space", "pause/resume"),
    ("Enter", "randomize"),
    ("M", "reshuffle kinds"),
    ("R", "reset"),
    ("^S", "save matrix"),
    ("L/^L", "load matrix"),
    ("V", "trails"),
    ("F", "fullscreen"),
    ("Tab", "focus"),
    ("Arrows", "cursor/adjust"),
    ("+/-", "edit cell"),
    ("[/]", "time scale"),
    ("H", "help"),
    ("Q", "quit"),
];

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = CONTROLS.len() as u16;

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

    if app.file_picker.is_some() {
        render_file_picker(frame, area, app);
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

/// Lines of the controls box visible for a terminal of the given height
pub fn get_controls_visible_lines(term_height: u16, kinds: usize) -> u16 {
    let fixed = 6 + matrix_box_height(kinds) + 8;
    term_height.saturating_sub(fixed).saturating_sub(2)
}

fn matrix_box_height(kinds: usize) -> u16 {
    kinds as u16 + 3
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),                                            // Status
            Constraint::Length(matrix_box_height(app.simulation.model.kinds())), // Matrix
            Constraint::Length(8),                                            // Parameters
            Constraint::Min(4),                                               // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_matrix_box(frame, sections[1], app);
    render_params_box(frame, sections[2], app);
    render_controls_box(frame, sections[3], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Particle Life ");

    let (status_text, status_color) = if app.simulation.paused {
        ("PAUSED", HIGHLIGHT_COLOR)
    } else {
        ("RUNNING", BORDER_COLOR)
    };
    let trails = if app.show_trails { "trails on" } else { "trails off" };
    let message = app.status_message.as_deref().unwrap_or("");

    let content = vec![
        Line::from(Span::styled(
            format!("{:.0} fps  {} pts", app.fps, app.simulation.particles().len()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled(status_text, Style::default().fg(status_color)),
            Span::styled(format!("  {}", trails), Style::default().fg(DIM_TEXT_COLOR)),
        ]),
        Line::from(Span::styled(message.to_string(), Style::default().fg(DIM_TEXT_COLOR))),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_matrix_box(frame: &mut Frame, area: Rect, app: &App) {
    let model = &app.simulation.model;
    let (cursor_col, cursor_row) = app.matrix_cursor;
    let focused = app.focus == Focus::Matrix;

    let title = format!(" Matrix {:+.2} ", model.get(cursor_col, cursor_row));
    let block = if focused {
        styled_block(&title).border_style(Style::default().fg(HIGHLIGHT_COLOR))
    } else {
        styled_block(&title)
    };

    // Header row: the reacting kind of each column; row markers: the kind reacted to
    let mut header = vec![Span::raw("  ")];
    for kind in 0..model.kinds() {
        header.push(Span::styled("● ", Style::default().fg(kind_color(kind))));
    }
    let mut content = vec![Line::from(header)];

    for row in 0..model.kinds() {
        let mut spans = vec![Span::styled("● ", Style::default().fg(kind_color(row)))];
        for col in 0..model.kinds() {
            let mut style = Style::default().fg(coefficient_color(model.get(col, row)));
            if focused && (col, row) == (cursor_col, cursor_row) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled("■", style));
            spans.push(Span::raw(" "));
        }
        content.push(Line::from(spans));
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

    let settings = &app.simulation.settings;
    let model = &app.simulation.model;

    let content = vec![
        make_line(
            "Particles",
            format!("{}", app.simulation.particles().len()),
            app.focus == Focus::Particles,
        ),
        make_line(
            "Time",
            format!("{:.2}x", settings.time_scale),
            app.focus == Focus::TimeScale,
        ),
        make_line(
            "Damping",
            format!("{:.1}", settings.damping),
            app.focus == Focus::Damping,
        ),
        make_line(
            "Inner",
            format!("{:.0}", model.inner_radius()),
            app.focus == Focus::InnerRadius,
        ),
        make_line(
            "Outer",
            format!("{:.0}", model.outer_radius()),
            app.focus == Focus::OuterRadius,
        ),
        make_line(
            "Trail",
            format!("{}", settings.trail_length),
            app.focus == Focus::TrailLength,
        ),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2);
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0
    } else if focus_line >= visible_height {
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>6}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content: Vec<Line> = CONTROLS
        .iter()
        .map(|&(key, desc)| make_control(key, desc))
        .collect();

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2);
    let max_scroll = content_height.saturating_sub(visible_height);

    let title = if max_scroll > 0 {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let paragraph = Paragraph::new(content)
        .block(styled_block(title))
        .scroll((app.controls_scroll.min(max_scroll), 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = app.canvas.cells(app.simulation.settings.trail_length);
    let buf = frame.buffer_mut();

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            buf[(x, y)].set_char(cell.char).set_fg(cell.color);
        }
    }
}

/// Rect of the given size centered over the canvas area
fn centered_over_canvas(area: Rect, app: &App, width: u16, height: u16) -> Rect {
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    let width = width.min(canvas_width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.x + canvas_x + canvas_width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn render_file_picker(frame: &mut Frame, area: Rect, app: &App) {
    let Some(picker) = &app.file_picker else {
        return;
    };

    let popup_area = centered_over_canvas(area, app, 48, picker.entries.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let content: Vec<Line> = picker
        .entries
        .iter()
        .enumerate()
        .map(|(idx, path)| {
            let selected = idx == picker.selected_idx;
            let (prefix, style) = if selected {
                ("> ", Style::default().fg(HIGHLIGHT_COLOR))
            } else {
                ("  ", Style::default().fg(TEXT_COLOR))
            };
            Line::from(Span::styled(
                format!("{}{}", prefix, picker::display_name(path)),
                style,
            ))
        })
        .collect();

    // Keep the selection visible in long lists
    let visible_height = popup_area.height.saturating_sub(2);
    let scroll = (picker.selected_idx as u16).saturating_sub(visible_height.saturating_sub(1));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(" Load matrix (Enter, Esc) ");

    let paragraph = Paragraph::new(content).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let help_area = centered_over_canvas(area, app, 56, 40);

    frame.render_widget(Clear, help_area);

    let heading = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(HIGHLIGHT_COLOR)));
    let item = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(TEXT_COLOR)));

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("PARTICLE LIFE", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Colored particles attract or repel each other according to a kind-by-kind matrix. Simple rules, lifelike clusters."),
        Line::from(""),
        heading("FORCES:"),
        Line::from("Closer than the inner radius every pair pushes apart. Between inner and outer radius the matrix coefficient applies: green attracts, red repels. Beyond the outer radius nothing happens."),
        Line::from(""),
        heading("MATRIX EDITOR:"),
        item("Tab to the matrix, arrows move the cursor"),
        item("+/- change the cell by 0.25"),
        Line::from("Column = kind that moves, row = kind it reacts to. The matrix need not be symmetric."),
        Line::from(""),
        heading("FILES:"),
        item("Ctrl+S saves the matrix"),
        item("L or Ctrl+L opens the file picker"),
        item("R reloads the startup matrices and respawns"),
        Line::from(""),
        heading("VIEW:"),
        item("V - motion trails"),
        item("F - fullscreen canvas"),
        item("[/] - time scale"),
        Line::from(""),
        heading("BASIC CONTROLS:"),
        Line::from("Space=Pause, Enter=Randomize, M=Reshuffle, Tab/Arrows=Adjust, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_area.height.saturating_sub(2);
    let max_scroll = content_height.saturating_sub(visible_height);

    let title = if max_scroll > 0 {
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
