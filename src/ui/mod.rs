use std::sync::OnceLock;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

use crate::app::{App, Popup, View};
use crate::roulette::wheel::Phase;
use crate::roulette::{Entry, MIN_ENTRIES};
use crate::theme::Theme;

static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn accent_bright() -> Color { theme().accent_bright }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn header() -> Color { theme().header }

/// Max label length on a wheel segment before truncation.
const LABEL_MAX: usize = 10;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Min(10),   // Main view
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_info_line(f, app, chunks[0]);

    match app.view {
        View::Input => draw_input_view(f, app, chunks[1]),
        View::Wheel => draw_wheel_view(f, app, chunks[1]),
    }

    draw_footer(f, app, chunks[2]);

    match app.popup {
        Popup::None => {}
        Popup::Result => draw_result_popup(f, app),
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > contextual hint
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(warning())))
    } else {
        let hint = match (app.view, app.wheel.phase()) {
            (View::Input, _) => "Your lunch spots, one per line",
            (View::Wheel, Phase::Spinning) => "Hit Space to STOP the wheel",
            (View::Wheel, Phase::Stopping) => "Landing...",
            (View::Wheel, Phase::Idle) => "Press r to spin again",
        };
        Line::from(Span::styled(hint, Style::default().fg(text_dim())))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_input_view(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Textarea
            Constraint::Length(1), // Count line
        ])
        .split(area);

    let block = Block::default()
        .title(Span::styled(
            " Restaurant List ",
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    // Color each line like its future wheel segment
    let colors = line_colors(&app.input_text, &app.entries, text());
    let mut lines: Vec<Line> = app
        .input_text
        .lines()
        .zip(colors)
        .map(|(raw, color)| {
            Line::from(vec![
                Span::styled("▌ ", Style::default().fg(color)),
                Span::styled(raw.to_string(), Style::default().fg(text())),
            ])
        })
        .collect();

    // Cursor on the line being typed
    if app.input_text.ends_with('\n') || app.input_text.is_empty() {
        lines.push(Line::from(Span::styled("▌ _", Style::default().fg(text_dim()))));
    } else if let Some(last) = lines.last_mut() {
        last.spans.push(Span::styled("_", Style::default().fg(accent())));
    }

    let textarea = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(textarea, chunks[0]);

    let count = app.entries.len();
    let count_line = if count < MIN_ENTRIES {
        Line::from(Span::styled(
            "Enter at least two restaurants to spin.",
            Style::default().fg(text_dim()),
        ))
    } else {
        Line::from(vec![
            Span::styled(format!("{} restaurants ready. ", count), Style::default().fg(success())),
            Span::styled("Press ", Style::default().fg(text_dim())),
            Span::styled("Tab", Style::default().fg(accent())),
            Span::styled(" to spin!", Style::default().fg(text_dim())),
        ])
    };
    f.render_widget(Paragraph::new(count_line).alignment(Alignment::Center), chunks[1]);
}

fn draw_wheel_view(f: &mut Frame, app: &App, area: Rect) {
    // Keep the wheel round: terminal cells are roughly twice as tall as wide
    let side = area.height.min(area.width / 2);
    let wheel_area = Rect {
        x: area.x + (area.width.saturating_sub(side * 2)) / 2,
        y: area.y + (area.height.saturating_sub(side)) / 2,
        width: side * 2,
        height: side,
    };

    let rotation = app.wheel.rotation();
    let segments = app.entries.len().max(1);
    let seg = 360.0 / segments as f64;

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::NONE))
        .marker(Marker::Braille)
        .x_bounds([-1.3, 1.3])
        .y_bounds([-1.3, 1.3])
        .paint(|ctx| {
            // Fill the disc with radial lines, one per degree. The wheel-local
            // angle under clockwise-from-top position phi is (phi - rotation).
            for phi_deg in 0..360 {
                let phi = phi_deg as f64;
                let local = (phi - rotation).rem_euclid(360.0);
                let index = ((local / seg) as usize).min(segments - 1);
                let color = app.entries.get(index).map(|e| e.color).unwrap_or(inactive());

                let rad = phi.to_radians();
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: 0.97 * rad.sin(),
                    y2: 0.97 * rad.cos(),
                    color,
                });
            }

            // Rim
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: 1.0,
                color: text(),
            });

            // Segment labels at mid-angle
            for (i, entry) in app.entries.iter().enumerate() {
                let mid = i as f64 * seg + seg / 2.0;
                let phi = (mid + rotation).rem_euclid(360.0).to_radians();
                let label = truncate_label(&entry.name);
                // Nudge left so the label sits roughly centered on the spoke
                let x = 0.62 * phi.sin() - 0.04 * label.chars().count() as f64;
                let y = 0.62 * phi.cos();
                ctx.print(
                    x,
                    y,
                    Line::from(Span::styled(
                        label,
                        Style::default().fg(text()).add_modifier(Modifier::BOLD),
                    )),
                );
            }

            // Pointer at the top
            ctx.print(
                -0.02,
                1.18,
                Line::from(Span::styled("▼", Style::default().fg(danger()).add_modifier(Modifier::BOLD))),
            );

            // Center hub: STOP while spinning, a spinner while landing
            let hub = match app.wheel.phase() {
                Phase::Spinning => Span::styled(
                    "STOP",
                    Style::default().fg(danger()).add_modifier(Modifier::BOLD),
                ),
                Phase::Stopping => {
                    let frame = (rotation / 10.0) as usize % SPINNER_FRAMES.len();
                    Span::styled(SPINNER_FRAMES[frame], Style::default().fg(accent()))
                }
                Phase::Idle => Span::styled("●", Style::default().fg(text_dim())),
            };
            ctx.print(-0.08, 0.0, Line::from(hub));
        });

    f.render_widget(canvas, wheel_area);
}

fn draw_result_popup(f: &mut Frame, app: &App) {
    let Some(ref result) = app.result else { return };

    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 70 { 90 } else { 55 },
        if area.height < 25 { 80 } else { 55 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let winner_color = result.winner.color;

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PICKED FOR YOU",
            Style::default().fg(text_dim()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            result.winner.name.clone(),
            Style::default().fg(winner_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if app.comment_loading {
        lines.push(Line::from(Span::styled(
            "Reading today's lunch fortune...",
            Style::default().fg(text_dim()).add_modifier(Modifier::ITALIC),
        )));
    } else if let Some(ref comment) = result.comment {
        lines.push(Line::from(vec![
            Span::styled("“", Style::default().fg(accent_bright())),
            Span::styled(comment.clone(), Style::default().fg(text())),
            Span::styled("”", Style::default().fg(accent_bright())),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("r", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
        Span::styled(" Spin again   ", Style::default().fg(text_dim())),
        Span::styled("e", Style::default().fg(accent())),
        Span::styled(" Edit list   ", Style::default().fg(text_dim())),
        Span::styled("q", Style::default().fg(danger())),
        Span::styled(" Quit", Style::default().fg(text_dim())),
    ]));

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(" 󰆥 Winner ", Style::default().fg(winner_color)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(winner_color)),
        );

    f.render_widget(card, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled("═══ List ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  type      ", Style::default().fg(accent())),
            Span::raw("Edit the list, one restaurant per line"),
        ]),
        Line::from(vec![
            Span::styled("  Tab       ", Style::default().fg(accent())),
            Span::raw("Start the wheel (needs two or more entries)"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Wheel ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  Space     ", Style::default().fg(accent())),
            Span::raw("STOP: lands on a uniformly random winner"),
        ]),
        Line::from(vec![
            Span::styled("  r         ", Style::default().fg(accent())),
            Span::raw("Spin again after a result"),
        ]),
        Line::from(vec![
            Span::styled("  e / Esc   ", Style::default().fg(accent())),
            Span::raw("Back to the list"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Quick Start ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  ruretto             ", Style::default().fg(accent())),
            Span::raw("Launch this TUI"),
        ]),
        Line::from(vec![
            Span::styled("  ruretto --pick      ", Style::default().fg(accent())),
            Span::raw("Pick a winner as JSON, no TUI"),
        ]),
        Line::from(vec![
            Span::styled("  ruretto --no-comment", Style::default().fg(accent())),
            Span::raw("Skip the AI comment this run"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ AI Comment ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::raw("  • Set "),
            Span::styled("GEMINI_API_KEY", Style::default().fg(text_dim())),
            Span::raw(" to get a one-liner with the winner"),
        ]),
        Line::from(vec![
            Span::raw("  • Falls back to a canned line when the call fails"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 ruretto Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match (app.view, app.popup) {
        (_, Popup::Result) => vec![("r", "Spin again"), ("e", "Edit"), ("q", "Quit")],
        (_, Popup::Help) => vec![("Esc", "Close")],
        (View::Input, _) => vec![("Tab", "Spin"), ("Enter", "New line"), ("Esc", "Quit")],
        (View::Wheel, _) => vec![
            ("Space", "Stop"),
            ("r", "Respin"),
            ("e", "Edit"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 50 { 3 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

/// Gutter color per raw input line. Entries are created from non-empty
/// lines in order, so the nth non-empty line takes the nth entry's color;
/// matching by position keeps duplicate names on their own segment colors.
fn line_colors(input: &str, entries: &[Entry], fallback: Color) -> Vec<Color> {
    let mut next = 0usize;
    input
        .lines()
        .map(|raw| {
            if raw.trim().is_empty() {
                fallback
            } else {
                let color = entries.get(next).map(|e| e.color).unwrap_or(fallback);
                next += 1;
                color
            }
        })
        .collect()
}

fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX {
        let cut: String = name.chars().take(LABEL_MAX - 1).collect();
        format!("{}..", cut)
    } else {
        name.to_string()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roulette::parse_entries;

    #[test]
    fn test_line_colors_duplicates_keep_their_own_color() {
        let palette = vec![Color::Red, Color::Green];
        let entries = parse_entries("pho\npho", &palette);
        let colors = line_colors("pho\npho", &entries, Color::White);
        assert_eq!(colors, vec![Color::Red, Color::Green]);
    }

    #[test]
    fn test_line_colors_skip_blank_lines() {
        let palette = vec![Color::Red, Color::Green];
        let entries = parse_entries("a\n\n  \nb", &palette);
        let colors = line_colors("a\n\n  \nb", &entries, Color::White);
        assert_eq!(colors, vec![Color::Red, Color::White, Color::White, Color::Green]);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Pho 99"), "Pho 99");
        assert_eq!(truncate_label("A Very Long Restaurant"), "A Very Lo..");
    }

    #[test]
    fn test_centered_rect_is_contained() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, outer);
        assert!(inner.x >= outer.x && inner.y >= outer.y);
        assert!(inner.right() <= outer.right() && inner.bottom() <= outer.bottom());
    }
}
