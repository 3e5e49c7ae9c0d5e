use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Paragraph, Widget,
    },
};

use super::breathing::{canvas_bounds, circle_scale, phase_color};
use super::{bold_style, dim_style, legend_style, padded};
use crate::countdown::format_clock;
use crate::session::FocusSession;

/// Guidance shown under the breath count, alternating each breath
pub const FOCUS_TIPS: [&str; 2] = [
    "a steady breathing rhythm helps attention settle",
    "try to blink in time with your breath",
];

pub fn focus_tip(breath_count: u32) -> &'static str {
    FOCUS_TIPS[breath_count as usize % FOCUS_TIPS.len()]
}

pub fn render_focus(session: &FocusSession, now: u64, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // clock
            Constraint::Min(3),    // breathing circle
            Constraint::Length(1), // breath count
            Constraint::Length(1), // tip
            Constraint::Length(1), // status
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(padded(area));

    let phase = session.phase();
    let color = phase_color(phase);

    Paragraph::new(Span::styled(
        format_clock(session.seconds_remaining()),
        bold_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let circle_area = chunks[1];
    let (x_bounds, y_bounds) = canvas_bounds(circle_area.width, circle_area.height);
    let radius = 0.9 * circle_scale(phase, session.phase_progress(now));

    Canvas::default()
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius,
                color,
            });
        })
        .render(circle_area, buf);

    // instruction sits in the middle of the circle
    if circle_area.height > 0 {
        let middle = Rect {
            y: circle_area.y + circle_area.height / 2,
            height: 1,
            ..circle_area
        };
        Paragraph::new(Span::styled(
            phase.instruction(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(middle, buf);
    }

    Paragraph::new(Span::styled(
        format!("breaths: {}", session.breath_count()),
        dim_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        focus_tip(session.breath_count()),
        dim_style().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    if session.is_paused() {
        Paragraph::new(Span::styled(
            "PAUSED",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }

    let legend = if session.is_paused() {
        "(p)/(space) resume / (e)nd / (esc)ape"
    } else {
        "(p)/(space) pause / (e)nd / (esc)ape"
    };
    Paragraph::new(Line::from(Span::styled(legend, legend_style())))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
}
