use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::{bold_style, dim_style, focus::render_focus, legend_style, padded, search::render_search};
use crate::app::{App, AppState};
use crate::config::FocusPreset;
use crate::countdown::format_clock;

/// A UI screen boundary: renders one [`AppState`]
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Preset selection and the warm-up toggle
pub struct HomeScreen;

impl Screen for HomeScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(2), // title
                Constraint::Length(1), // padding
                Constraint::Length(2), // research note
                Constraint::Length(1), // padding
                Constraint::Length(3), // presets
                Constraint::Length(1), // warm-up
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(padded(area));

        Paragraph::new(vec![
            Line::from(Span::styled(
                "foolcools",
                bold_style().fg(Color::Magenta),
            )),
            Line::from(Span::styled(
                "a breathing-paced focus timer",
                dim_style(),
            )),
        ])
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(
            "Slow, paced breathing settles attention. A short letter search warms it up first.",
        )
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

        let mut spans = Vec::new();
        for (i, preset) in FocusPreset::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            let label = format!(" {} ", preset.minutes());
            if preset == app.settings.preset {
                spans.push(Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(label, bold_style()));
            }
        }
        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("focus minutes"),
            )
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        let warmup = if app.settings.skip_warmup { "OFF" } else { "ON" };
        Paragraph::new(Span::styled(format!("warm-up: {warmup}"), dim_style()))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);

        Paragraph::new(Span::styled(
            "←/→ or 1-4 duration / (w)arm-up / (enter) start / (esc)ape",
            legend_style(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);
    }
}

pub struct SearchScreen;

impl Screen for SearchScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(task) = &app.search {
            render_search(task, app.cursor, area, buf);
        }
    }
}

pub struct FocusScreen;

impl Screen for FocusScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(session) = &app.session {
            render_focus(session, app.now, area, buf);
        }
    }
}

/// Completion notice with the session's numbers
pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let Some(summary) = &app.summary else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(7),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(padded(area));

        let (headline, color) = if summary.ended_early {
            ("Session ended early", Color::Yellow)
        } else {
            ("✓ Focus complete!", Color::Green)
        };

        let stat = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:>10}  "), dim_style()),
                Span::styled(value, bold_style()),
            ])
        };

        Paragraph::new(vec![
            Line::from(Span::styled(headline, bold_style().fg(color))),
            Line::default(),
            stat("planned", format!("{} min", summary.duration_minutes)),
            stat("focused", format_clock(summary.seconds_focused)),
            stat("breaths", summary.breath_count.to_string()),
            stat("finished", summary.finished_at.format("%H:%M").to_string()),
        ])
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            "press any key to return / (esc)ape",
            legend_style(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Home => Box::new(HomeScreen),
        AppState::Search => Box::new(SearchScreen),
        AppState::Focus => Box::new(FocusScreen),
        AppState::Summary => Box::new(SummaryScreen),
    }
}
