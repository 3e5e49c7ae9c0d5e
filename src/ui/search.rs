use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::{bold_style, legend_style, padded};
use crate::search::SearchTask;

/// Style for one grid cell given its selection state
fn cell_style(selected: bool, is_target: bool, under_cursor: bool) -> Style {
    let style = match (selected, is_target) {
        (true, true) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        (false, _) => Style::default().add_modifier(Modifier::DIM),
    };
    if under_cursor {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

pub fn render_search(task: &SearchTask, cursor: (usize, usize), area: Rect, buf: &mut Buffer) {
    let grid = task.grid();
    let grid_height = grid.row_count() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),           // instructions
            Constraint::Length(1),           // progress
            Constraint::Length(1),           // padding
            Constraint::Length(grid_height), // grid
            Constraint::Length(1),           // padding
            Constraint::Length(2),           // completion message
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(padded(area));

    let targets = task
        .targets()
        .iter()
        .map(|t| format!("\"{t}\""))
        .join(" and ");
    Paragraph::new(vec![
        Line::from(Span::styled("letter search", bold_style())),
        Line::from(format!(
            "Find {targets} in the grid below. Each appears exactly once."
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!("found: {} / {}", task.correct_count(), task.target_count()),
        Style::default().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let lines: Vec<Line> = grid
        .rows()
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let gaps = std::iter::repeat(Span::raw(" ")).take(row.len().saturating_sub(1));
            let spans = row
                .iter()
                .enumerate()
                .map(|(c, &ch)| {
                    let style =
                        cell_style(task.is_selected(r, c), task.is_target(ch), cursor == (r, c));
                    Span::styled(ch.to_string(), style)
                })
                .interleave_shortest(gaps)
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect();

    // every row is padded to the same width so centering keeps columns aligned
    let widest = lines.iter().map(Line::width).max().unwrap_or(0);
    let lines: Vec<Line> = lines
        .into_iter()
        .map(|mut line| {
            let pad = widest.saturating_sub(line.width());
            if pad > 0 {
                line.spans.push(Span::raw(" ".repeat(pad)));
            }
            line
        })
        .collect();
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    if task.is_complete() {
        let message = "Well done! You found every letter. Press (enter) to start focusing.";
        let alignment = if message.width() <= chunks[5].width as usize {
            Alignment::Center
        } else {
            Alignment::Left
        };
        Paragraph::new(Span::styled(
            message,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(alignment)
        .wrap(Wrap { trim: true })
        .render(chunks[5], buf);
    }

    Paragraph::new(Span::styled(
        "arrows/hjkl move / (space) select / (enter) continue / (esc)ape",
        legend_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[7], buf);
}
