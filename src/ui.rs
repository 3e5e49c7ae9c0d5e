pub mod breathing;
pub mod focus;
pub mod screen;
pub mod search;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::app::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub(crate) fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn dim_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub(crate) fn legend_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

/// Inner area after the standard screen margins
pub(crate) fn padded(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(0)])
        .split(area)[0]
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        screen::current_screen(&self.state).render(self, area, buf);
    }
}
