use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::card;
use crate::app::App;
use crate::paginator::LoadState;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let lectures = app.lectures();

    if lectures.is_empty() && app.paginator.state() == LoadState::Exhausted {
        let empty = Paragraph::new("No open lectures")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let layout = &app.layout;
    let card_height = layout.card_height;
    let total_rows = layout.rows(lectures.len());
    let mut y = area.y;
    let mut row = app.scroll_row;

    while row < total_rows && y + card_height <= area.bottom() {
        for col in 0..layout.columns {
            let index = row * layout.columns + col;
            let Some(lecture) = lectures.get(index) else {
                break;
            };
            let x = area.x + col as u16 * layout.card_width;
            let rect = Rect {
                x,
                y,
                width: layout.card_width.min(area.right().saturating_sub(x)),
                height: card_height,
            };
            card::render(frame, lecture, rect, index == app.selected);
        }
        y += card_height;
        row += 1;
    }

    // the sentinel row, directly under the last card row
    if row == total_rows && y < area.bottom() {
        let height = layout.sentinel_height.min(area.bottom() - y);
        let sentinel = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        let text = match app.paginator.state() {
            LoadState::Loading => "loading more lectures...",
            LoadState::Exhausted => "- end -",
            LoadState::Idle => "",
        };
        let line = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(line, sentinel);
    }
}
