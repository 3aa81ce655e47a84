use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::types::Lecture;

/// Cut to `max` chars, with an ellipsis when something was dropped.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn render(frame: &mut Frame, lecture: &Lecture, area: Rect, selected: bool) {
    let inner_width = area.width.saturating_sub(4) as usize;

    let border_style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(
            format!(" {} ", truncate(&lecture.title, inner_width)),
            title_style,
        ));

    let mut lines = Vec::new();

    let mut byline = Vec::new();
    if let Some(instructor) = &lecture.instructor {
        byline.push(Span::styled(
            instructor.clone(),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(category) = &lecture.category {
        if !byline.is_empty() {
            byline.push(Span::raw(" · "));
        }
        byline.push(Span::styled(
            category.clone(),
            Style::default().fg(Color::Magenta),
        ));
    }
    if !byline.is_empty() {
        lines.push(Line::from(byline));
    }

    if let Some(created) = &lecture.created_at {
        lines.push(Line::from(Span::styled(
            created.format("%Y-%m-%d").to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(description) = &lecture.description {
        lines.push(Line::from(Span::styled(
            description.clone(),
            Style::default().fg(Color::Gray),
        )));
    }

    let body = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(body, area);
}
