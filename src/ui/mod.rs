mod card;
mod grid;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::paginator::LoadState;

pub fn render(frame: &mut Frame, app: &App) {
    // keep in sync with layout::CHROME_HEIGHT
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_section_label(frame, app, chunks[1]);
    grid::render(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("lectern - {}", app.ui.title);

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

/// The section heading doubles as a link to the catalogue home page.
fn render_section_label(frame: &mut Frame, app: &App, area: Rect) {
    let label = Paragraph::new(Line::from(vec![
        Span::styled(
            app.ui.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("[o] {}", app.ui.home_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    frame.render_widget(label, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.lectures().len();

    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if let Some(message) = &app.status {
        Line::from(vec![Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        )])
    } else {
        let (state, color) = match app.paginator.state() {
            LoadState::Loading => ("Loading...".to_string(), Color::Yellow),
            LoadState::Exhausted => (format!("All {} lectures loaded", count), Color::Gray),
            LoadState::Idle => (format!("{} lectures", count), Color::Gray),
        };
        Line::from(vec![
            Span::styled(state, Style::default().fg(color)),
            Span::styled(
                " | hjkl/g/G: nav | Ctrl+d/u: page | Enter: open | y: yank | r: refresh | q: quit",
                Style::default().fg(Color::Gray),
            ),
        ])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
