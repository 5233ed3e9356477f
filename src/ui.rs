use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Mode};
use crate::form::Field;
use crate::topics;

const THROBBER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn draw(f: &mut Frame, app: &App) {
    draw_landing(f, app);

    match app.mode {
        Mode::Idle => {}
        Mode::Collecting => draw_form(f, app),
        Mode::Loading => draw_loading(f, app),
        Mode::Results => draw_results(f, app),
    }
}

/// The landing screen stays visible underneath every popup, like the page
/// behind a modal.
fn draw_landing(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Line::from(vec![
        Span::styled("Topic", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled("Finder", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Need a topic for your final year project or research?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            "Search for final year project topics by describing your faculty, \
             department and institution, with optional keywords to include.",
        ),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(body, chunks[1]);

    let hints = match app.mode {
        Mode::Idle => "s: search topics | q: quit",
        Mode::Collecting => "Tab/Shift+Tab: move | Enter: generate | Esc: close",
        Mode::Loading => "Waiting for the completion endpoint...",
        Mode::Results => "Up/Down: scroll | Esc: close | q: quit",
    };
    let footer = Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[2]);
}

fn draw_form(f: &mut Frame, app: &App) {
    // Five bordered fields plus an error line inside the popup border.
    let height = Field::ALL.len() as u16 * 3 + 3;
    let area = centered_rect(f.area(), 70, height);
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title("Please let us know a little about you");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints: Vec<Constraint> =
        Field::ALL.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in Field::ALL.into_iter().enumerate() {
        f.render_widget(app.form.widget(field), chunks[i]);
    }

    if let Some(ref error) = app.form.error {
        let error_line = Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        f.render_widget(error_line, chunks[Field::ALL.len()]);
    }
}

fn draw_loading(f: &mut Frame, app: &App) {
    let area = centered_rect(f.area(), 40, 5);
    f.render_widget(Clear, area);

    let frame = THROBBER[app.tick % THROBBER.len()];
    let loading = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(frame, Style::default().fg(Color::Yellow)),
            Span::raw(" Generating topics..."),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(loading, area);
}

fn draw_results(f: &mut Frame, app: &App) {
    let area = centered_rect(f.area(), 80, f.area().height.saturating_sub(4).max(7));
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(ref query) = app.last_query {
        lines.push(Line::from(Span::styled(
            topics::summary_line(query),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if let Some(at) = app.generated_at {
            lines.push(Line::from(Span::styled(
                format!("Generated at {}", at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    let entries = topics::parse_topics(&app.result_text);
    if entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No topics were generated. Check topicfinder.log for details.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    } else {
        for entry in &entries {
            lines.push(Line::from(Span::styled(
                entry.title.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            if !entry.description.trim().is_empty() {
                lines.push(Line::from(entry.description.trim().to_string()));
            }
            lines.push(Line::from(""));
        }
    }

    let results = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title("Select any topic from the list"),
        )
        .wrap(Wrap { trim: true })
        .scroll((app.results_scroll, 0));
    f.render_widget(results, area);
}

/// Centers a popup of the given width percentage and fixed height.
fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (area.width as u32 * percent_x as u32 / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_within_area() {
        let area = Rect::new(0, 0, 100, 30);
        let popup = centered_rect(area, 70, 19);
        assert_eq!(popup.width, 70);
        assert_eq!(popup.height, 19);
        assert!(popup.x + popup.width <= area.width);
        assert!(popup.y + popup.height <= area.height);
    }

    #[test]
    fn test_centered_rect_clamps_height() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect(area, 80, 19);
        assert_eq!(popup.height, 10);
    }
}
