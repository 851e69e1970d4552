//! Event log view.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_ago;
use crate::data::Event;

/// Render the event log, newest first.
///
/// In brief mode only the lines that fit are built; otherwise the whole log
/// is scrollable from `app.scroll`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let now = Instant::now();
    let log = app.engine.log();
    let total = log.len();
    let visible = area.height.saturating_sub(2) as usize;

    let (lines, scroll, title): (Vec<Line>, usize, String) = if app.state.brief {
        let lines = log.iter().take(visible).map(|e| Line::from(event_line(e, now))).collect();
        (lines, 0, format!(" Events ({}) [brief] ", total))
    } else {
        let lines = log.iter().map(|e| Line::from(event_line(e, now))).collect();
        let scroll = app.scroll.min(total.saturating_sub(1));
        let position = if total > 0 {
            format!(" [{}/{}]", scroll + 1, total)
        } else {
            String::new()
        };
        (lines, scroll, format!(" Events ({}){} ", total, position))
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

/// One event line: right-aligned age, then the description.
pub fn event_line(event: &Event, now: Instant) -> String {
    format!("{:>6}: {}", format_ago(now.saturating_duration_since(event.mono)), event.description)
}
