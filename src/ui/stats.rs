//! Stall rate table: one row per resource, `full` then `some` columns.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Threshold};
use crate::data::{Mode, RateTable, Resource, Signal, Window};
use crate::ui::Theme;

/// Gap between the `full` and `some` halves of a row.
const HALF_GAP: &str = "     ";

/// Render the rate table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![header_line(&app.theme)];
    match app.engine.rates() {
        Some(rates) => {
            for resource in Resource::ALL {
                lines.push(row_line(resource, rates, app.state.threshold, &app.theme));
            }
        }
        None => lines.push(Line::from(Span::styled(
            " waiting for first sample...",
            Style::default().add_modifier(Modifier::DIM),
        ))),
    }

    let block = Block::default()
        .title(format!(" Stall% (events on {} rate) ", app.state.event_interval.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Format one rate cell, six columns wide; unavailable rates show `n/a`.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!(" {:5.1}", rate),
        None => format!(" {:>5}", "n/a"),
    }
}

fn header_line(theme: &Theme) -> Line<'static> {
    let mut text = String::new();
    for mode in Mode::ALL {
        if mode == Mode::Some {
            text.push_str(HALF_GAP);
        }
        for window in Window::ALL {
            text.push_str(&format!(" {:->5}", window.label()));
        }
        let caption = match mode {
            Mode::Full => "Full.Stall%",
            Mode::Some => "Some.Stall%",
        };
        text.push_str(&format!("  {:>11}", caption));
    }
    Line::from(Span::styled(text, theme.header))
}

fn row_line(resource: Resource, rates: &RateTable, threshold: Threshold, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for mode in Mode::ALL {
        if mode == Mode::Some {
            spans.push(Span::raw(HALF_GAP));
        }
        let signal = Signal::new(resource, mode);
        for window in Window::ALL {
            let rate = rates.get(signal, window);
            spans.push(Span::styled(format_rate(rate), theme.rate_style(rate, threshold)));
        }
        spans.push(Span::raw(format!("  {:<11}", signal)));
    }
    Line::from(spans)
}
