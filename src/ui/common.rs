//! Common UI components: title bar, status bar, and help panel.

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Threshold};

/// Render the title bar summarizing the live configuration.
pub fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" PSISTAT ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(title_config(app), Style::default().fg(app.theme.highlight)),
        Span::raw(" │ [d]ump =:set ?:help q:quit │ "),
        Span::raw(Local::now().format("%H:%M:%S").to_string()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// The live settings shown in the title, e.g. `[tT]hresh=20% [iI]tvl=10 [b]rief=off`.
pub fn title_config(app: &App) -> String {
    let state = &app.state;
    let threshold = match state.threshold {
        Threshold::Percent(p) => format!("{}%", p),
        Threshold::Disabled => "off".to_string(),
    };
    format!(
        "[tT]hresh={} [iI]tvl={} [b]rief={}",
        threshold,
        state.event_interval.secs(),
        if state.brief { "on" } else { "off" }
    )
}

/// Render the bottom line: the threshold prompt while editing, otherwise
/// source and history info.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref draft) = app.state.threshold_draft {
        let paragraph = Paragraph::new(format!(
            " Threshold % (1-99): {}_   Enter:apply Esc:cancel",
            draft
        ))
        .style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.state.help {
        "?/Esc:close help q:quit"
    } else if app.state.brief {
        "b:scrollable log"
    } else {
        "↑↓ PgUp/PgDn:scroll b:brief"
    };
    let status = format!(
        " {} | {} samples | {}",
        app.engine.source_descriptions().join(" "),
        app.engine.timeline().len(),
        controls
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help panel in place of the stats and events.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(title, Style::default().add_modifier(Modifier::BOLD))])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Detection"),
        Line::from("  T / t     Raise / lower threshold by 5%"),
        Line::from("  =         Enter threshold (1-99; non-numbers disable events)"),
        Line::from("  i / I     Next / previous event interval (1 3 10 60 300s)"),
        Line::from(""),
        section(" Event Log"),
        Line::from("  b         Toggle brief mode (only what fits)"),
        Line::from("  ↑/↓ j/k   Scroll one line"),
        Line::from("  PgUp/PgDn Scroll ten lines"),
        Line::from("  Home/End  Jump to newest / oldest"),
        Line::from("  d         Dump the event log to the terminal"),
        Line::from(""),
        section(" General"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q / ^C    Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Sampling continues while help is shown",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}
