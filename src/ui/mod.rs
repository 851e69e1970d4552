//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`common`]: Title bar, status bar / threshold prompt, help panel
//! - [`stats`]: Per-resource stall rate table
//! - [`log`]: Scrollable (or brief) event log
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Title (common::render_title)         │
//! ├──────────────────────────────────────┤
//! │ Rates (stats::render)                │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Events (log::render)                 │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status / prompt (common::render_...) │
//! └──────────────────────────────────────┘
//! ```
//!
//! Help mode replaces the rates and events with `common::render_help`.

pub mod common;
pub mod log;
pub mod stats;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 96;
pub const MIN_HEIGHT: u16 = 10;

/// Rate block height: borders, caption line, three resource rows.
const STATS_HEIGHT: u16 = 6;

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5.min(area.height));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),            // Title
        Constraint::Length(STATS_HEIGHT), // Rates
        Constraint::Min(3),               // Events
        Constraint::Length(1),            // Status bar
    ])
    .split(area);

    common::render_title(frame, app, chunks[0]);

    if app.state.help {
        let body = Rect::new(area.x, chunks[1].y, area.width, chunks[1].height + chunks[2].height);
        common::render_help(frame, app, body);
    } else {
        stats::render(frame, app, chunks[1]);
        log::render(frame, app, chunks[2]);
    }

    common::render_status_bar(frame, app, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use crate::app::{Action, MonitorState};
    use crate::data::engine::tests::scripted_engine;
    use crate::data::history::CYCLE_PERIOD;
    use crate::data::{Stamp, Window};

    fn screen_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        screen_text(terminal.backend().buffer())
    }

    fn sampled_app() -> App {
        let mut app = App::with_theme(
            scripted_engine(&[0, 400_000, 100_000]),
            MonitorState {
                event_interval: Window::S1,
                ..MonitorState::default()
            },
            Theme::dark(),
        );
        let base = Stamp::now();
        for i in 0..3 {
            app.sample(base.advanced(CYCLE_PERIOD * i)).unwrap();
        }
        app
    }

    #[test]
    fn test_draw_shows_rates_and_events() {
        let app = sampled_app();
        let screen = render(&app, 120, 20);

        assert!(screen.contains("PSISTAT"));
        assert!(screen.contains("[tT]hresh=20%"));
        assert!(screen.contains("cpu.some"));
        assert!(screen.contains("memory.full"));
        assert!(screen.contains("10.0"));
        assert!(screen.contains("Events (1)"));
        assert!(screen.contains(">=20 i=1"));
    }

    #[test]
    fn test_help_replaces_body() {
        let mut app = sampled_app();
        app.apply(Action::ToggleHelp);
        let screen = render(&app, 120, 30);

        assert!(screen.contains("Keyboard Shortcuts"));
        assert!(!screen.contains("Events ("));
    }

    #[test]
    fn test_prompt_in_status_bar() {
        let mut app = sampled_app();
        app.apply(Action::BeginThresholdEntry);
        app.apply(Action::ThresholdInput('4'));
        let screen = render(&app, 120, 20);
        assert!(screen.contains("Threshold % (1-99): 4_"));
    }

    #[test]
    fn test_small_terminal_message() {
        let app = sampled_app();
        let screen = render(&app, 40, 8);
        assert!(screen.contains("Terminal too small"));
    }
}
