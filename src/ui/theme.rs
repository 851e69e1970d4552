//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::app::Threshold;
use crate::data::round_rate;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for the title and prompts.
    pub highlight: Color,
    /// Color for rates at or above half the threshold.
    pub warning: Color,
    /// Color for rates at or above the threshold.
    pub critical: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for column captions.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a rate cell given the active threshold.
    pub fn rate_style(&self, rate: Option<f64>, threshold: Threshold) -> Style {
        let (Some(rate), Threshold::Percent(p)) = (rate, threshold) else {
            return match rate {
                None => Style::default().add_modifier(Modifier::DIM),
                Some(_) => Style::default(),
            };
        };
        let limit = f64::from(p);
        if threshold.admits(round_rate(rate)) {
            Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
        } else if rate >= limit / 2.0 {
            Style::default().fg(self.warning)
        } else {
            Style::default()
        }
    }
}
