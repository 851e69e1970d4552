//! Application state and action dispatch.

use std::fmt;

use crate::data::{Engine, RateTable, Stamp, Window};
use crate::error::{ReadError, SettingsError};
use crate::ui::Theme;

/// Step used by the raise/lower threshold keys.
const THRESHOLD_STEP: u8 = 5;
const THRESHOLD_MIN: u8 = 1;
const THRESHOLD_MAX: u8 = 99;

/// Event threshold in percent, or disabled after an invalid entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Percent(u8),
    /// Out of reach of any rate; nothing fires.
    Disabled,
}

impl Threshold {
    /// Validate a configured percentage.
    pub fn new(percent: i64) -> Result<Self, SettingsError> {
        match u8::try_from(percent) {
            Ok(p) if (THRESHOLD_MIN..=THRESHOLD_MAX).contains(&p) => Ok(Threshold::Percent(p)),
            _ => Err(SettingsError::Threshold(percent)),
        }
    }

    /// Parse free-form text: integers are clamped into 1..=99, anything
    /// else disables detection.
    pub fn parse_entry(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(n) => {
                Threshold::Percent(n.clamp(THRESHOLD_MIN.into(), THRESHOLD_MAX.into()) as u8)
            }
            Err(_) => Threshold::Disabled,
        }
    }

    /// Whether a (rounded) rate reaches this threshold.
    pub fn admits(&self, rate: f64) -> bool {
        match self {
            Threshold::Percent(p) => rate >= f64::from(*p),
            Threshold::Disabled => false,
        }
    }

    /// Next multiple of 5 above, wrapping from 95 to 5.
    pub fn raised(self) -> Self {
        match self {
            Threshold::Percent(p) if p < 95 => Threshold::Percent((p / THRESHOLD_STEP + 1) * THRESHOLD_STEP),
            _ => Threshold::Percent(THRESHOLD_STEP),
        }
    }

    /// Previous multiple of 5 below, wrapping from 5 to 95.
    pub fn lowered(self) -> Self {
        match self {
            Threshold::Percent(p) if p > THRESHOLD_STEP => {
                Threshold::Percent((p - 1) / THRESHOLD_STEP * THRESHOLD_STEP)
            }
            _ => Threshold::Percent(95),
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Percent(20)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Percent(p) => write!(f, "{}", p),
            Threshold::Disabled => f.write_str("off"),
        }
    }
}

/// Configuration mutated only by user actions.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorState {
    pub threshold: Threshold,
    /// Window whose rate drives detection; also the cooldown length.
    pub event_interval: Window,
    pub brief: bool,
    pub help: bool,
    pub quit: bool,
    /// Threshold text being typed, if the prompt is open.
    pub threshold_draft: Option<String>,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            event_interval: Window::S10,
            brief: false,
            help: false,
            quit: false,
            threshold_draft: None,
        }
    }
}

/// A discrete user action. Each one changes exactly one piece of state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NextInterval,
    PrevInterval,
    RaiseThreshold,
    LowerThreshold,
    /// Open the free-form threshold prompt.
    BeginThresholdEntry,
    ThresholdInput(char),
    ThresholdBackspace,
    CommitThreshold,
    CancelThreshold,
    ToggleBrief,
    ToggleHelp,
    /// Suspend the display and print the event log.
    DumpEvents,
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollTop,
    ScrollBottom,
    Quit,
}

/// Main application state.
pub struct App {
    pub state: MonitorState,
    pub engine: Engine,
    pub theme: Theme,
    /// First visible event line when brief mode is off.
    pub scroll: usize,
    dump_requested: bool,
}

impl App {
    /// Create an app, picking a theme from the terminal background.
    pub fn new(engine: Engine, state: MonitorState) -> Self {
        Self::with_theme(engine, state, Theme::auto_detect())
    }

    pub fn with_theme(engine: Engine, state: MonitorState, theme: Theme) -> Self {
        Self {
            state,
            engine,
            theme,
            scroll: 0,
            dump_requested: false,
        }
    }

    pub fn running(&self) -> bool {
        !self.state.quit
    }

    /// Run one sampling cycle against the current state.
    pub fn sample(&mut self, stamp: Stamp) -> Result<&RateTable, ReadError> {
        self.engine.cycle(stamp, &self.state)
    }

    /// Apply one action between cycles.
    pub fn apply(&mut self, action: Action) {
        let state = &mut self.state;
        match action {
            Action::NextInterval => state.event_interval = state.event_interval.next(),
            Action::PrevInterval => state.event_interval = state.event_interval.prev(),
            Action::RaiseThreshold => state.threshold = state.threshold.raised(),
            Action::LowerThreshold => state.threshold = state.threshold.lowered(),
            Action::BeginThresholdEntry => state.threshold_draft = Some(String::new()),
            Action::ThresholdInput(c) => {
                if let Some(draft) = state.threshold_draft.as_mut() {
                    draft.push(c);
                }
            }
            Action::ThresholdBackspace => {
                if let Some(draft) = state.threshold_draft.as_mut() {
                    draft.pop();
                }
            }
            Action::CommitThreshold => {
                // An empty entry leaves the threshold alone, like cancel.
                if let Some(draft) = state.threshold_draft.take() {
                    if !draft.trim().is_empty() {
                        state.threshold = Threshold::parse_entry(&draft);
                    }
                }
            }
            Action::CancelThreshold => state.threshold_draft = None,
            Action::ToggleBrief => {
                state.brief = !state.brief;
                self.scroll = 0;
            }
            Action::ToggleHelp => state.help = !state.help,
            Action::DumpEvents => self.dump_requested = true,
            Action::ScrollUp(n) => self.scroll = self.scroll.saturating_sub(n),
            Action::ScrollDown(n) => {
                let max = self.engine.log().len().saturating_sub(1);
                self.scroll = (self.scroll + n).min(max);
            }
            Action::ScrollTop => self.scroll = 0,
            Action::ScrollBottom => self.scroll = self.engine.log().len().saturating_sub(1),
            Action::Quit => state.quit = true,
        }
    }

    /// Take a pending dump request, clearing it.
    pub fn take_dump_request(&mut self) -> bool {
        std::mem::take(&mut self.dump_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::engine::tests::scripted_engine;
    use crate::data::history::CYCLE_PERIOD;

    fn app() -> App {
        App::with_theme(scripted_engine(&[0; 4]), MonitorState::default(), Theme::dark())
    }

    #[test]
    fn test_threshold_entry_clamps() {
        assert_eq!(Threshold::parse_entry("42"), Threshold::Percent(42));
        assert_eq!(Threshold::parse_entry(" 0 "), Threshold::Percent(1));
        assert_eq!(Threshold::parse_entry("250"), Threshold::Percent(99));
        assert_eq!(Threshold::parse_entry("-3"), Threshold::Percent(1));
    }

    #[test]
    fn test_invalid_threshold_entry_disables_detection() {
        let threshold = Threshold::parse_entry("abc");
        assert_eq!(threshold, Threshold::Disabled);
        assert!(!threshold.admits(100.0));
        assert!(!threshold.admits(f64::MAX));
        assert_eq!(threshold.to_string(), "off");
    }

    #[test]
    fn test_threshold_new_validates_range() {
        assert_eq!(Threshold::new(1).unwrap(), Threshold::Percent(1));
        assert!(Threshold::new(0).is_err());
        assert!(Threshold::new(100).is_err());
        assert!(Threshold::new(-5).is_err());
    }

    #[test]
    fn test_threshold_steps_wrap() {
        assert_eq!(Threshold::Percent(20).raised(), Threshold::Percent(25));
        assert_eq!(Threshold::Percent(23).raised(), Threshold::Percent(25));
        assert_eq!(Threshold::Percent(95).raised(), Threshold::Percent(5));
        assert_eq!(Threshold::Percent(99).raised(), Threshold::Percent(5));
        assert_eq!(Threshold::Disabled.raised(), Threshold::Percent(5));

        assert_eq!(Threshold::Percent(20).lowered(), Threshold::Percent(15));
        assert_eq!(Threshold::Percent(23).lowered(), Threshold::Percent(20));
        assert_eq!(Threshold::Percent(5).lowered(), Threshold::Percent(95));
        assert_eq!(Threshold::Percent(3).lowered(), Threshold::Percent(95));
        assert_eq!(Threshold::Disabled.lowered(), Threshold::Percent(95));
    }

    #[test]
    fn test_threshold_prompt_flow() {
        let mut app = app();
        app.apply(Action::BeginThresholdEntry);
        for c in "357".chars() {
            app.apply(Action::ThresholdInput(c));
        }
        app.apply(Action::ThresholdBackspace);
        assert_eq!(app.state.threshold_draft.as_deref(), Some("35"));
        // Still the old value while editing.
        assert_eq!(app.state.threshold, Threshold::Percent(20));

        app.apply(Action::CommitThreshold);
        assert_eq!(app.state.threshold, Threshold::Percent(35));
        assert!(app.state.threshold_draft.is_none());
    }

    #[test]
    fn test_threshold_prompt_cancel_keeps_value() {
        let mut app = app();
        app.apply(Action::BeginThresholdEntry);
        app.apply(Action::ThresholdInput('9'));
        app.apply(Action::CancelThreshold);
        assert_eq!(app.state.threshold, Threshold::Percent(20));
        assert!(app.state.threshold_draft.is_none());
    }

    #[test]
    fn test_empty_threshold_entry_keeps_value() {
        let mut app = app();
        app.apply(Action::BeginThresholdEntry);
        app.apply(Action::CommitThreshold);
        assert_eq!(app.state.threshold, Threshold::Percent(20));
        assert!(app.state.threshold_draft.is_none());

        app.apply(Action::BeginThresholdEntry);
        app.apply(Action::ThresholdInput(' '));
        app.apply(Action::CommitThreshold);
        assert_eq!(app.state.threshold, Threshold::Percent(20));
    }

    #[test]
    fn test_toggles_and_quit() {
        let mut app = app();
        app.apply(Action::ToggleBrief);
        app.apply(Action::ToggleHelp);
        assert!(app.state.brief);
        assert!(app.state.help);

        app.apply(Action::NextInterval);
        assert_eq!(app.state.event_interval, Window::S60);
        app.apply(Action::PrevInterval);
        app.apply(Action::PrevInterval);
        assert_eq!(app.state.event_interval, Window::S3);

        assert!(app.running());
        app.apply(Action::Quit);
        assert!(!app.running());
    }

    #[test]
    fn test_dump_request_is_taken_once() {
        let mut app = app();
        assert!(!app.take_dump_request());
        app.apply(Action::DumpEvents);
        assert!(app.take_dump_request());
        assert!(!app.take_dump_request());
    }

    #[test]
    fn test_scroll_is_bounded_by_log() {
        let mut app = app();
        app.apply(Action::ScrollDown(10));
        assert_eq!(app.scroll, 0);
        app.apply(Action::ScrollUp(3));
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_state_change_applies_on_next_cycle() {
        let mut app = App::with_theme(
            scripted_engine(&[0, 500_000, 500_000]),
            MonitorState {
                event_interval: Window::S1,
                ..MonitorState::default()
            },
            Theme::dark(),
        );
        let base = Stamp::now();
        app.apply(Action::BeginThresholdEntry);
        app.apply(Action::ThresholdInput('x'));
        app.apply(Action::CommitThreshold);

        for i in 0..3 {
            app.sample(base.advanced(CYCLE_PERIOD * i)).unwrap();
        }
        assert!(app.engine.log().is_empty());
    }
}
