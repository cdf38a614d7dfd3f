//! Debounced query input for the dashboard search
//!
//! Buffers keystrokes and releases at most one search per quiet period,
//! carrying the most recent trimmed query. Queries shorter than the
//! minimum length never reach the search collaborator; they clear the
//! results synchronously instead.

use crate::debouncer::Debouncer;
use crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use tracing::debug;
use tui_input::{backend::crossterm::EventHandler, Input};

/// Result of feeding a key to the debounced input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebouncedInputAction {
    /// Key did not change the text (caret move, no-op edit)
    Continue,
    /// Text changed and a search is armed for the trimmed value
    InputChanged(String),
    /// Text changed but is below the minimum length; results must be cleared now
    ClearResults,
}

/// Configuration for the debounced input
#[derive(Debug, Clone)]
pub struct DebouncedInputConfig {
    /// Quiet period in milliseconds
    pub debounce_ms: u64,
    /// Minimum trimmed length before a search is issued
    pub min_query_len: usize,
    /// Title for the input box
    pub title: String,
    /// Shown in dim text while the input is empty
    pub placeholder: String,
    pub style: Style,
    /// Whether to show the "typing..." indicator while a search is armed
    pub show_debounce_indicator: bool,
}

impl Default for DebouncedInputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
            title: "Search".to_string(),
            placeholder: "Search patients, appointments...".to_string(),
            style: Style::default().fg(Color::Yellow),
            show_debounce_indicator: true,
        }
    }
}

pub struct DebouncedInput {
    input: Input,
    debouncer: Debouncer,
    config: DebouncedInputConfig,
}

impl Default for DebouncedInput {
    fn default() -> Self {
        Self::new()
    }
}

impl DebouncedInput {
    pub fn new() -> Self {
        Self::with_config(DebouncedInputConfig::default())
    }

    pub fn with_config(config: DebouncedInputConfig) -> Self {
        Self {
            input: Input::default(),
            debouncer: Debouncer::new(config.debounce_ms),
            config,
        }
    }

    pub fn config(&self) -> &DebouncedInputConfig {
        &self.config
    }

    /// Raw text as typed
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Text with surrounding whitespace removed, as sent to the collaborator
    pub fn trimmed(&self) -> &str {
        self.input.value().trim()
    }

    /// Whether the trimmed query is long enough to search for
    pub fn meets_min_length(&self) -> bool {
        self.trimmed().chars().count() >= self.config.min_query_len
    }

    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn time_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_remaining_at(now)
    }

    /// Feed a key to the text field
    pub fn handle_key(&mut self, key: KeyEvent) -> DebouncedInputAction {
        self.handle_key_at(key, Instant::now())
    }

    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> DebouncedInputAction {
        let old_value = self.input.value().to_string();
        self.input.handle_event(&Event::Key(key));

        if self.input.value() == old_value {
            return DebouncedInputAction::Continue;
        }
        self.on_text_changed(now)
    }

    /// Replace the whole text, as a paste or programmatic edit would
    pub fn set_value_at(&mut self, value: impl Into<String>, now: Instant) -> DebouncedInputAction {
        let value = value.into();
        if value == self.input.value() {
            return DebouncedInputAction::Continue;
        }
        self.input = Input::default().with_value(value);
        self.on_text_changed(now)
    }

    fn on_text_changed(&mut self, now: Instant) -> DebouncedInputAction {
        if self.meets_min_length() {
            self.debouncer.trigger_at(now);
            debug!(target: "search", "Query changed to '{}', search armed", self.trimmed());
            DebouncedInputAction::InputChanged(self.trimmed().to_string())
        } else {
            self.debouncer.reset();
            DebouncedInputAction::ClearResults
        }
    }

    /// Poll the quiet period. Returns the query to search for when it has elapsed.
    pub fn check_debounce(&mut self) -> Option<String> {
        self.check_debounce_at(Instant::now())
    }

    pub fn check_debounce_at(&mut self, now: Instant) -> Option<String> {
        if !self.debouncer.should_execute_at(now) {
            return None;
        }
        if self.meets_min_length() {
            Some(self.trimmed().to_string())
        } else {
            None
        }
    }

    /// Clear the text without arming a search
    pub fn clear(&mut self) {
        self.input.reset();
        self.debouncer.reset();
    }

    /// Arm a search for the current text, as if it had just been typed
    pub fn rearm_at(&mut self, now: Instant) -> bool {
        if !self.meets_min_length() {
            return false;
        }
        self.debouncer.trigger_at(now);
        true
    }

    /// Render the input box. `status_icon` is drawn at the right end of the title.
    pub fn render(&self, f: &mut Frame, area: Rect, focused: bool, status_icon: &str) {
        let mut title = self.config.title.clone();
        if self.config.show_debounce_indicator && self.debouncer.is_pending() {
            title.push_str(" (typing...)");
        }

        let border_style = if focused {
            self.config.style
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_top(Line::from(format!(" {} ", status_icon)).right_aligned())
            .border_style(border_style);

        let inner_width = area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(inner_width);

        let content = if self.input.value().is_empty() {
            Line::from(Span::styled(
                self.config.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(self.input.value())
        };

        let input_widget = Paragraph::new(content)
            .block(block)
            .scroll((0, scroll as u16));

        f.render_widget(input_widget, area);

        if focused {
            let x = self.input.visual_cursor().max(scroll) - scroll;
            f.set_cursor_position((area.x + x as u16 + 1, area.y + 1));
        }
    }
}
