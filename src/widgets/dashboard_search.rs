//! The dashboard search box
//!
//! Owns the debounced input, the merged result list, the keyboard navigator,
//! the request sequencer and the selection dispatcher. The host feeds it key
//! events, polls `tick` for searches to run, and hands back the responses.

use crate::config::{Config, KeyBindingManager};
use crate::core::{
    KeyboardNavigator, MergedResults, NavigationKey, NavigationOutcome, NavigatorState,
    RequestSequencer, ResultMerger, ResultSelectionDispatcher, SelectionTarget,
};
use crate::data::{Category, ResultItem};
use crate::services::{SearchRequest, SearchResponse};
use crate::widget_traits::DebugInfoProvider;
use crate::widgets::debounced_input::{DebouncedInput, DebouncedInputAction, DebouncedInputConfig};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// What a key press did to the search box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Key had no effect
    None,
    /// Query text changed and a search is armed
    Edited,
    /// Query fell below the minimum length; results were cleared
    Cleared,
    /// Selection cursor moved to this index
    Navigated(usize),
    /// An item was dispatched to the host
    Selected,
    /// The result panel was closed
    Closed,
}

#[derive(Debug, Clone)]
pub struct DashboardSearchOptions {
    pub quiet_period_ms: u64,
    pub min_query_len: usize,
    pub limit_per_category: usize,
    pub category_order: Vec<Category>,
    pub placeholder: String,
    pub use_glyphs: bool,
    pub max_visible_rows: usize,
    pub vim_mode: bool,
}

impl Default for DashboardSearchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DashboardSearchOptions {
    fn from(config: &Config) -> Self {
        Self {
            quiet_period_ms: config.search.quiet_period_ms,
            min_query_len: config.search.min_query_len,
            limit_per_category: config.search.limit_per_category,
            category_order: config.search.category_order.clone(),
            placeholder: config.display.placeholder.clone(),
            use_glyphs: config.display.use_glyphs,
            max_visible_rows: config.display.max_visible_rows,
            vim_mode: config.keybindings.vim_mode,
        }
    }
}

/// Transient state torn down by a selection
struct PanelState {
    input: DebouncedInput,
    results: MergedResults,
    navigator: KeyboardNavigator,
    sequencer: RequestSequencer,
    loading: bool,
    /// Query the current results were fetched for
    results_query: Option<String>,
    /// Escape hid the panel; answers are stored but don't re-open it
    dismissed: bool,
}

impl PanelState {
    fn clear_results(&mut self) {
        self.results = MergedResults::empty();
        self.results_query = None;
        self.navigator.replace_list(0, false);
        self.sequencer.invalidate();
        self.loading = false;
        self.dismissed = false;
    }

    /// Whether the shown results were fetched for the text in the box
    fn results_match_query(&self) -> bool {
        self.results_query.as_deref() == Some(self.input.trimmed())
    }
}

impl SelectionTarget for PanelState {
    fn hide_results(&mut self) {
        self.navigator.close();
    }

    fn clear_query(&mut self) {
        self.input.clear();
        self.clear_results();
    }

    fn reset_cursor(&mut self) {
        self.navigator.reset_cursor();
    }
}

pub struct DashboardSearch {
    state: PanelState,
    merger: ResultMerger,
    dispatcher: ResultSelectionDispatcher,
    key_bindings: KeyBindingManager,
    options: DashboardSearchOptions,
    focused: bool,
}

impl Default for DashboardSearch {
    fn default() -> Self {
        Self::new(DashboardSearchOptions::default())
    }
}

impl DashboardSearch {
    pub fn new(options: DashboardSearchOptions) -> Self {
        let input = DebouncedInput::with_config(DebouncedInputConfig {
            debounce_ms: options.quiet_period_ms,
            min_query_len: options.min_query_len,
            placeholder: options.placeholder.clone(),
            ..DebouncedInputConfig::default()
        });

        Self {
            state: PanelState {
                input,
                results: MergedResults::empty(),
                navigator: KeyboardNavigator::new(),
                sequencer: RequestSequencer::new(),
                loading: false,
                results_query: None,
                dismissed: false,
            },
            merger: ResultMerger::new(options.category_order.clone()),
            dispatcher: ResultSelectionDispatcher::new(),
            key_bindings: KeyBindingManager::new(options.vim_mode),
            options,
            focused: true,
        }
    }

    /// Build from the config file, including any custom key bindings
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut search = Self::new(DashboardSearchOptions::from(config));
        if let Some(custom) = &config.keybindings.custom_mappings {
            search.key_bindings.apply_custom(custom)?;
        }
        Ok(search)
    }

    pub fn with_key_bindings(mut self, key_bindings: KeyBindingManager) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    /// Install the host's "result selected" hook
    pub fn on_result_selected(&mut self, callback: impl FnMut(ResultItem) + 'static) {
        self.dispatcher.on_result_selected(callback);
    }

    pub fn key_bindings(&self) -> &KeyBindingManager {
        &self.key_bindings
    }

    pub fn query(&self) -> &str {
        self.state.input.value()
    }

    pub fn results(&self) -> &MergedResults {
        &self.state.results
    }

    pub fn cursor(&self) -> Option<usize> {
        self.state.navigator.cursor()
    }

    /// Cursor with -1 for "nothing selected"
    pub fn cursor_index(&self) -> i64 {
        self.state.navigator.cursor_index()
    }

    pub fn navigator_state(&self) -> NavigatorState {
        self.state.navigator.state()
    }

    pub fn is_visible(&self) -> bool {
        self.state.navigator.is_open()
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_pending(&self) -> bool {
        self.state.input.is_pending()
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatcher.dispatched()
    }

    /// Whether the "no results" panel should be shown
    pub fn shows_no_results(&self) -> bool {
        self.is_visible()
            && self.state.results.is_empty()
            && self.state.input.meets_min_length()
            && !self.state.loading
            && self.state.results_match_query()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchAction {
        self.handle_key_at(key, Instant::now())
    }

    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> SearchAction {
        if let Some(nav) = self.key_bindings.navigation_key(&key) {
            if let Some(action) = self.navigate(nav) {
                return action;
            }
        }

        match self.state.input.handle_key_at(key, now) {
            DebouncedInputAction::Continue => SearchAction::None,
            DebouncedInputAction::InputChanged(_) => {
                self.state.navigator.reset_cursor();
                self.state.dismissed = false;
                SearchAction::Edited
            }
            DebouncedInputAction::ClearResults => {
                trace!(target: "search", "Query below minimum length, clearing results");
                self.state.clear_results();
                SearchAction::Cleared
            }
        }
    }

    /// Replace the query text, as a paste would
    pub fn set_query_at(&mut self, query: &str, now: Instant) -> SearchAction {
        match self.state.input.set_value_at(query, now) {
            DebouncedInputAction::Continue => SearchAction::None,
            DebouncedInputAction::InputChanged(_) => {
                self.state.navigator.reset_cursor();
                self.state.dismissed = false;
                SearchAction::Edited
            }
            DebouncedInputAction::ClearResults => {
                self.state.clear_results();
                SearchAction::Cleared
            }
        }
    }

    /// Returns `None` when the key should fall through to the text field
    fn navigate(&mut self, key: NavigationKey) -> Option<SearchAction> {
        match self.state.navigator.handle(key) {
            NavigationOutcome::Moved(index) => Some(SearchAction::Navigated(index)),
            NavigationOutcome::Confirmed(index) => {
                self.dispatch_index(index);
                Some(SearchAction::Selected)
            }
            NavigationOutcome::Closed => {
                // Text stays and the armed search still runs
                self.state.dismissed = true;
                debug!(target: "navigation", "Result panel closed");
                Some(SearchAction::Closed)
            }
            NavigationOutcome::Ignored => None,
        }
    }

    /// Poll the quiet period. Returns the search to run once it has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<SearchRequest> {
        let query = self.state.input.check_debounce_at(now)?;
        let id = self.state.sequencer.issue();
        self.state.loading = true;

        debug!(target: "search", "Issuing search {} for '{}'", id, query);

        Some(SearchRequest {
            id,
            query,
            limit_per_category: self.options.limit_per_category,
        })
    }

    /// Apply a collaborator response. Returns false if it was stale.
    pub fn apply_response(&mut self, response: SearchResponse) -> bool {
        if !self.state.sequencer.complete(response.id) {
            trace!(
                target: "search",
                "Discarding stale response {} for '{}'",
                response.id,
                response.query
            );
            return false;
        }

        self.state.loading = false;
        match response.outcome {
            Ok(buckets) => {
                let merged = self.merger.merge(&buckets);
                debug!(
                    target: "search",
                    "Search {} for '{}' returned {} results",
                    response.id,
                    response.query,
                    merged.len()
                );
                let visible = self.focused && !self.state.dismissed;
                self.state.navigator.replace_list(merged.len(), visible);
                self.state.results = merged;
                self.state.results_query = Some(response.query);
            }
            Err(e) => {
                warn!(target: "search", "Search for '{}' failed: {}", response.query, e);
                self.state.results = MergedResults::empty();
                self.state.results_query = None;
                self.state.navigator.replace_list(0, false);
            }
        }
        true
    }

    /// Input gained focus; re-open the panel if there is something to show
    pub fn focus(&mut self) {
        self.focus_at(Instant::now());
    }

    pub fn focus_at(&mut self, now: Instant) {
        self.focused = true;
        self.state.dismissed = false;
        if !self.state.input.meets_min_length() {
            return;
        }

        if self.state.results_match_query() {
            self.state.navigator.open();
        } else if !self.state.loading && !self.state.input.is_pending() {
            // Nothing answered this text yet; the response will open the panel
            debug!(target: "search", "Re-arming search for '{}'", self.state.input.trimmed());
            self.state.input.rearm_at(now);
        }
    }

    /// Input lost focus or the user clicked elsewhere
    pub fn blur(&mut self) {
        self.focused = false;
        self.state.navigator.close();
    }

    /// Move the cursor without selecting (pointer hover)
    pub fn hover(&mut self, index: usize) -> bool {
        self.state.navigator.select(index)
    }

    /// Pointer/tap selection of the item at `index`
    pub fn select_index(&mut self, index: usize) -> bool {
        if !self.is_visible() {
            return false;
        }
        self.dispatch_index(index)
    }

    fn dispatch_index(&mut self, index: usize) -> bool {
        let Some(item) = self.state.results.get(index).cloned() else {
            return false;
        };
        self.dispatcher.dispatch(&mut self.state, item);
        true
    }

    fn status_icon(&self) -> &'static str {
        match (self.state.loading, self.options.use_glyphs) {
            (true, true) => "⌛",
            (true, false) => "...",
            (false, true) => "🔍",
            (false, false) => ">",
        }
    }

    /// Rows the result panel wants, borders included
    pub fn panel_height(&self) -> u16 {
        if self.shows_no_results() {
            return 3;
        }
        if !self.is_visible() || self.state.results.is_empty() {
            return 0;
        }
        let rows = self.state.results.len() + self.state.results.sections().len();
        let rows = rows.min(self.options.max_visible_rows).saturating_add(2);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(self.panel_height()),
                Constraint::Min(0),
            ])
            .split(area);

        self.state
            .input
            .render(f, chunks[0], self.focused, self.status_icon());

        if self.shows_no_results() {
            self.render_no_results(f, chunks[1]);
        } else if self.is_visible() && !self.state.results.is_empty() {
            self.render_results(f, chunks[1]);
        }
    }

    fn render_no_results(&self, f: &mut Frame, area: Rect) {
        let text = format!("No results found for \"{}\"", self.state.input.trimmed());
        let panel = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(panel, area);
    }

    fn render_results(&self, f: &mut Frame, area: Rect) {
        let results = &self.state.results;
        let cursor = self.state.navigator.cursor();
        let mut rows = Vec::with_capacity(results.len() + results.sections().len());
        let mut selected_row = None;

        for section in results.sections() {
            let category = section.category;
            rows.push(ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", category.icon(self.options.use_glyphs))),
                Span::styled(
                    format!("{} ({})", category.header(), section.count),
                    category.style().add_modifier(Modifier::BOLD),
                ),
            ])));

            for index in section.offset..section.offset + section.count {
                let Some(item) = results.get(index) else {
                    continue;
                };
                if cursor == Some(index) {
                    selected_row = Some(rows.len());
                }
                rows.push(ListItem::new(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(item.display_name.clone(), Style::default().fg(Color::White)),
                    Span::raw("  "),
                    Span::styled(
                        item.display_info.clone(),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw("  "),
                    Span::styled(format!("[{}]", category.label()), category.style()),
                ])));
            }
        }

        let title = match &self.state.results_query {
            Some(query) => format!("Results for \"{}\" ({})", query, results.len()),
            None => format!("Results ({})", results.len()),
        };

        let list = List::new(rows)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(selected_row);
        f.render_stateful_widget(list, area, &mut list_state);
    }
}

impl DebugInfoProvider for DashboardSearch {
    fn debug_info(&self) -> String {
        let mut info = String::from("========== DASHBOARD SEARCH ==========\n");
        info.push_str(&format!("Query: '{}'\n", self.query()));
        info.push_str(&format!("Focused: {}\n", self.focused));
        info.push_str(&format!("State: {:?}\n", self.navigator_state()));
        info.push_str(&format!("Cursor: {}\n", self.cursor_index()));
        info.push_str(&format!("Debounce pending: {}\n", self.is_pending()));
        info.push_str(&format!("Loading: {}\n", self.state.loading));
        info.push_str(&format!(
            "Requests issued: {}\n",
            self.state.sequencer.issued_count()
        ));
        info.push_str(&format!("Results: {}\n", self.state.results.len()));
        for section in self.state.results.sections() {
            info.push_str(&format!(
                "  {}: offset {}, count {}\n",
                section.category, section.offset, section.count
            ));
        }
        info.push_str(&format!("Selections dispatched: {}\n", self.dispatched()));
        info
    }

    fn debug_summary(&self) -> String {
        format!(
            "SEARCH: '{}' {:?} cursor={} results={}",
            self.query(),
            self.navigator_state(),
            self.cursor_index(),
            self.state.results.len()
        )
    }
}
