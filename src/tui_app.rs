use crate::app_context::AppContext;
use crate::config::AppAction;
use crate::data::ResultItem;
use crate::services::{SearchExecutor, SearchResponse};
use crate::utils::LogRingBuffer;
use crate::widget_traits::DebugInfoProvider;
use crate::widgets::DashboardSearch;
use anyhow::Result;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const MAX_SELECTIONS_SHOWN: usize = 5;
const DEBUG_LOG_LINES: usize = 30;

pub struct SearchApp {
    search: DashboardSearch,
    executor: SearchExecutor,
    responses: UnboundedReceiver<SearchResponse>,
    selections: Rc<RefCell<Vec<ResultItem>>>,
    log_buffer: LogRingBuffer,
    show_debug: bool,
}

impl SearchApp {
    pub fn new(context: &AppContext) -> Result<Self> {
        let mut search = DashboardSearch::from_config(&context.config)?;
        let (executor, responses) = SearchExecutor::new(context.client.clone());

        let selections = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&selections);
        search.on_result_selected(move |item: ResultItem| {
            sink.borrow_mut().push(item);
        });

        Ok(Self {
            search,
            executor,
            responses,
            selections,
            log_buffer: context.log_buffer().clone(),
            show_debug: false,
        })
    }

    /// Set up the terminal, run the event loop, and always restore the terminal
    pub fn run(mut self) -> Result<()> {
        if let Err(e) = enable_raw_mode() {
            return Err(anyhow::anyhow!("Failed to enable raw mode: {}", e));
        }

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableFocusChange) {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
            }
        };

        let res = self.run_app(&mut terminal);

        let _ = disable_raw_mode();
        let _ = execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableFocusChange
        );
        let _ = terminal.show_cursor();

        res.map_err(|e| anyhow::anyhow!("TUI error: {}", e))
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!(target: "app", "Search backend: {}", self.executor.client_name());
        terminal.draw(|f| self.ui(f))?;

        loop {
            let mut dirty = false;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        // Windows reports releases too
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle_key(key) {
                            break;
                        }
                        dirty = true;
                    }
                    Event::FocusGained => {
                        self.search.focus();
                        dirty = true;
                    }
                    Event::FocusLost => {
                        self.search.blur();
                        dirty = true;
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }

            dirty |= self.pump(Instant::now());

            // The typing indicator needs redrawing while a search is armed
            if dirty || self.search.is_pending() {
                terminal.draw(|f| self.ui(f))?;
            }
        }
        Ok(())
    }

    /// Returns true when the app should exit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.search.key_bindings().app_action(&key) {
            Some(AppAction::Quit) => return true,
            Some(AppAction::ToggleDebug) => {
                self.show_debug = !self.show_debug;
                debug!(target: "app", "Debug pane {}", if self.show_debug { "on" } else { "off" });
                return false;
            }
            None => {}
        }

        let action = self.search.handle_key(key);
        debug!(target: "input", "Key {:?} -> {:?}", key.code, action);
        false
    }

    /// Issue due searches and apply whatever responses have arrived.
    /// Returns true if anything changed on screen.
    fn pump(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(request) = self.search.tick(now) {
            self.executor.submit(request);
            changed = true;
        }

        while let Ok(response) = self.responses.try_recv() {
            changed |= self.search.apply_response(response);
        }

        changed
    }

    fn ui(&self, f: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(MAX_SELECTIONS_SHOWN as u16 + 2),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_title(f, outer[0]);

        let body = if self.show_debug {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(outer[1]);
            self.render_debug(f, columns[1]);
            columns[0]
        } else {
            outer[1]
        };

        self.search.render(f, body);
        self.render_selections(f, outer[2]);
        self.render_help(f, outer[3]);
    }

    fn render_title(&self, f: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(
                "Dashboard Search",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  backend: {}", self.executor.client_name()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(title), area);
    }

    fn render_selections(&self, f: &mut Frame, area: Rect) {
        let selections = self.selections.borrow();
        let lines: Vec<Line> = if selections.is_empty() {
            vec![Line::from(Span::styled(
                "Nothing selected yet",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            selections
                .iter()
                .rev()
                .take(MAX_SELECTIONS_SHOWN)
                .map(|item| {
                    Line::from(vec![
                        Span::styled(format!("[{}] ", item.category.label()), item.category.style()),
                        Span::raw(item.display_name.clone()),
                        Span::styled(format!("  {}", item.id), Style::default().fg(Color::DarkGray)),
                    ])
                })
                .collect()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Last selection ({} total)", selections.len()));
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_debug(&self, f: &mut Frame, area: Rect) {
        let mut text = self.search.debug_info();
        text.push_str("\n========== LOG ==========\n");
        for entry in self.log_buffer.get_recent(DEBUG_LOG_LINES) {
            text.push_str(&entry.format_for_display());
            text.push('\n');
        }

        let debug = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Debug (F5)"))
            .wrap(Wrap { trim: false });
        f.render_widget(debug, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help = Paragraph::new(Line::from(Span::styled(
            "↑/↓ move  Enter select  Esc close  F5 debug  Ctrl-C quit",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(help, area);
    }
}
