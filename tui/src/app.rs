//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, paste, mouse, resize)
//! - `ControllerClient` for the conversation
//! - `DisplayState` for rendering
//!
//! The App:
//! 1. Converts terminal events to `SurfaceEvent`s
//! 2. Sends events to the embedded controller via `ControllerClient`
//! 3. Receives `ControllerMessage`s and updates `DisplayState`
//! 4. Renders based on `DisplayState`

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use assistant_conductor::{HttpBackend, NotifyLevel, QueryBackend, TurnOutcome};

use crate::controller_client::ControllerClient;
use crate::display::DisplayState;
use crate::theme;
use crate::widgets::{
    typing_indicator, MessageBubble, SuggestionList, SuggestionState, Transcript,
    TranscriptState,
};

/// Target frame time
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Frames per step of the typing indicator
const TYPING_FRAMES_PER_DOT: u64 = 10;

/// Header rows (title + subtitle)
const HEADER_HEIGHT: u16 = 2;

/// Input box borders (top + bottom, left + right)
const INPUT_BORDER: u16 = 2;

/// Lines scrolled per mouse wheel notch
const WHEEL_LINES: usize = 3;

/// Placeholder shown in the empty input box
const INPUT_PLACEHOLDER: &str = "Ask me anything about machine learning...";

/// Main application state
pub struct App<B: QueryBackend + 'static = HttpBackend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Controller Integration ===
    /// Client for the embedded controller
    client: ControllerClient<B>,
    /// Display state derived from `ControllerMessage`s
    display: DisplayState,

    // === UI Components ===
    /// Welcome screen suggestions
    suggestions: SuggestionState,
    /// Transcript scroll state
    transcript: TranscriptState,

    // === Misc State ===
    /// Last frame time (for timers)
    last_frame: Instant,
    /// Frame counter (for the typing indicator)
    tick: u64,
    /// Terminal size
    size: (u16, u16),
}

impl<B: QueryBackend + 'static> App<B> {
    /// Create a new App around a controller client
    pub fn new(client: ControllerClient<B>) -> Self {
        Self {
            running: true,
            client,
            display: DisplayState::new(),
            suggestions: SuggestionState::default(),
            transcript: TranscriptState::default(),
            last_frame: Instant::now(),
            tick: 0,
            size: (0, 0),
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        let (width, height) = crossterm::terminal::size()?;
        self.handle_resize(width, height).await;

        // Health probe result arrives through pump()
        self.client.start().await;

        // Render initial frame immediately so user sees UI
        self.pump().await;
        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await,
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            // Apply replies and mirror controller messages
            self.pump().await;

            // Update timers and display state
            self.update();

            // Render
            terminal.draw(|frame| self.draw(frame))?;

            if self.display.quit {
                self.running = false;
            }

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                tokio::time::sleep(FRAME_DURATION - elapsed).await;
            }
        }

        Ok(())
    }

    /// Apply finished queries and process all pending controller messages
    pub async fn pump(&mut self) {
        self.client.poll_completions().await;
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
        self.suggestions.visible = self.display.is_welcome();
        if self.display.take_scroll_request() {
            self.transcript.scroll_to_latest();
        }
    }

    /// Dispatch one terminal event
    pub async fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Paste(text) => self.client.insert_text(text.replace('\r', "")).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h).await,
            _ => {}
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            // Quit
            KeyCode::Esc => self.client.request_quit().await,
            KeyCode::Char('c') if ctrl => self.client.request_quit().await,

            // Conversation
            KeyCode::Char('l') if ctrl => self.client.clear_chat().await,
            KeyCode::Char('u') if ctrl => self.client.clear_input().await,

            // Newline vs submit
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
            {
                self.client.insert_text("\n").await;
            }
            KeyCode::Enter => self.client.submit().await,

            // Suggestions (welcome screen) or scrolling
            KeyCode::Tab => {
                if let Some(text) = self.suggestions.selected_text() {
                    self.client.pick_suggestion(text).await;
                }
            }
            KeyCode::Up => {
                if self.suggestions.visible {
                    self.suggestions.select_previous();
                } else {
                    self.transcript.scroll_up(1);
                }
            }
            KeyCode::Down => {
                if self.suggestions.visible {
                    self.suggestions.select_next();
                } else {
                    self.transcript.scroll_down(1);
                }
            }
            KeyCode::PageUp => self.transcript.scroll_up(self.transcript.page()),
            KeyCode::PageDown => self.transcript.scroll_down(self.transcript.page()),
            KeyCode::End if ctrl => self.transcript.scroll_to_latest(),

            // Typing
            KeyCode::Char(c) if !ctrl => {
                self.client.insert_text(c.to_string()).await;
            }
            KeyCode::Backspace => self.client.backspace().await,

            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.transcript.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown => self.transcript.scroll_down(WHEEL_LINES),
            _ => {}
        }
    }

    /// Handle terminal resize
    pub async fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.client
            .resized(width.saturating_sub(INPUT_BORDER), height)
            .await;
    }

    /// Update timers
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.tick = self.tick.wrapping_add(1);

        self.display.update(delta);
    }

    /// Render the whole screen
    pub fn draw(&mut self, frame: &mut Frame) {
        let input_height = self.display.input_rows + INPUT_BORDER;
        let [header, body, input, status] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header);
        if self.display.is_welcome() {
            self.render_welcome(frame, body);
        } else {
            self.render_conversation(frame, body);
        }
        self.render_input(frame, input);
        self.render_status(frame, status);
    }

    /// Title, connection indicator and clear hint
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(vec![
            Line::from(Span::styled("ML Assistant", theme::title())),
            Line::from(Span::styled(
                "Powered by Machine Learning Books",
                theme::dim(),
            )),
        ]);
        frame.render_widget(title, area);

        let mut actions = Vec::new();
        if self.display.last_error.is_some() {
            actions.push(Span::styled(
                "Connection Error",
                Style::default().fg(theme::ERROR_RED),
            ));
        }
        if !self.display.messages.is_empty() {
            if !actions.is_empty() {
                actions.push(Span::raw("  "));
            }
            actions.push(Span::styled("Ctrl+L clear chat", theme::dim()));
        }
        if !actions.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(actions)).alignment(Alignment::Right),
                Rect { height: 1, ..area },
            );
        }
    }

    /// Welcome text plus suggestions
    fn render_welcome(&mut self, frame: &mut Frame, area: Rect) {
        let intro = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled("Welcome to ML Assistant", theme::title())),
            Line::default(),
            Line::from(Span::styled(
                "I'm your intelligent assistant trained on machine learning books. \
                 Ask me anything about ML concepts, algorithms, or theory!",
                theme::body(),
            )),
        ])
        .wrap(Wrap { trim: true });

        let intro_height = 6.min(area.height);
        let [intro_area, list_area] =
            Layout::vertical([Constraint::Length(intro_height), Constraint::Min(0)]).areas(area);

        frame.render_widget(intro, intro_area);
        frame.render_stateful_widget(SuggestionList, list_area, &mut self.suggestions);
    }

    /// Transcript plus typing indicator
    fn render_conversation(&mut self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        for (index, message) in self.display.messages.iter().enumerate() {
            lines.extend(MessageBubble::new(message, index).lines(area.width));
        }
        if self.display.is_sending() {
            lines.extend(typing_indicator(self.tick / TYPING_FRAMES_PER_DOT));
        }

        frame.render_stateful_widget(Transcript::new(lines), area, &mut self.transcript);
    }

    /// Input box, showing the last rows of the wrapped input
    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER_GRAY));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.display.input.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(INPUT_PLACEHOLDER, theme::dim())),
                inner,
            );
            frame.set_cursor_position(Position::new(inner.x, inner.y));
            return;
        }

        let wrapped = wrap_input(&self.display.input, inner.width);
        let visible = usize::from(inner.height);
        let skip = wrapped.len().saturating_sub(visible);
        let shown: Vec<Line> = wrapped
            .iter()
            .skip(skip)
            .map(|l| Line::styled(l.clone(), theme::body()))
            .collect();
        let cursor_row = u16::try_from(shown.len().saturating_sub(1)).unwrap_or(0);
        let cursor_col = wrapped
            .last()
            .map_or(0, |l| u16::try_from(l.width()).unwrap_or(u16::MAX));

        frame.render_widget(Paragraph::new(shown), inner);
        frame.set_cursor_position(Position::new(
            inner.x + cursor_col.min(inner.width.saturating_sub(1)),
            inner.y + cursor_row,
        ));
    }

    /// Notification or state plus key hints
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(note) = &self.display.notification {
            let color = match note.level {
                NotifyLevel::Info => theme::ACCENT,
                NotifyLevel::Warning => theme::WARNING_AMBER,
                NotifyLevel::Error => theme::ERROR_RED,
            };
            Line::from(Span::styled(
                format!(" {}", note.message),
                Style::default().fg(color),
            ))
        } else {
            let mut spans = vec![Span::styled(
                format!(" {}", self.display.turn_state.description()),
                theme::dim(),
            )];
            if let Some(settled) = self.display.last_settled {
                let (label, color) = match settled.outcome {
                    TurnOutcome::Success => ("replied", theme::SUCCESS_GREEN),
                    TurnOutcome::Failure => ("failed", theme::ERROR_RED),
                };
                spans.push(Span::styled(
                    format!(" ({label} in {} ms)", settled.elapsed_ms),
                    Style::default().fg(color),
                ));
            }
            if !self.transcript.is_at_latest() {
                spans.push(Span::styled(
                    format!(" [^{} lines - PgDn to scroll]", self.transcript.scroll_back),
                    Style::default().fg(theme::WARNING_AMBER),
                ));
            }
            spans.push(Span::styled(
                " | Enter send | Alt+Enter newline | Ctrl+U clear input | Esc quit",
                theme::dim(),
            ));
            Line::from(spans)
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Display state, for inspection
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Suggestion list state, for inspection
    pub fn suggestions(&self) -> &SuggestionState {
        &self.suggestions
    }

    /// The embedded controller client
    pub fn client(&self) -> &ControllerClient<B> {
        &self.client
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running && !self.display.quit
    }
}

/// Wrap input text the same way the controller sizes the input box
fn wrap_input(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width).max(1);
    text.split('\n')
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect()
}
