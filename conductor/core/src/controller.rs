//! Turn Controller - the conversation core
//!
//! Orchestrates one request/response cycle per user turn:
//! - validates and accepts submissions
//! - appends the user message and marks the conversation pending
//! - runs the remote query on the tokio runtime
//! - appends the real reply, or an apology when the query failed
//! - keeps the surface informed through [`ControllerMessage`]s
//!
//! # Concurrency
//!
//! The controller is owned by a single loop (the surface). The only
//! suspension point is the remote query, which runs in a spawned task that
//! owns an `Arc` of the backend and a completion sender and never touches
//! the store. Completions are applied by [`TurnController::poll_completions`]
//! or [`TurnController::settle_next`].
//!
//! Every completion carries the epoch that was current when its turn was
//! accepted. Clearing the conversation advances the epoch, so a reply that
//! arrives after a clear is recognised as stale and dropped.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot};

use crate::backend::{QueryBackend, QueryError, QueryRequest, QueryResponse};
use crate::events::SurfaceEvent;
use crate::input::{InputField, InputSizing};
use crate::messages::{
    ControllerMessage, LayoutDirective, NotifyLevel, TurnId, TurnOutcome, TurnState,
};
use crate::store::{ConversationStore, Epoch, Message};

/// Reply appended in place of the service's answer when a query fails
pub const APOLOGY_TEXT: &str = "I'm sorry, I'm having trouble connecting right now. Please make sure the backend server is running and try again.";

/// Capacity of the internal completion channel
const COMPLETION_CAPACITY: usize = 16;

/// Result of a submission attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty or whitespace; nothing happened
    Ignored,
    /// A turn is already in flight; nothing happened
    Busy,
    /// The turn was accepted and its query started
    Accepted(TurnId),
}

/// A finished query travelling back to the controller
struct Completion {
    turn_id: TurnId,
    epoch: Epoch,
    result: Result<QueryResponse, QueryError>,
}

/// Ticket of the turn currently waiting for its reply
#[derive(Clone, Copy, Debug)]
struct InFlight {
    turn_id: TurnId,
    epoch: Epoch,
    started: Instant,
}

/// Headless conversation controller
pub struct TurnController<B: QueryBackend> {
    /// Remote question-answering service
    backend: Arc<B>,
    /// Transcript and transient flags
    store: ConversationStore,
    /// Text being composed
    input: InputField,
    /// Height bounds for the input affordance
    sizing: InputSizing,
    /// Columns available for input text, as last reported by the surface
    input_width: u16,
    /// Turn lifecycle state
    state: TurnState,
    /// Last allocated turn number
    last_turn: u64,
    /// The accepted turn still waiting for its reply
    in_flight: Option<InFlight>,
    /// Sender handed to query tasks
    completion_tx: mpsc::Sender<Completion>,
    /// Finished queries
    completion_rx: mpsc::Receiver<Completion>,
    /// Result of the startup health probe, until it is reported
    health_rx: Option<oneshot::Receiver<bool>>,
    /// Channel to the surface
    tx: mpsc::Sender<ControllerMessage>,
}

impl<B: QueryBackend + 'static> TurnController<B> {
    /// Create a controller with an empty conversation
    pub fn new(backend: B, sizing: InputSizing, tx: mpsc::Sender<ControllerMessage>) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel(COMPLETION_CAPACITY);
        Self {
            backend: Arc::new(backend),
            store: ConversationStore::new(),
            input: InputField::new(),
            sizing,
            input_width: 0,
            state: TurnState::Idle,
            last_turn: 0,
            in_flight: None,
            completion_tx,
            completion_rx,
            health_rx: None,
            tx,
        }
    }

    /// The conversation store
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// The input field
    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// Current turn state
    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Current reset generation
    pub fn epoch(&self) -> Epoch {
        self.store.epoch()
    }

    /// The backend in use
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Announce initial state and start probing the backend
    ///
    /// The health check runs in the background so the surface stays
    /// responsive. Its result is reported by [`Self::poll_completions`] or
    /// [`Self::wait_for_health`]. An unhealthy backend only produces a
    /// warning notification; turns can still be submitted and will fail
    /// individually.
    pub async fn start(&mut self) {
        self.send(ControllerMessage::State { state: self.state }).await;
        self.send_input_height().await;

        let backend = Arc::clone(&self.backend);
        let (done, health_rx) = oneshot::channel();
        tokio::spawn(async move {
            if done.send(backend.health_check().await).is_err() {
                tracing::debug!("Controller dropped before the health check finished");
            }
        });
        self.health_rx = Some(health_rx);
    }

    /// Wait for the startup health probe and report it
    ///
    /// Returns `None` when no probe is outstanding or it ended without a
    /// result.
    pub async fn wait_for_health(&mut self) -> Option<bool> {
        let health_rx = self.health_rx.take()?;
        match health_rx.await {
            Ok(healthy) => {
                self.report_health(healthy).await;
                Some(healthy)
            }
            Err(_) => {
                tracing::warn!("Health check ended without a result");
                None
            }
        }
    }

    async fn report_health(&self, healthy: bool) {
        if healthy {
            tracing::info!(backend = self.backend.name(), "Backend is reachable");
        } else {
            tracing::warn!(backend = self.backend.name(), "Backend health check failed");
            self.notify(
                NotifyLevel::Warning,
                "Backend server is not reachable - replies will fail until it is running",
            )
            .await;
        }
    }

    /// Handle an event from the surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Resized { width, height } => {
                tracing::debug!(width, height, "Surface resized");
                if width != self.input_width {
                    self.input_width = width;
                    self.send_input_height().await;
                }
            }

            SurfaceEvent::InputInserted { text } => {
                if !text.is_empty() {
                    self.input.insert(&text);
                    self.send_input().await;
                }
            }

            SurfaceEvent::InputBackspace => {
                if self.input.backspace() {
                    self.send_input().await;
                }
            }

            SurfaceEvent::InputCleared => {
                if self.input.clear() {
                    self.send_input().await;
                }
            }

            SurfaceEvent::SuggestionPicked { text } => {
                self.pick_suggestion(text).await;
            }

            SurfaceEvent::Submit => {
                let text = self.input.text().to_string();
                self.submit(text).await;
            }

            SurfaceEvent::ClearChat => {
                self.clear().await;
            }

            SurfaceEvent::QuitRequested => {
                tracing::info!("Quit requested");
                self.send(ControllerMessage::Quit).await;
            }
        }
    }

    /// Submit a user turn
    ///
    /// Whitespace-only input is ignored and a second submission while a
    /// turn is in flight is refused. Otherwise the untrimmed text is
    /// appended as a user message, the input is cleared and the query is
    /// started in the background.
    pub async fn submit(&mut self, raw_input: String) -> SubmitOutcome {
        if raw_input.trim().is_empty() {
            tracing::debug!("Ignoring blank submission");
            return SubmitOutcome::Ignored;
        }

        if self.store.is_pending() {
            tracing::debug!("Ignoring submission while a turn is in flight");
            return SubmitOutcome::Busy;
        }

        self.last_turn += 1;
        let turn_id = TurnId(self.last_turn);
        let epoch = self.store.epoch();

        self.append(Message::user(raw_input.clone())).await;

        if self.input.clear() {
            self.send_input().await;
        }

        self.store.set_pending(true);
        if self.store.last_error().is_some() {
            self.store.set_error(None);
            self.send(ControllerMessage::Error { error: None }).await;
        }
        self.set_state(TurnState::Sending).await;

        self.in_flight = Some(InFlight {
            turn_id,
            epoch,
            started: Instant::now(),
        });

        tracing::info!(
            %turn_id,
            %epoch,
            backend = self.backend.name(),
            chars = raw_input.chars().count(),
            "Accepted turn"
        );

        let backend = Arc::clone(&self.backend);
        let done = self.completion_tx.clone();
        let request = QueryRequest::new(raw_input);
        tokio::spawn(async move {
            // Inner task so a panicking backend still yields a completion
            let query = tokio::spawn(async move { backend.query(&request).await });
            let result = match query.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(%turn_id, error = %e, "Query task aborted");
                    Err(QueryError::Aborted(e.to_string()))
                }
            };
            let completion = Completion {
                turn_id,
                epoch,
                result,
            };
            if done.send(completion).await.is_err() {
                tracing::debug!(%turn_id, "Controller dropped before the reply arrived");
            }
        });

        SubmitOutcome::Accepted(turn_id)
    }

    /// Replace the input with a suggested prompt without submitting it
    pub async fn pick_suggestion(&mut self, text: String) {
        self.input.set(text);
        self.send_input().await;
    }

    /// Clear the conversation
    ///
    /// An in-flight query is not cancelled, but its reply will be dropped
    /// when it arrives.
    pub async fn clear(&mut self) {
        let had_messages = !self.store.is_empty();
        let had_error = self.store.last_error().is_some();

        if let Some(stale) = self.in_flight.take() {
            tracing::info!(turn_id = %stale.turn_id, "Clearing with a turn in flight; its reply will be dropped");
        }
        self.store.clear();

        self.send(ControllerMessage::Cleared).await;
        if had_messages {
            self.send_layout(LayoutDirective::ScrollToLatest).await;
        }
        if had_error {
            self.send(ControllerMessage::Error { error: None }).await;
        }
        if self.state != TurnState::Idle {
            self.set_state(TurnState::Idle).await;
        }
    }

    /// Apply every completion that has already arrived
    ///
    /// Also reports the startup health probe once it has finished. Never
    /// waits. Returns true if anything was received, including stale
    /// completions that were dropped.
    pub async fn poll_completions(&mut self) -> bool {
        let mut activity = false;
        if let Some(health_rx) = self.health_rx.as_mut() {
            match health_rx.try_recv() {
                Ok(healthy) => {
                    self.health_rx = None;
                    activity = true;
                    self.report_health(healthy).await;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.health_rx = None;
                    tracing::warn!("Health check ended without a result");
                }
            }
        }
        while let Ok(completion) = self.completion_rx.try_recv() {
            activity = true;
            self.apply_completion(completion).await;
        }
        activity
    }

    /// Wait for the in-flight turn to settle
    ///
    /// Returns `None` immediately when no turn is in flight. Stale
    /// completions received while waiting are dropped.
    pub async fn settle_next(&mut self) -> Option<TurnOutcome> {
        while self.in_flight.is_some() {
            let completion = self.completion_rx.recv().await?;
            if let Some(outcome) = self.apply_completion(completion).await {
                return Some(outcome);
            }
        }
        None
    }

    /// Apply one completion; returns its outcome unless it was stale
    async fn apply_completion(&mut self, completion: Completion) -> Option<TurnOutcome> {
        let Completion {
            turn_id,
            epoch,
            result,
        } = completion;

        let current = match self.in_flight {
            Some(ticket)
                if ticket.turn_id == turn_id
                    && ticket.epoch == epoch
                    && epoch == self.store.epoch() =>
            {
                ticket
            }
            _ => {
                tracing::debug!(
                    %turn_id,
                    completion_epoch = %epoch,
                    current_epoch = %self.store.epoch(),
                    "Discarding stale completion"
                );
                return None;
            }
        };
        self.in_flight = None;

        let outcome = match result {
            Ok(response) => {
                self.append(Message::assistant(response.response)).await;
                TurnOutcome::Success
            }
            Err(e) => {
                tracing::warn!(%turn_id, error = %e, transport = e.is_transport(), "Query failed");
                let description = e.to_string();
                self.store.set_error(Some(description.clone()));
                self.send(ControllerMessage::Error {
                    error: Some(description),
                })
                .await;
                self.append(Message::assistant(APOLOGY_TEXT)).await;
                TurnOutcome::Failure
            }
        };

        self.store.set_pending(false);
        self.set_state(TurnState::Idle).await;

        let elapsed_ms = u64::try_from(current.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(%turn_id, %epoch, elapsed_ms, ?outcome, "Turn settled");

        self.send(ControllerMessage::TurnSettled {
            turn_id,
            outcome,
            elapsed_ms,
        })
        .await;

        Some(outcome)
    }

    /// Append to the store and tell the surface
    async fn append(&mut self, message: Message) {
        let index = self.store.len();
        self.store.append(message.clone());
        self.send(ControllerMessage::Appended { index, message }).await;
        self.send_layout(LayoutDirective::ScrollToLatest).await;
    }

    /// Set state and notify the surface
    async fn set_state(&mut self, state: TurnState) {
        self.state = state;
        self.send(ControllerMessage::State { state }).await;
    }

    /// Mirror the input text and its height
    async fn send_input(&self) {
        self.send(ControllerMessage::Input {
            text: self.input.text().to_string(),
        })
        .await;
        self.send_input_height().await;
    }

    async fn send_input_height(&self) {
        let rows = self.sizing.fit(self.input.text(), self.input_width);
        self.send_layout(LayoutDirective::InputHeight { rows }).await;
    }

    async fn send_layout(&self, directive: LayoutDirective) {
        self.send(ControllerMessage::Layout { directive }).await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ControllerMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    /// Send a message to the surface
    async fn send(&self, msg: ControllerMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}
