//! Controller Client
//!
//! Thin wrapper around the turn controller for TUI integration.
//! This client embeds the controller directly (no network between them) and
//! provides a convenient interface for sending events and receiving
//! messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any conversation logic.
//! The TUI's job is:
//! 1. Convert terminal events to `SurfaceEvent`s
//! 2. Send `SurfaceEvent`s to the controller
//! 3. Receive `ControllerMessage`s
//! 4. Render display state based on messages

use anyhow::Context;
use tokio::sync::mpsc;

use assistant_conductor::{
    AssistantConfig, ControllerMessage, HttpBackend, InputSizing, QueryBackend, SurfaceEvent,
    TurnController, TurnState,
};

/// Buffer size of the controller → surface channel
const MESSAGE_CAPACITY: usize = 256;

/// Client for communicating with the embedded controller
pub struct ControllerClient<B: QueryBackend + 'static = HttpBackend> {
    /// The embedded controller
    controller: TurnController<B>,
    /// Receiver for messages from the controller
    rx: mpsc::Receiver<ControllerMessage>,
}

impl ControllerClient<HttpBackend> {
    /// Create a client talking to the configured HTTP service
    pub fn from_config(config: &AssistantConfig) -> anyhow::Result<Self> {
        let backend = HttpBackend::from_config(&config.api)
            .context("Failed to create HTTP backend")?;
        tracing::info!(base_url = backend.base_url(), "Using question-answering service");
        Ok(Self::new(backend, config.input))
    }
}

impl<B: QueryBackend + 'static> ControllerClient<B> {
    /// Create a client around `backend`
    pub fn new(backend: B, sizing: InputSizing) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_CAPACITY);
        let controller = TurnController::new(backend, sizing, tx);
        Self { controller, rx }
    }

    /// Start the controller (announce state, probe the backend in the background)
    pub async fn start(&mut self) {
        self.controller.start().await;
    }

    /// Send raw surface event to the controller
    pub async fn send_event(&mut self, event: SurfaceEvent) {
        self.controller.handle_event(event).await;
    }

    /// Append typed or pasted text to the input
    pub async fn insert_text(&mut self, text: impl Into<String>) {
        self.send_event(SurfaceEvent::InputInserted { text: text.into() })
            .await;
    }

    /// Delete the last input character
    pub async fn backspace(&mut self) {
        self.send_event(SurfaceEvent::InputBackspace).await;
    }

    /// Empty the input
    pub async fn clear_input(&mut self) {
        self.send_event(SurfaceEvent::InputCleared).await;
    }

    /// Fill the input with a suggested prompt
    pub async fn pick_suggestion(&mut self, text: impl Into<String>) {
        self.send_event(SurfaceEvent::SuggestionPicked { text: text.into() })
            .await;
    }

    /// Submit the current input
    pub async fn submit(&mut self) {
        self.send_event(SurfaceEvent::Submit).await;
    }

    /// Clear the conversation
    pub async fn clear_chat(&mut self) {
        self.send_event(SurfaceEvent::ClearChat).await;
    }

    /// Notify the controller that the user wants to quit
    pub async fn request_quit(&mut self) {
        self.send_event(SurfaceEvent::QuitRequested).await;
    }

    /// Notify the controller of the input area size
    pub async fn resized(&mut self, input_width: u16, height: u16) {
        self.send_event(SurfaceEvent::Resized {
            width: input_width,
            height,
        })
        .await;
    }

    /// Apply replies that have arrived (must be called regularly)
    pub async fn poll_completions(&mut self) -> bool {
        self.controller.poll_completions().await
    }

    /// Try to receive a message from the controller (non-blocking)
    pub fn try_recv(&mut self) -> Option<ControllerMessage> {
        self.rx.try_recv().ok()
    }

    /// Receive all pending messages from the controller (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ControllerMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current turn state
    pub fn state(&self) -> TurnState {
        self.controller.state()
    }

    /// The embedded controller, for read access
    pub fn controller(&self) -> &TurnController<B> {
        &self.controller
    }
}
