//! Assistant Conductor - Headless Conversation Core for the ML Assistant
//!
//! This crate provides the conversation logic of the ML Assistant chat
//! client, completely independent of any UI framework. It can drive the
//! terminal surface or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       UI Surface                          │
//! │        (terminal: transcript, suggestions, input)         │
//! └──────────────┬──────────────────────────▲────────────────┘
//!                │ SurfaceEvent (up)         │ ControllerMessage (down)
//! ┌──────────────▼──────────────────────────┴────────────────┐
//! │                    TurnController                         │
//! │  ┌──────────────────┐ ┌────────────┐ ┌─────────────────┐  │
//! │  │ ConversationStore│ │ InputField │ │  QueryBackend   │  │
//! │  │ (transcript,     │ │ + sizing   │ │  (POST /chat)   │  │
//! │  │  pending, epoch) │ │            │ │                 │  │
//! │  └──────────────────┘ └────────────┘ └─────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`TurnController`]: Owns the conversation and runs one turn at a time
//! - [`ConversationStore`]: Transcript plus pending/error flags and the reset epoch
//! - [`ControllerMessage`]: Messages sent from the controller to the surface
//! - [`SurfaceEvent`]: Events sent from the surface to the controller
//! - [`HttpBackend`]: The question-answering service client
//!
//! # Quick Start
//!
//! ```ignore
//! use assistant_conductor::{
//!     config, HttpBackend, SurfaceEvent, TurnController,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = config::load_config()?;
//!     let (tx, mut rx) = mpsc::channel(256);
//!
//!     let backend = HttpBackend::from_config(&config.api)?;
//!     let mut controller = TurnController::new(backend, config.input, tx);
//!     controller.start().await;
//!
//!     controller
//!         .handle_event(SurfaceEvent::InputInserted { text: "What is gradient descent?".into() })
//!         .await;
//!     controller.handle_event(SurfaceEvent::Submit).await;
//!     controller.settle_next().await;
//!
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Question-answering service abstraction and HTTP client
//! - [`config`]: TOML / environment configuration loading
//! - [`controller`]: The turn controller
//! - [`events`]: Events from the surface to the controller
//! - [`input`]: Input field and its height rule
//! - [`messages`]: Messages from the controller to the surface
//! - [`store`]: Conversation store
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod backend;
pub mod config;
pub mod controller;
pub mod events;
pub mod input;
pub mod messages;
pub mod store;

// Re-export main types for convenience
pub use backend::{HttpBackend, QueryBackend, QueryError, QueryRequest, QueryResponse};
pub use config::{AssistantConfig, ConfigError, ConfigOverrides, ConfigSource};
pub use controller::{SubmitOutcome, TurnController, APOLOGY_TEXT};
pub use events::SurfaceEvent;
pub use input::{InputField, InputSizing};
pub use messages::{
    ControllerMessage, LayoutDirective, NotifyLevel, TurnId, TurnOutcome, TurnState,
};
pub use store::{ConversationStore, Epoch, Message};
