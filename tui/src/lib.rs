//! ML Assistant TUI - Terminal interface for the ML Assistant
//!
//! This crate provides a full-screen terminal chat client. All conversation
//! logic lives in `assistant-conductor`; this crate only turns key presses
//! into surface events and renders what the controller reports.
//!
//! # Architecture
//!
//! - **App**: Event loop and screen layout
//! - **ControllerClient**: The embedded turn controller and its message channel
//! - **Display**: Mirror of controller state for rendering
//! - **Widgets**: Message bubbles, suggestion list, scrolling transcript

pub mod app;
pub mod controller_client;
pub mod display;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use controller_client::ControllerClient;
