//! ML Assistant TUI Entry Point
//!
//! Launches the terminal chat client for the ML Assistant service.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (service at http://localhost:8000)
//! ml-assistant
//!
//! # Another service address
//! ml-assistant --api-url http://10.0.0.5:8000
//!
//! # With config file
//! ml-assistant --config ~/ml-assistant.toml
//!
//! # Debug logging (stderr must be redirected; nothing is logged to a terminal)
//! RUST_LOG=debug ml-assistant 2> ml-assistant.log
//! ```

use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use assistant_conductor::config::{default_config_path, load_config_from_path, ConfigOverrides};
use ml_assistant_tui::{App, ControllerClient};

/// ML Assistant - terminal chat client for the ML question-answering service
#[derive(Parser, Debug)]
#[command(name = "ml-assistant")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the question-answering service
    #[arg(short = 'u', long, env = "ML_ASSISTANT_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "ML_ASSISTANT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr only when it is redirected; on the terminal they
    // would draw over the alternate screen
    tracing_subscriber::registry()
        .with(stderr_log_layer(io::stderr().is_terminal()))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Resolve configuration: file < env < CLI
    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(url) = args.api_url {
        overrides = overrides.with_api_url(url);
    }
    if let Some(secs) = args.timeout_secs {
        overrides = overrides.with_timeout_secs(secs);
    }
    overrides.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout.as_secs(),
        source = %config.source(),
        "Configuration resolved"
    );

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: ml-assistant requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin/stdout are piped or the session has no TTY");
        eprintln!("(for SSH, connect with -t).");
        std::process::exit(1);
    }

    let client = ControllerClient::from_config(&config)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(client);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

/// Formatting layer writing to stderr, unless stderr is the terminal we draw on
fn stderr_log_layer<S>(stderr_is_terminal: bool) -> Option<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    (!stderr_is_terminal).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
    })
}
